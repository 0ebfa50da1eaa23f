//! In-memory user repository

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::profile::NewProfile;
use crate::domain::user::{NewUser, User, UserId, UserRepository, UserStats};
use crate::domain::{DomainError, ProfileId};
use crate::infrastructure::storage::MemoryDatabase;

#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    db: MemoryDatabase,
}

impl InMemoryUserRepository {
    pub fn new(db: MemoryDatabase) -> Self {
        Self { db }
    }

    async fn find(&self, predicate: impl Fn(&User) -> bool) -> Option<User> {
        self.db.read().await.users.values().find(|u| predicate(u)).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self.db.read().await.users.get(&id.value()).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self.find(|u| u.email.eq_ignore_ascii_case(email)).await)
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self.find(|u| u.username == username).await)
    }

    async fn get_by_verification_token(&self, token: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .find(|u| u.verification_token.as_deref() == Some(token))
            .await)
    }

    async fn get_by_reset_token(&self, token: &str) -> Result<Option<User>, DomainError> {
        Ok(self.find(|u| u.reset_token.as_deref() == Some(token)).await)
    }

    async fn create_with_profile(
        &self,
        user: NewUser,
        profile: NewProfile,
    ) -> Result<User, DomainError> {
        let mut tables = self.db.write().await;

        if tables
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already registered",
                user.email
            )));
        }

        if tables.users.values().any(|u| u.username == user.username) {
            return Err(DomainError::conflict(format!(
                "Username '{}' is already taken",
                user.username
            )));
        }

        let user_id = UserId::new(tables.next_id())?;
        let profile_id = ProfileId::new(tables.next_id())?;
        let user = user.into_user(user_id);
        let profile = profile.into_profile(profile_id, user_id);

        tables.users.insert(user_id.value(), user.clone());
        tables.profiles.insert(profile_id.value(), profile);

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut tables = self.db.write().await;

        let clash = tables.users.values().any(|u| {
            u.id != user.id
                && (u.email.eq_ignore_ascii_case(&user.email) || u.username == user.username)
        });
        if clash {
            return Err(DomainError::conflict("Email or username already in use"));
        }

        match tables.users.get_mut(&user.id.value()) {
            Some(stored) => {
                *stored = user.clone();
                Ok(user.clone())
            }
            None => Err(DomainError::not_found(format!("User {} not found", user.id))),
        }
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let tables = self.db.read().await;
        Ok(tables.users.values().rev().cloned().collect())
    }

    async fn admin_exists(&self) -> Result<bool, DomainError> {
        Ok(self.find(|u| u.is_admin).await.is_some())
    }

    async fn stats(&self) -> Result<UserStats, DomainError> {
        let tables = self.db.read().await;
        let mut stats = UserStats::default();

        for user in tables.users.values() {
            stats.total_users += 1;
            if user.is_admin {
                stats.admins += 1;
            } else if user.is_mentor {
                stats.total_mentors += 1;
                if !user.is_approved {
                    stats.pending_mentors += 1;
                }
            } else {
                stats.total_mentees += 1;
            }
        }

        Ok(stats)
    }

    async fn record_login(&self, id: UserId) -> Result<(), DomainError> {
        let mut tables = self.db.write().await;

        match tables.users.get_mut(&id.value()) {
            Some(user) => {
                user.last_login_at = Some(Utc::now());
                Ok(())
            }
            None => Err(DomainError::not_found(format!("User {} not found", id))),
        }
    }
}
