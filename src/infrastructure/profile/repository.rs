//! In-memory profile repository

use async_trait::async_trait;

use crate::domain::profile::{MentorSearchFilter, MentorSummary, Profile, ProfileRepository};
use crate::domain::{DomainError, UserId};
use crate::infrastructure::storage::MemoryDatabase;

#[derive(Debug, Clone)]
pub struct InMemoryProfileRepository {
    db: MemoryDatabase,
}

impl InMemoryProfileRepository {
    pub fn new(db: MemoryDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn get_by_user(&self, user_id: UserId) -> Result<Option<Profile>, DomainError> {
        Ok(self.db.read().await.profile_by_user(user_id).cloned())
    }

    async fn update(&self, profile: &Profile) -> Result<Profile, DomainError> {
        let mut tables = self.db.write().await;

        match tables.profiles.get_mut(&profile.id.value()) {
            Some(stored) if stored.user_id == profile.user_id => {
                *stored = profile.clone();
                Ok(profile.clone())
            }
            _ => Err(DomainError::not_found(format!(
                "Profile for user {} not found",
                profile.user_id
            ))),
        }
    }

    async fn list(&self) -> Result<Vec<Profile>, DomainError> {
        Ok(self.db.read().await.profiles.values().rev().cloned().collect())
    }

    async fn search_mentors(
        &self,
        filter: &MentorSearchFilter,
    ) -> Result<Vec<MentorSummary>, DomainError> {
        let tables = self.db.read().await;

        let mentors = tables
            .profiles
            .values()
            .rev()
            .filter_map(|profile| {
                let user = tables.users.get(&profile.user_id.value())?;
                if !user.is_mentor || !user.is_approved || user.is_admin {
                    return None;
                }

                Some(MentorSummary {
                    user_id: user.id,
                    username: user.username.clone(),
                    first_name: profile.first_name.clone(),
                    last_name: profile.last_name.clone(),
                    bio: profile.bio.clone(),
                    skills: profile.skills.clone(),
                    rate: profile.rate,
                    timezone: profile.timezone.clone(),
                    available: profile.available,
                })
            })
            .filter(|mentor| filter.matches(mentor))
            .collect();

        Ok(mentors)
    }
}
