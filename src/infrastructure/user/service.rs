//! User service: registration, login, email verification, password reset
//! and admin account management

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::profile::NewProfile;
use crate::domain::user::{
    validate_email, validate_password, validate_username, NewUser, User, UserId, UserRepository,
    UserStats,
};
use crate::domain::DomainError;
use crate::infrastructure::notification::Notifier;

use super::password::PasswordHasher;

/// How long a password reset token stays valid
pub const RESET_TOKEN_TTL_HOURS: i64 = 24;

/// Sign-up payload shared by mentee and mentor registration
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(flatten)]
    pub profile: NewProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationRole {
    Mentee,
    Mentor,
}

#[derive(Debug)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    notifier: Arc<dyn Notifier>,
    allowed_email_domain: Option<String>,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            repository,
            hasher,
            notifier,
            allowed_email_domain: None,
        }
    }

    /// Only accept sign-ups from this email domain
    pub fn with_allowed_email_domain(mut self, domain: Option<String>) -> Self {
        self.allowed_email_domain = domain.filter(|d| !d.trim().is_empty());
        self
    }

    pub async fn register(
        &self,
        role: RegistrationRole,
        request: RegistrationRequest,
    ) -> Result<User, DomainError> {
        match role {
            RegistrationRole::Mentee => self.register_mentee(request).await,
            RegistrationRole::Mentor => self.register_mentor(request).await,
        }
    }

    /// Mentees are approved right away and receive a verification email
    pub async fn register_mentee(&self, request: RegistrationRequest) -> Result<User, DomainError> {
        self.validate_registration(&request)?;

        let token = Uuid::new_v4().simple().to_string();
        let password_hash = self.hasher.hash(&request.password)?;
        let new_user = NewUser::mentee(&request.username, &request.email, password_hash, &token);

        let user = self
            .repository
            .create_with_profile(new_user, request.profile)
            .await?;

        info!(user_id = %user.id, "Registered mentee");

        if let Err(e) = self.notifier.send_verification(&user, &token).await {
            warn!(user_id = %user.id, error = %e, "Failed to send verification email");
        }

        Ok(user)
    }

    /// Mentors need admin approval before they can publish programs
    pub async fn register_mentor(&self, request: RegistrationRequest) -> Result<User, DomainError> {
        self.validate_registration(&request)?;

        let password_hash = self.hasher.hash(&request.password)?;
        let new_user = NewUser::mentor(&request.username, &request.email, password_hash);

        let user = self
            .repository
            .create_with_profile(new_user, request.profile)
            .await?;

        info!(user_id = %user.id, "Registered mentor pending approval");
        Ok(user)
    }

    fn validate_registration(&self, request: &RegistrationRequest) -> Result<(), DomainError> {
        validate_username(&request.username)?;
        validate_email(&request.email, self.allowed_email_domain.as_deref())?;
        validate_password(&request.password)?;
        request.profile.validate()
    }

    /// Check credentials. Non-admin accounts must have a verified email.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let Some(user) = self.repository.get_by_email(email).await? else {
            self.hasher.verify_decoy(password);
            return Err(DomainError::unauthorized("Invalid email or password"));
        };

        if !self.hasher.verify(password, &user.password_hash) {
            return Err(DomainError::unauthorized("Invalid email or password"));
        }

        if !user.can_login() {
            return Err(DomainError::unauthorized("Email address has not been verified"));
        }

        self.repository.record_login(user.id).await?;
        info!(user_id = %user.id, role = %user.role(), "User logged in");

        Ok(user)
    }

    pub async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        self.repository.get(id).await
    }

    /// Like [`get`](Self::get) but a missing user is an error
    pub async fn require(&self, id: UserId) -> Result<User, DomainError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User {} not found", id)))
    }

    pub async fn verify_email(&self, token: &str) -> Result<User, DomainError> {
        let mut user = self
            .repository
            .get_by_verification_token(token)
            .await?
            .ok_or_else(|| DomainError::not_found("Invalid or expired verification token"))?;

        user.mark_email_verified();
        let user = self.repository.update(&user).await?;

        info!(user_id = %user.id, "Email verified");
        Ok(user)
    }

    /// Issue a reset token. Unknown emails succeed silently.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), DomainError> {
        let Some(mut user) = self.repository.get_by_email(email).await? else {
            return Ok(());
        };

        let token = Uuid::new_v4().simple().to_string();
        user.issue_reset_token(&token, Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS));
        let user = self.repository.update(&user).await?;

        if let Err(e) = self.notifier.send_password_reset(&user, &token).await {
            warn!(user_id = %user.id, error = %e, "Failed to send password reset email");
        }

        Ok(())
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), DomainError> {
        let mut user = self
            .repository
            .get_by_reset_token(token)
            .await?
            .filter(|u| u.reset_token_valid_at(Utc::now()))
            .ok_or_else(|| DomainError::validation("Invalid or expired reset token"))?;

        validate_password(new_password)?;
        user.set_password_hash(self.hasher.hash(new_password)?);
        self.repository.update(&user).await?;

        info!(user_id = %user.id, "Password reset");
        Ok(())
    }

    /// Create the first admin. Refused once any admin exists.
    pub async fn setup_admin(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, DomainError> {
        if self.repository.admin_exists().await? {
            return Err(DomainError::conflict("An admin account already exists"));
        }

        validate_username(username)?;
        validate_email(email, self.allowed_email_domain.as_deref())?;
        validate_password(password)?;

        let password_hash = self.hasher.hash(password)?;
        let user = self
            .repository
            .create_with_profile(
                NewUser::admin(username, email, password_hash),
                NewProfile::default(),
            )
            .await?;

        info!(user_id = %user.id, "Admin account created");
        Ok(user)
    }

    /// Approve or revoke a mentor. Approval also marks the email verified.
    pub async fn set_mentor_approval(
        &self,
        user_id: UserId,
        approved: bool,
    ) -> Result<User, DomainError> {
        let mut user = self
            .repository
            .get(user_id)
            .await?
            .filter(|u| u.is_mentor)
            .ok_or_else(|| DomainError::not_found(format!("Mentor {} not found", user_id)))?;

        user.set_approval(approved);
        let user = self.repository.update(&user).await?;

        info!(user_id = %user.id, approved, "Mentor approval updated");
        Ok(user)
    }

    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.repository.list().await
    }

    pub async fn stats(&self) -> Result<UserStats, DomainError> {
        self.repository.stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::notification::{LogNotifier, MockNotifier};
    use crate::infrastructure::storage::MemoryDatabase;
    use crate::infrastructure::user::{Argon2Hasher, InMemoryUserRepository};

    fn service_with(notifier: Arc<dyn Notifier>) -> UserService {
        UserService::new(
            Arc::new(InMemoryUserRepository::new(MemoryDatabase::new())),
            Arc::new(Argon2Hasher::new()),
            notifier,
        )
    }

    fn service() -> UserService {
        service_with(Arc::new(LogNotifier))
    }

    fn registration(username: &str, email: &str) -> RegistrationRequest {
        RegistrationRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
            profile: NewProfile::default(),
        }
    }

    #[tokio::test]
    async fn test_register_mentee_sends_verification() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_send_verification()
            .times(1)
            .returning(|_, _| Ok(()));

        let service = service_with(Arc::new(notifier));
        let user = service
            .register_mentee(registration("ana", "ana@example.com"))
            .await
            .unwrap();

        assert!(user.is_approved);
        assert!(!user.email_verified);
        assert!(user.verification_token.is_some());
    }

    #[tokio::test]
    async fn test_register_mentor_pending_approval() {
        let service = service();
        let user = service
            .register_mentor(registration("bob", "bob@example.com"))
            .await
            .unwrap();

        assert!(user.is_mentor);
        assert!(!user.is_approved);
        assert!(user.email_verified);
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_input() {
        let service = service();

        let mut bad_password = registration("ana", "ana@example.com");
        bad_password.password = "short".into();
        assert!(matches!(
            service.register_mentee(bad_password).await,
            Err(DomainError::Validation { .. })
        ));

        let bad_email = registration("ana", "not-an-email");
        assert!(service.register_mentee(bad_email).await.is_err());
    }

    #[tokio::test]
    async fn test_register_rejects_short_username() {
        let service = service();

        let result = service
            .register_mentor(registration("bo", "bo@example.com"))
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        assert!(service
            .register_mentor(registration("bob", "bo@example.com"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let service = service();
        service
            .register_mentor(registration("bob", "bob@example.com"))
            .await
            .unwrap();

        let result = service
            .register_mentee(registration("bob2", "bob@example.com"))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_allowed_domain_enforced() {
        let service = service().with_allowed_email_domain(Some("underground-ops.dev".into()));

        let result = service
            .register_mentee(registration("ana", "ana@example.com"))
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        assert!(service
            .register_mentee(registration("ana", "ana@underground-ops.dev"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_login_requires_verified_email() {
        let service = service();
        let user = service
            .register_mentee(registration("ana", "ana@example.com"))
            .await
            .unwrap();

        let result = service.authenticate("ana@example.com", "password123").await;
        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));

        let token = user.verification_token.unwrap();
        service.verify_email(&token).await.unwrap();

        let logged_in = service
            .authenticate("ana@example.com", "password123")
            .await
            .unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_login_wrong_password_or_unknown_email() {
        let service = service();
        service
            .register_mentor(registration("bob", "bob@example.com"))
            .await
            .unwrap();

        assert!(service.authenticate("bob@example.com", "wrong-pass").await.is_err());
        assert!(service
            .authenticate("nobody@example.com", "password123")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_password_reset_flow() {
        let repo = Arc::new(InMemoryUserRepository::new(MemoryDatabase::new()));
        let service = UserService::new(
            repo.clone(),
            Arc::new(Argon2Hasher::new()),
            Arc::new(LogNotifier),
        );

        service
            .register_mentor(registration("bob", "bob@example.com"))
            .await
            .unwrap();
        service.request_password_reset("bob@example.com").await.unwrap();

        let token = repo
            .get_by_email("bob@example.com")
            .await
            .unwrap()
            .and_then(|u| u.reset_token)
            .unwrap();

        service.reset_password(&token, "new-password-1").await.unwrap();
        assert!(service
            .authenticate("bob@example.com", "new-password-1")
            .await
            .is_ok());

        // Token is single use
        assert!(service.reset_password(&token, "another-pass").await.is_err());
    }

    #[tokio::test]
    async fn test_password_reset_unknown_email_is_silent() {
        let service = service();
        assert!(service.request_password_reset("ghost@example.com").await.is_ok());
    }

    #[tokio::test]
    async fn test_admin_setup_only_once() {
        let service = service();
        let admin = service
            .setup_admin("root", "root@example.com", "password123")
            .await
            .unwrap();
        assert!(admin.is_admin);

        let again = service
            .setup_admin("root2", "root2@example.com", "password123")
            .await;
        assert!(matches!(again, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_mentor_approval() {
        let service = service();
        let mentor = service
            .register_mentor(registration("bob", "bob@example.com"))
            .await
            .unwrap();
        let mentee = service
            .register_mentee(registration("ana", "ana@example.com"))
            .await
            .unwrap();

        let approved = service.set_mentor_approval(mentor.id, true).await.unwrap();
        assert!(approved.can_offer_programs());

        let result = service.set_mentor_approval(mentee.id, true).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
