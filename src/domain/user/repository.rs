//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewUser, User, UserId, UserStats};
use crate::domain::profile::NewProfile;
use crate::domain::DomainError;

/// Repository trait for user storage
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their ID
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by email (for login)
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    async fn get_by_verification_token(&self, token: &str) -> Result<Option<User>, DomainError>;

    async fn get_by_reset_token(&self, token: &str) -> Result<Option<User>, DomainError>;

    /// Create a user and its profile as one unit; neither is stored if either fails.
    ///
    /// Duplicate email or username yields `DomainError::Conflict`.
    async fn create_with_profile(
        &self,
        user: NewUser,
        profile: NewProfile,
    ) -> Result<User, DomainError>;

    /// Update an existing user
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// List all users, newest first
    async fn list(&self) -> Result<Vec<User>, DomainError>;

    async fn admin_exists(&self) -> Result<bool, DomainError>;

    async fn stats(&self) -> Result<UserStats, DomainError>;

    /// Record a login for a user
    async fn record_login(&self, id: UserId) -> Result<(), DomainError>;
}
