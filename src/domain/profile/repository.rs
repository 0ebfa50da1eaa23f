//! Profile repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{MentorSearchFilter, MentorSummary, Profile};
use crate::domain::id::UserId;
use crate::domain::DomainError;

/// Profiles are created together with their user, see
/// [`UserRepository::create_with_profile`](crate::domain::user::UserRepository::create_with_profile).
#[async_trait]
pub trait ProfileRepository: Send + Sync + Debug {
    async fn get_by_user(&self, user_id: UserId) -> Result<Option<Profile>, DomainError>;

    async fn update(&self, profile: &Profile) -> Result<Profile, DomainError>;

    /// All profiles, newest first
    async fn list(&self) -> Result<Vec<Profile>, DomainError>;

    /// Approved mentors matching the filter, newest first
    async fn search_mentors(
        &self,
        filter: &MentorSearchFilter,
    ) -> Result<Vec<MentorSummary>, DomainError>;
}
