//! Section data for dashboards

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::domain::{DashboardSection, DomainError, UserId};
use crate::infrastructure::mentorship::MentorshipService;
use crate::infrastructure::profile::ProfileService;

/// Fetches one dashboard section for a user
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardSource: Send + Sync + Debug {
    async fn fetch(&self, user_id: UserId, section: DashboardSection) -> Result<Value, DomainError>;
}

/// Section source backed by the profile and mentorship services
#[derive(Debug, Clone)]
pub struct ServiceDashboardSource {
    profiles: Arc<ProfileService>,
    mentorships: Arc<MentorshipService>,
}

impl ServiceDashboardSource {
    pub fn new(profiles: Arc<ProfileService>, mentorships: Arc<MentorshipService>) -> Self {
        Self {
            profiles,
            mentorships,
        }
    }
}

#[async_trait]
impl DashboardSource for ServiceDashboardSource {
    async fn fetch(&self, user_id: UserId, section: DashboardSection) -> Result<Value, DomainError> {
        match section {
            DashboardSection::Profile => to_value(self.profiles.profile(user_id).await?),
            DashboardSection::ActiveMentorships => {
                to_value(self.mentorships.active_mentorships(user_id).await?)
            }
            DashboardSection::UpcomingSessions => {
                to_value(self.mentorships.upcoming_sessions(user_id).await?)
            }
            DashboardSection::RecommendedMentors => {
                to_value(self.profiles.recommended_mentors(user_id).await?)
            }
            DashboardSection::Programs => {
                to_value(self.mentorships.list_mentor_programs(user_id).await?)
            }
            DashboardSection::PendingRequests => {
                to_value(self.mentorships.pending_requests(user_id).await?)
            }
            DashboardSection::Analytics => {
                to_value(self.mentorships.mentor_analytics(user_id).await?)
            }
        }
    }
}

fn to_value<T: Serialize>(data: T) -> Result<Value, DomainError> {
    serde_json::to_value(data)
        .map_err(|e| DomainError::internal(format!("Failed to encode dashboard section: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::mentorship::{ProgramDraft, ProgramStatus};
    use crate::domain::profile::NewProfile;
    use crate::domain::user::{NewUser, UserRepository};
    use crate::domain::Identity;
    use crate::infrastructure::mentorship::InMemoryMentorshipRepository;
    use crate::infrastructure::profile::InMemoryProfileRepository;
    use crate::infrastructure::storage::MemoryDatabase;
    use crate::infrastructure::user::InMemoryUserRepository;

    #[tokio::test]
    async fn test_mentor_programs_section_includes_closed_programs() {
        let db = MemoryDatabase::new();
        let users = Arc::new(InMemoryUserRepository::new(db.clone()));
        let mentorship_repo = Arc::new(InMemoryMentorshipRepository::new(db.clone()));
        let profile_repo = Arc::new(InMemoryProfileRepository::new(db.clone()));

        let mentorships = Arc::new(MentorshipService::new(
            users.clone(),
            mentorship_repo.clone(),
            profile_repo.clone(),
        ));
        let profiles = Arc::new(ProfileService::new(profile_repo, mentorship_repo));
        let source = ServiceDashboardSource::new(profiles, mentorships.clone());

        let mut mentor = users
            .create_with_profile(
                NewUser::mentor("carol", "carol@example.com", "hash"),
                NewProfile::default(),
            )
            .await
            .unwrap();
        mentor.set_approval(true);
        users.update(&mentor).await.unwrap();

        let program = mentorships
            .create_program(
                Identity::new(mentor.id),
                ProgramDraft {
                    title: "Systems design".into(),
                    description: "Queues, caches, storage".into(),
                    duration: "4 weeks".into(),
                    price: 0.0,
                    max_mentees: 2,
                },
            )
            .await
            .unwrap();

        if let Some(stored) = db.write().await.programs.get_mut(&program.id.value()) {
            stored.status = ProgramStatus::Closed;
        }

        let section = source
            .fetch(mentor.id, DashboardSection::Programs)
            .await
            .unwrap();
        let listed = section.as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["status"], "closed");

        assert!(mentorships
            .active_mentor_programs(mentor.id)
            .await
            .unwrap()
            .is_empty());
    }
}
