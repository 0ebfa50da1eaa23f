//! Profile service

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::mentorship::MentorshipRepository;
use crate::domain::profile::{
    split_skills, MentorSearchFilter, MentorSummary, NotificationSettings, Profile,
    ProfileRepository, ProfileSettings, ProfileUpdate, PublicProfile,
};
use crate::domain::{DomainError, Identity, UserId};

/// Number of mentors suggested on a mentee dashboard
pub const RECOMMENDED_MENTORS_LIMIT: usize = 5;

#[derive(Debug)]
pub struct ProfileService {
    profiles: Arc<dyn ProfileRepository>,
    mentorships: Arc<dyn MentorshipRepository>,
}

impl ProfileService {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        mentorships: Arc<dyn MentorshipRepository>,
    ) -> Self {
        Self {
            profiles,
            mentorships,
        }
    }

    pub async fn profile(&self, user_id: UserId) -> Result<Profile, DomainError> {
        self.profiles
            .get_by_user(user_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("Profile for user {} not found", user_id))
            })
    }

    pub async fn update_profile(
        &self,
        identity: Identity,
        update: ProfileUpdate,
    ) -> Result<Profile, DomainError> {
        let mut profile = self.profile(identity.user_id()).await?;
        profile.apply(update)?;

        let profile = self.profiles.update(&profile).await?;
        info!(user_id = %identity.user_id(), "Profile updated");
        Ok(profile)
    }

    /// Profile as shown to other users, with the mentor's rating
    pub async fn public_profile(&self, user_id: UserId) -> Result<PublicProfile, DomainError> {
        let profile = self.profile(user_id).await?;
        let rating = self.mentorships.rating_summary_for_mentor(user_id).await?;

        Ok(PublicProfile {
            user_id: profile.user_id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            bio: profile.bio,
            skills: profile.skills,
            rate: profile.rate,
            profile_picture: profile.profile_picture,
            average_rating: rating.average,
            rating_count: rating.count,
        })
    }

    pub async fn settings(&self, identity: Identity) -> Result<ProfileSettings, DomainError> {
        Ok(self.profile(identity.user_id()).await?.settings())
    }

    pub async fn update_settings(
        &self,
        identity: Identity,
        settings: ProfileSettings,
    ) -> Result<ProfileSettings, DomainError> {
        let mut profile = self.profile(identity.user_id()).await?;
        profile.set_settings(settings);

        Ok(self.profiles.update(&profile).await?.settings())
    }

    pub async fn notification_settings(
        &self,
        identity: Identity,
    ) -> Result<NotificationSettings, DomainError> {
        Ok(self.profile(identity.user_id()).await?.notification_settings())
    }

    pub async fn update_notification_settings(
        &self,
        identity: Identity,
        settings: NotificationSettings,
    ) -> Result<NotificationSettings, DomainError> {
        let mut profile = self.profile(identity.user_id()).await?;
        profile.set_notification_settings(&settings)?;

        Ok(self.profiles.update(&profile).await?.notification_settings())
    }

    pub async fn search_mentors(
        &self,
        filter: &MentorSearchFilter,
    ) -> Result<Vec<MentorSummary>, DomainError> {
        filter.validate()?;
        let mentors = self.profiles.search_mentors(filter).await?;

        debug!(results = mentors.len(), "Mentor search");
        Ok(mentors)
    }

    /// Approved mentors sharing a skill with the user. Users without skills
    /// get the newest approved mentors.
    pub async fn recommended_mentors(
        &self,
        user_id: UserId,
    ) -> Result<Vec<MentorSummary>, DomainError> {
        let profile = self.profile(user_id).await?;
        let wanted: HashSet<String> = profile.skill_list().into_iter().collect();
        let mentors = self
            .profiles
            .search_mentors(&MentorSearchFilter::default())
            .await?;

        let recommended = mentors
            .into_iter()
            .filter(|m| m.user_id != user_id)
            .filter(|m| {
                wanted.is_empty() || split_skills(&m.skills).iter().any(|s| wanted.contains(s))
            })
            .take(RECOMMENDED_MENTORS_LIMIT)
            .collect();

        Ok(recommended)
    }

    pub async fn list(&self) -> Result<Vec<Profile>, DomainError> {
        self.profiles.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::NewProfile;
    use crate::domain::user::{NewUser, UserRepository};
    use crate::infrastructure::mentorship::InMemoryMentorshipRepository;
    use crate::infrastructure::profile::InMemoryProfileRepository;
    use crate::infrastructure::storage::MemoryDatabase;
    use crate::infrastructure::user::InMemoryUserRepository;

    struct Fixture {
        users: InMemoryUserRepository,
        service: ProfileService,
    }

    fn fixture() -> Fixture {
        let db = MemoryDatabase::new();
        Fixture {
            users: InMemoryUserRepository::new(db.clone()),
            service: ProfileService::new(
                Arc::new(InMemoryProfileRepository::new(db.clone())),
                Arc::new(InMemoryMentorshipRepository::new(db)),
            ),
        }
    }

    async fn mentor(
        users: &InMemoryUserRepository,
        name: &str,
        skills: &str,
        approved: bool,
    ) -> UserId {
        let mut user = users
            .create_with_profile(
                NewUser::mentor(name, &format!("{}@example.com", name), "hash"),
                NewProfile {
                    first_name: name.into(),
                    skills: skills.into(),
                    rate: 40.0,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        if approved {
            user.set_approval(true);
            users.update(&user).await.unwrap();
        }
        user.id
    }

    async fn mentee(users: &InMemoryUserRepository, name: &str, skills: &str) -> UserId {
        users
            .create_with_profile(
                NewUser::mentee(name, &format!("{}@example.com", name), "hash", "tok"),
                NewProfile {
                    skills: skills.into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_update_profile_is_partial() {
        let f = fixture();
        let id = mentee(&f.users, "ana", "rust").await;

        let updated = f
            .service
            .update_profile(
                Identity::new(id),
                ProfileUpdate {
                    bio: Some("Learning systems programming".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.bio, "Learning systems programming");
        assert_eq!(updated.skills, "rust");
    }

    #[tokio::test]
    async fn test_search_only_returns_approved_mentors() {
        let f = fixture();
        mentor(&f.users, "bo", "Rust, Tokio", true).await;
        mentor(&f.users, "cy", "Rust", false).await;
        mentee(&f.users, "ana", "rust").await;

        let found = f
            .service
            .search_mentors(&MentorSearchFilter {
                skills: Some("rust".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].username, "bo");
    }

    #[tokio::test]
    async fn test_recommendations_follow_skill_overlap() {
        let f = fixture();
        mentor(&f.users, "bo", "Rust, Tokio", true).await;
        mentor(&f.users, "cy", "Design", true).await;
        let ana = mentee(&f.users, "ana", "tokio").await;
        let dan = mentee(&f.users, "dan", "").await;

        let for_ana = f.service.recommended_mentors(ana).await.unwrap();
        assert_eq!(for_ana.len(), 1);
        assert_eq!(for_ana[0].username, "bo");

        let for_dan = f.service.recommended_mentors(dan).await.unwrap();
        assert_eq!(for_dan.len(), 2);
    }

    #[tokio::test]
    async fn test_public_profile_without_feedback() {
        let f = fixture();
        let bo = mentor(&f.users, "bo", "Rust", true).await;

        let public = f.service.public_profile(bo).await.unwrap();
        assert_eq!(public.rating_count, 0);
        assert!(public.average_rating.is_none());

        let missing = f.service.public_profile(UserId::new(999).unwrap()).await;
        assert!(matches!(missing, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_notification_settings_round_trip() {
        let f = fixture();
        let id = Identity::new(mentee(&f.users, "ana", "").await);

        assert_eq!(
            f.service.notification_settings(id).await.unwrap(),
            NotificationSettings::default()
        );

        let quiet = NotificationSettings {
            email_notifications: false,
            session_reminders: false,
            message_notifications: false,
            updates_notifications: false,
        };
        f.service
            .update_notification_settings(id, quiet.clone())
            .await
            .unwrap();
        assert_eq!(f.service.notification_settings(id).await.unwrap(), quiet);
    }
}
