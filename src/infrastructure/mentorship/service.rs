//! Mentorship lifecycle service
//!
//! Owns every role, ownership and transition rule for programs, requests,
//! sessions, feedback and availability. Callers pass the authenticated
//! [`Identity`] explicitly.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::domain::mentorship::{
    validate_rating, validate_session_window, AvailabilitySlot, MentorAnalytics,
    MentorshipProgram, MentorshipRepository, MentorshipRequest, MentorshipSession,
    MentorshipStats, NewFeedback, NewProgram, NewRequest, ProgramDraft, ProgramStatus,
    RequestStatus, SessionDraft, SessionFeedback, SessionStatus,
};
use crate::domain::profile::{split_skills, MentorSearchFilter, ProfileRepository};
use crate::domain::user::{User, UserRepository};
use crate::domain::{DomainError, Identity, ProgramId, RequestId, SessionId, UserId};

/// Offered when no approved mentor lists any skill yet
const DEFAULT_SPECIALTIES: [&str; 10] = [
    "backend development",
    "frontend development",
    "devops",
    "cloud architecture",
    "cloud native technologies",
    "mobile development",
    "data science",
    "ai",
    "nlp",
    "ml",
];

#[derive(Debug)]
pub struct MentorshipService {
    users: Arc<dyn UserRepository>,
    mentorships: Arc<dyn MentorshipRepository>,
    profiles: Arc<dyn ProfileRepository>,
}

impl MentorshipService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        mentorships: Arc<dyn MentorshipRepository>,
        profiles: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            users,
            mentorships,
            profiles,
        }
    }

    async fn acting_user(&self, identity: Identity) -> Result<User, DomainError> {
        self.users
            .get(identity.user_id())
            .await?
            .ok_or_else(|| DomainError::forbidden("Unknown user"))
    }

    async fn request(&self, id: RequestId) -> Result<MentorshipRequest, DomainError> {
        self.mentorships
            .get_request(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Request {} not found", id)))
    }

    /// Load a session together with its request, checking the caller takes part
    async fn participant_session(
        &self,
        identity: Identity,
        id: SessionId,
    ) -> Result<(MentorshipSession, MentorshipRequest), DomainError> {
        let session = self
            .mentorships
            .get_session(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Session {} not found", id)))?;
        let request = self.request(session.request_id).await?;

        if !request.involves(identity.user_id()) {
            return Err(DomainError::forbidden("Not a participant of this session"));
        }

        Ok((session, request))
    }

    // Programs

    pub async fn create_program(
        &self,
        identity: Identity,
        draft: ProgramDraft,
    ) -> Result<MentorshipProgram, DomainError> {
        let user = self.acting_user(identity).await?;
        if !user.can_offer_programs() {
            return Err(DomainError::forbidden("User is not an approved mentor"));
        }

        draft.validate()?;

        let program = self
            .mentorships
            .create_program(NewProgram {
                mentor_id: user.id,
                draft,
                status: ProgramStatus::Active,
            })
            .await?;

        info!(program_id = %program.id, mentor_id = %user.id, "Program created");
        Ok(program)
    }

    pub async fn list_mentor_programs(
        &self,
        mentor_id: UserId,
    ) -> Result<Vec<MentorshipProgram>, DomainError> {
        self.mentorships.list_programs_by_mentor(mentor_id).await
    }

    pub async fn active_mentor_programs(
        &self,
        mentor_id: UserId,
    ) -> Result<Vec<MentorshipProgram>, DomainError> {
        let programs = self.mentorships.list_programs_by_mentor(mentor_id).await?;
        Ok(programs
            .into_iter()
            .filter(|p| p.status == ProgramStatus::Active)
            .collect())
    }

    pub async fn list_available_programs(&self) -> Result<Vec<MentorshipProgram>, DomainError> {
        self.mentorships.list_active_programs().await
    }

    pub async fn program_details(&self, id: ProgramId) -> Result<MentorshipProgram, DomainError> {
        self.mentorships
            .get_program(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Program {} not found", id)))
    }

    // Requests

    /// Ask to join a program. Neither duplicates nor `max_mentees` are checked.
    pub async fn request_mentorship(
        &self,
        identity: Identity,
        program_id: ProgramId,
        message: String,
    ) -> Result<MentorshipRequest, DomainError> {
        let user = self.acting_user(identity).await?;
        if user.is_mentor {
            return Err(DomainError::forbidden("Mentors cannot request mentorship"));
        }

        let program = self.program_details(program_id).await?;

        let request = self
            .mentorships
            .create_request(NewRequest {
                mentee_id: user.id,
                program_id,
                mentor_id: program.mentor_id,
                message,
            })
            .await?;

        info!(request_id = %request.id, program_id = %program_id, "Mentorship requested");
        Ok(request)
    }

    /// Mentor's approve/reject decision. A later decision overwrites an
    /// earlier one until the request is completed or cancelled.
    pub async fn respond_to_request(
        &self,
        identity: Identity,
        request_id: RequestId,
        approve: bool,
    ) -> Result<MentorshipRequest, DomainError> {
        let request = self.request(request_id).await?;

        if !identity.is(request.mentor_id) {
            return Err(DomainError::forbidden("Request belongs to a different mentor"));
        }
        if !request.status.accepts_response() {
            return Err(DomainError::conflict(format!(
                "Request {} is already {}",
                request_id, request.status
            )));
        }

        let status = RequestStatus::from_decision(approve);
        let request = self
            .mentorships
            .update_request_status(request_id, status)
            .await?;

        info!(request_id = %request_id, status = %status, "Request answered");
        Ok(request)
    }

    /// Move a request along its lifecycle. Approve and reject are mentor-only.
    pub async fn update_request_status(
        &self,
        identity: Identity,
        request_id: RequestId,
        target: RequestStatus,
    ) -> Result<MentorshipRequest, DomainError> {
        let request = self.request(request_id).await?;

        if !request.involves(identity.user_id()) {
            return Err(DomainError::forbidden("Not a participant of this request"));
        }
        if matches!(target, RequestStatus::Approved | RequestStatus::Rejected)
            && !identity.is(request.mentor_id)
        {
            return Err(DomainError::forbidden("Only the mentor can approve or reject"));
        }
        if !request.status.can_transition_to(target) {
            return Err(DomainError::conflict(format!(
                "Cannot move request from {} to {}",
                request.status, target
            )));
        }

        let request = self
            .mentorships
            .update_request_status(request_id, target)
            .await?;

        info!(request_id = %request_id, status = %target, "Request status updated");
        Ok(request)
    }

    pub async fn list_mentee_requests(
        &self,
        mentee_id: UserId,
    ) -> Result<Vec<MentorshipRequest>, DomainError> {
        self.mentorships.list_requests_by_mentee(mentee_id).await
    }

    pub async fn list_mentor_requests(
        &self,
        mentor_id: UserId,
    ) -> Result<Vec<MentorshipRequest>, DomainError> {
        self.mentorships
            .list_requests_by_mentor(mentor_id, None)
            .await
    }

    pub async fn pending_requests(
        &self,
        mentor_id: UserId,
    ) -> Result<Vec<MentorshipRequest>, DomainError> {
        self.mentorships
            .list_requests_by_mentor(mentor_id, Some(RequestStatus::Pending))
            .await
    }

    pub async fn active_mentorships(
        &self,
        user_id: UserId,
    ) -> Result<Vec<MentorshipRequest>, DomainError> {
        self.mentorships
            .list_approved_requests_for_user(user_id)
            .await
    }

    // Sessions

    pub async fn schedule_session(
        &self,
        identity: Identity,
        draft: SessionDraft,
    ) -> Result<MentorshipSession, DomainError> {
        let request = self.request(draft.request_id).await?;

        if !request.involves(identity.user_id()) {
            return Err(DomainError::forbidden("Not a participant of this mentorship"));
        }

        validate_session_window(draft.start_time, draft.end_time, Utc::now())?;

        let session = self.mentorships.create_session(draft).await?;

        info!(session_id = %session.id, request_id = %request.id, "Session scheduled");
        Ok(session)
    }

    pub async fn update_session_status(
        &self,
        identity: Identity,
        session_id: SessionId,
        target: SessionStatus,
    ) -> Result<MentorshipSession, DomainError> {
        let (session, _) = self.participant_session(identity, session_id).await?;

        if !session.status.can_transition_to(target) {
            return Err(DomainError::conflict(format!(
                "Cannot move session from {} to {}",
                session.status, target
            )));
        }

        let session = self
            .mentorships
            .update_session_status(session_id, target)
            .await?;

        info!(session_id = %session_id, status = %target, "Session status updated");
        Ok(session)
    }

    pub async fn upcoming_sessions(
        &self,
        user_id: UserId,
    ) -> Result<Vec<MentorshipSession>, DomainError> {
        self.mentorships
            .list_upcoming_sessions(user_id, Utc::now())
            .await
    }

    // Feedback

    pub async fn submit_feedback(
        &self,
        identity: Identity,
        session_id: SessionId,
        rating: i32,
        comment: String,
    ) -> Result<SessionFeedback, DomainError> {
        self.participant_session(identity, session_id).await?;
        validate_rating(rating)?;

        let feedback = self
            .mentorships
            .create_feedback(NewFeedback {
                session_id,
                user_id: identity.user_id(),
                rating,
                comment,
            })
            .await?;

        debug!(session_id = %session_id, rating, "Feedback submitted");
        Ok(feedback)
    }

    pub async fn session_feedback(
        &self,
        identity: Identity,
        session_id: SessionId,
    ) -> Result<Vec<SessionFeedback>, DomainError> {
        self.participant_session(identity, session_id).await?;
        self.mentorships.list_feedback(session_id).await
    }

    // Mentor insight

    pub async fn mentor_analytics(&self, mentor_id: UserId) -> Result<MentorAnalytics, DomainError> {
        let counts = self.mentorships.session_counts_for_mentor(mentor_id).await?;
        let rating = self.mentorships.rating_summary_for_mentor(mentor_id).await?;
        let mentees: HashSet<UserId> = self
            .mentorships
            .list_approved_requests_for_user(mentor_id)
            .await?
            .into_iter()
            .filter(|r| r.mentor_id == mentor_id)
            .map(|r| r.mentee_id)
            .collect();

        Ok(MentorAnalytics {
            total_sessions: counts.total,
            completed_sessions: counts.completed,
            active_mentees: mentees.len() as i64,
            average_rating: rating.average,
            rating_count: rating.count,
        })
    }

    pub async fn mentorship_stats(&self, mentor_id: UserId) -> Result<MentorshipStats, DomainError> {
        let programs = self.mentorships.list_programs_by_mentor(mentor_id).await?;
        let pending = self.pending_requests(mentor_id).await?;

        Ok(MentorshipStats {
            total_programs: programs.len() as i64,
            active_programs: programs
                .iter()
                .filter(|p| p.status == ProgramStatus::Active)
                .count() as i64,
            pending_requests: pending.len() as i64,
        })
    }

    /// Distinct skills offered by approved mentors, alphabetical
    pub async fn available_specialties(&self) -> Result<Vec<String>, DomainError> {
        let mentors = self
            .profiles
            .search_mentors(&MentorSearchFilter::default())
            .await?;

        let specialties: BTreeSet<String> = mentors
            .iter()
            .flat_map(|m| split_skills(&m.skills))
            .collect();

        if specialties.is_empty() {
            return Ok(DEFAULT_SPECIALTIES.iter().map(|s| s.to_string()).collect());
        }

        Ok(specialties.into_iter().collect())
    }

    // Availability

    pub async fn update_availability(
        &self,
        identity: Identity,
        slots: Vec<AvailabilitySlot>,
    ) -> Result<Vec<AvailabilitySlot>, DomainError> {
        let user = self.acting_user(identity).await?;
        if !user.is_mentor {
            return Err(DomainError::forbidden("Only mentors publish availability"));
        }

        for slot in &slots {
            slot.validate()?;
        }

        let slots = self
            .mentorships
            .replace_availability(user.id, slots)
            .await?;

        info!(mentor_id = %user.id, slots = slots.len(), "Availability updated");
        Ok(slots)
    }

    pub async fn availability(
        &self,
        mentor_id: UserId,
    ) -> Result<Vec<AvailabilitySlot>, DomainError> {
        self.mentorships.list_availability(mentor_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveTime};

    use crate::domain::profile::NewProfile;
    use crate::domain::user::NewUser;
    use crate::infrastructure::mentorship::InMemoryMentorshipRepository;
    use crate::infrastructure::notification::LogNotifier;
    use crate::infrastructure::profile::InMemoryProfileRepository;
    use crate::infrastructure::storage::MemoryDatabase;
    use crate::infrastructure::user::{Argon2Hasher, InMemoryUserRepository, UserService};

    struct Fixture {
        users: Arc<InMemoryUserRepository>,
        service: MentorshipService,
    }

    fn fixture() -> Fixture {
        let db = MemoryDatabase::new();
        let users = Arc::new(InMemoryUserRepository::new(db.clone()));

        Fixture {
            users: users.clone(),
            service: MentorshipService::new(
                users,
                Arc::new(InMemoryMentorshipRepository::new(db.clone())),
                Arc::new(InMemoryProfileRepository::new(db)),
            ),
        }
    }

    impl Fixture {
        async fn mentor(&self, name: &str, approved: bool) -> Identity {
            let mut user = self
                .users
                .create_with_profile(
                    NewUser::mentor(name, format!("{}@example.com", name), "hash"),
                    NewProfile {
                        skills: "Rust, Databases".into(),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            if approved {
                user.set_approval(true);
                self.users.update(&user).await.unwrap();
            }
            Identity::new(user.id)
        }

        async fn mentee(&self, name: &str) -> Identity {
            let user = self
                .users
                .create_with_profile(
                    NewUser::mentee(name, format!("{}@example.com", name), "hash", "token"),
                    NewProfile::default(),
                )
                .await
                .unwrap();
            Identity::new(user.id)
        }

        async fn program(&self, mentor: Identity, max_mentees: i32) -> MentorshipProgram {
            self.service
                .create_program(mentor, draft(max_mentees))
                .await
                .unwrap()
        }
    }

    fn draft(max_mentees: i32) -> ProgramDraft {
        ProgramDraft {
            title: "Async Rust".into(),
            description: "Futures, executors and cancellation".into(),
            duration: "4 weeks".into(),
            price: 100.0,
            max_mentees,
        }
    }

    fn session_draft(request_id: RequestId, start_in: Duration, length: Duration) -> SessionDraft {
        let start = Utc::now() + start_in;
        SessionDraft {
            request_id,
            title: "Kickoff".into(),
            topic: "Goals".into(),
            start_time: start,
            end_time: start + length,
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_program_requires_approved_mentor() {
        let f = fixture();
        let pending = f.mentor("bo", false).await;
        let mentee = f.mentee("ana").await;

        for identity in [pending, mentee] {
            let result = f.service.create_program(identity, draft(2)).await;
            assert!(matches!(result, Err(DomainError::Forbidden { .. })));
        }

        let approved = f.mentor("cy", true).await;
        let program = f.service.create_program(approved, draft(2)).await.unwrap();
        assert_eq!(program.status, ProgramStatus::Active);
        assert_eq!(program.mentor_id, approved.user_id());
    }

    #[tokio::test]
    async fn test_create_program_validates_draft() {
        let f = fixture();
        let mentor = f.mentor("bo", true).await;

        let mut bad = draft(2);
        bad.description = String::new();
        let result = f.service.create_program(mentor, bad).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        let result = f.service.create_program(mentor, draft(0)).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_approval_enables_program_creation() {
        let f = fixture();
        let mentor = f.mentor("bo", false).await;

        let result = f.service.create_program(mentor, draft(3)).await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));

        let users = UserService::new(
            f.users.clone(),
            Arc::new(Argon2Hasher::new()),
            Arc::new(LogNotifier),
        );
        users
            .set_mentor_approval(mentor.user_id(), true)
            .await
            .unwrap();

        let program = f.service.create_program(mentor, draft(3)).await.unwrap();
        assert_eq!(program.status, ProgramStatus::Active);
    }

    #[tokio::test]
    async fn test_request_mentorship_rules() {
        let f = fixture();
        let mentor = f.mentor("bo", true).await;
        let other_mentor = f.mentor("cy", true).await;
        let mentee = f.mentee("ana").await;
        let program = f.program(mentor, 2).await;

        let result = f
            .service
            .request_mentorship(other_mentor, program.id, "hi".into())
            .await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));

        let missing = f
            .service
            .request_mentorship(mentee, ProgramId::new(999).unwrap(), String::new())
            .await;
        assert!(matches!(missing, Err(DomainError::NotFound { .. })));

        let request = f
            .service
            .request_mentorship(mentee, program.id, "I'd like to learn".into())
            .await
            .unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.mentor_id, mentor.user_id());
        assert_eq!(
            f.service.list_mentee_requests(mentee.user_id()).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_max_mentees_not_enforced() {
        let f = fixture();
        let mentor = f.mentor("bo", true).await;
        let program = f.program(mentor, 1).await;

        for name in ["ana", "dan"] {
            let mentee = f.mentee(name).await;
            let request = f
                .service
                .request_mentorship(mentee, program.id, String::new())
                .await
                .unwrap();
            assert_eq!(request.status, RequestStatus::Pending);
        }

        let pending = f.service.pending_requests(mentor.user_id()).await.unwrap();
        assert_eq!(pending.len(), 2);
    }

    #[tokio::test]
    async fn test_respond_to_request_is_owner_only_and_overwritable() {
        let f = fixture();
        let mentor = f.mentor("bo", true).await;
        let intruder = f.mentor("cy", true).await;
        let mentee = f.mentee("ana").await;
        let program = f.program(mentor, 2).await;
        let request = f
            .service
            .request_mentorship(mentee, program.id, String::new())
            .await
            .unwrap();

        let result = f.service.respond_to_request(intruder, request.id, true).await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));

        let approved = f
            .service
            .respond_to_request(mentor, request.id, true)
            .await
            .unwrap();
        assert_eq!(approved.status, RequestStatus::Approved);

        let rejected = f
            .service
            .respond_to_request(mentor, request.id, false)
            .await
            .unwrap();
        assert_eq!(rejected.status, RequestStatus::Rejected);

        let again = f
            .service
            .respond_to_request(mentor, request.id, false)
            .await
            .unwrap();
        assert_eq!(again.status, RequestStatus::Rejected);

        let missing = f
            .service
            .respond_to_request(mentor, RequestId::new(999).unwrap(), true)
            .await;
        assert!(matches!(missing, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_request_lifecycle_transitions() {
        let f = fixture();
        let mentor = f.mentor("bo", true).await;
        let mentee = f.mentee("ana").await;
        let program = f.program(mentor, 2).await;
        let request = f
            .service
            .request_mentorship(mentee, program.id, String::new())
            .await
            .unwrap();

        // Only the mentor decides
        let result = f
            .service
            .update_request_status(mentee, request.id, RequestStatus::Approved)
            .await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));

        f.service
            .update_request_status(mentor, request.id, RequestStatus::Approved)
            .await
            .unwrap();
        let done = f
            .service
            .update_request_status(mentee, request.id, RequestStatus::Completed)
            .await
            .unwrap();
        assert_eq!(done.status, RequestStatus::Completed);

        let reopened = f
            .service
            .update_request_status(mentor, request.id, RequestStatus::Cancelled)
            .await;
        assert!(matches!(reopened, Err(DomainError::Conflict { .. })));

        let late_decision = f.service.respond_to_request(mentor, request.id, true).await;
        assert!(matches!(late_decision, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_schedule_session_window_and_participants() {
        let f = fixture();
        let mentor = f.mentor("bo", true).await;
        let mentee = f.mentee("ana").await;
        let stranger = f.mentee("eve").await;
        let program = f.program(mentor, 2).await;
        let request = f
            .service
            .request_mentorship(mentee, program.id, String::new())
            .await
            .unwrap();

        let ok = session_draft(request.id, Duration::hours(24), Duration::hours(1));
        let result = f.service.schedule_session(stranger, ok.clone()).await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));

        for bad in [
            session_draft(request.id, Duration::hours(-1), Duration::minutes(30)),
            session_draft(request.id, Duration::hours(1), Duration::zero()),
            session_draft(request.id, Duration::hours(1), Duration::hours(-1)),
            session_draft(request.id, Duration::hours(1), Duration::hours(4) + Duration::minutes(1)),
        ] {
            let result = f.service.schedule_session(mentee, bad).await;
            assert!(matches!(result, Err(DomainError::Validation { .. })));
        }
        assert!(f
            .service
            .upcoming_sessions(mentee.user_id())
            .await
            .unwrap()
            .is_empty());

        let session = f.service.schedule_session(mentor, ok).await.unwrap();
        assert_eq!(session.status, SessionStatus::Scheduled);

        let upcoming = f.service.upcoming_sessions(mentee.user_id()).await.unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].id, session.id);
    }

    #[tokio::test]
    async fn test_schedule_session_unknown_request() {
        let f = fixture();
        let mentee = f.mentee("ana").await;
        let draft = session_draft(RequestId::new(77).unwrap(), Duration::hours(2), Duration::hours(1));

        let result = f.service.schedule_session(mentee, draft).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_session_completion_feedback_and_analytics() {
        let f = fixture();
        let mentor = f.mentor("bo", true).await;
        let mentee = f.mentee("ana").await;
        let program = f.program(mentor, 2).await;
        let request = f
            .service
            .request_mentorship(mentee, program.id, String::new())
            .await
            .unwrap();
        f.service
            .respond_to_request(mentor, request.id, true)
            .await
            .unwrap();

        let session = f
            .service
            .schedule_session(
                mentee,
                session_draft(request.id, Duration::hours(3), Duration::hours(2)),
            )
            .await
            .unwrap();

        f.service
            .update_session_status(mentor, session.id, SessionStatus::Completed)
            .await
            .unwrap();
        let again = f
            .service
            .update_session_status(mentor, session.id, SessionStatus::Cancelled)
            .await;
        assert!(matches!(again, Err(DomainError::Conflict { .. })));

        let bad_rating = f
            .service
            .submit_feedback(mentee, session.id, 6, String::new())
            .await;
        assert!(matches!(bad_rating, Err(DomainError::Validation { .. })));

        f.service
            .submit_feedback(mentee, session.id, 4, "Very helpful".into())
            .await
            .unwrap();
        let second_rating = f
            .service
            .submit_feedback(mentee, session.id, 1, String::new())
            .await;
        assert!(matches!(second_rating, Err(DomainError::Conflict { .. })));
        assert_eq!(
            f.service
                .session_feedback(mentor, session.id)
                .await
                .unwrap()
                .len(),
            1
        );

        let analytics = f.service.mentor_analytics(mentor.user_id()).await.unwrap();
        assert_eq!(analytics.total_sessions, 1);
        assert_eq!(analytics.completed_sessions, 1);
        assert_eq!(analytics.active_mentees, 1);
        assert_eq!(analytics.average_rating, Some(4.0));

        let stats = f.service.mentorship_stats(mentor.user_id()).await.unwrap();
        assert_eq!(stats.total_programs, 1);
        assert_eq!(stats.active_programs, 1);
        assert_eq!(stats.pending_requests, 0);

        let active = f.service.active_mentorships(mentee.user_id()).await.unwrap();
        assert_eq!(active.len(), 1);
    }

    #[tokio::test]
    async fn test_availability_is_mentor_only_and_validated() {
        let f = fixture();
        let mentor = f.mentor("bo", false).await;
        let mentee = f.mentee("ana").await;

        let slot = AvailabilitySlot {
            day_of_week: 2,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
        };

        let result = f
            .service
            .update_availability(mentee, vec![slot.clone()])
            .await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));

        let invalid = AvailabilitySlot {
            day_of_week: 9,
            ..slot.clone()
        };
        assert!(f
            .service
            .update_availability(mentor, vec![slot.clone(), invalid])
            .await
            .is_err());

        f.service
            .update_availability(mentor, vec![slot.clone()])
            .await
            .unwrap();
        assert_eq!(
            f.service.availability(mentor.user_id()).await.unwrap(),
            vec![slot]
        );
    }

    #[tokio::test]
    async fn test_specialties_from_approved_mentors() {
        let f = fixture();
        let defaults = f.service.available_specialties().await.unwrap();
        assert_eq!(defaults.len(), DEFAULT_SPECIALTIES.len());

        f.mentor("bo", true).await;
        assert_eq!(
            f.service.available_specialties().await.unwrap(),
            vec!["databases".to_string(), "rust".to_string()]
        );
    }
}
