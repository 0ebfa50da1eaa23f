//! Mentorship repository trait
//!
//! Plain persistence. Role checks, ownership and transition rules live in
//! the mentorship service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Debug;

use super::entity::{
    AvailabilitySlot, MentorshipProgram, MentorshipRequest, MentorshipSession, NewFeedback,
    NewProgram, NewRequest, RatingSummary, SessionCounts, SessionDraft, SessionFeedback,
};
use super::status::{RequestStatus, SessionStatus};
use crate::domain::id::{ProgramId, RequestId, SessionId, UserId};
use crate::domain::DomainError;

#[async_trait]
pub trait MentorshipRepository: Send + Sync + Debug {
    // Programs

    async fn create_program(&self, program: NewProgram) -> Result<MentorshipProgram, DomainError>;

    async fn get_program(&self, id: ProgramId) -> Result<Option<MentorshipProgram>, DomainError>;

    /// All programs of a mentor regardless of status, newest first
    async fn list_programs_by_mentor(
        &self,
        mentor_id: UserId,
    ) -> Result<Vec<MentorshipProgram>, DomainError>;

    /// Active programs across all mentors, newest first
    async fn list_active_programs(&self) -> Result<Vec<MentorshipProgram>, DomainError>;

    // Requests

    async fn create_request(&self, request: NewRequest) -> Result<MentorshipRequest, DomainError>;

    async fn get_request(&self, id: RequestId) -> Result<Option<MentorshipRequest>, DomainError>;

    /// Overwrite the stored status. Errors with `NotFound` for unknown ids.
    async fn update_request_status(
        &self,
        id: RequestId,
        status: RequestStatus,
    ) -> Result<MentorshipRequest, DomainError>;

    async fn list_requests_by_mentee(
        &self,
        mentee_id: UserId,
    ) -> Result<Vec<MentorshipRequest>, DomainError>;

    /// Requests addressed to a mentor, optionally narrowed to one status
    async fn list_requests_by_mentor(
        &self,
        mentor_id: UserId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<MentorshipRequest>, DomainError>;

    /// Approved requests in which the user is mentor or mentee
    async fn list_approved_requests_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<MentorshipRequest>, DomainError>;

    // Sessions

    /// Insert with status `scheduled`
    async fn create_session(&self, session: SessionDraft)
        -> Result<MentorshipSession, DomainError>;

    async fn get_session(&self, id: SessionId) -> Result<Option<MentorshipSession>, DomainError>;

    async fn update_session_status(
        &self,
        id: SessionId,
        status: SessionStatus,
    ) -> Result<MentorshipSession, DomainError>;

    /// Scheduled sessions starting after `after` where the user participates,
    /// earliest first
    async fn list_upcoming_sessions(
        &self,
        user_id: UserId,
        after: DateTime<Utc>,
    ) -> Result<Vec<MentorshipSession>, DomainError>;

    async fn session_counts_for_mentor(
        &self,
        mentor_id: UserId,
    ) -> Result<SessionCounts, DomainError>;

    // Feedback

    async fn create_feedback(&self, feedback: NewFeedback) -> Result<SessionFeedback, DomainError>;

    async fn list_feedback(&self, session_id: SessionId) -> Result<Vec<SessionFeedback>, DomainError>;

    /// Ratings left by others on sessions the mentor ran
    async fn rating_summary_for_mentor(
        &self,
        mentor_id: UserId,
    ) -> Result<RatingSummary, DomainError>;

    // Availability

    /// Replace the mentor's weekly slots
    async fn replace_availability(
        &self,
        mentor_id: UserId,
        slots: Vec<AvailabilitySlot>,
    ) -> Result<Vec<AvailabilitySlot>, DomainError>;

    async fn list_availability(&self, mentor_id: UserId)
        -> Result<Vec<AvailabilitySlot>, DomainError>;
}
