//! In-memory mentorship repository

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::mentorship::{
    AvailabilitySlot, MentorshipProgram, MentorshipRepository, MentorshipRequest,
    MentorshipSession, NewFeedback, NewProgram, NewRequest, ProgramStatus, RatingSummary,
    RequestStatus, SessionCounts, SessionDraft, SessionFeedback, SessionStatus,
};
use crate::domain::{
    DomainError, FeedbackId, ProgramId, RequestId, SessionId, UserId,
};
use crate::infrastructure::storage::MemoryDatabase;

#[derive(Debug, Clone)]
pub struct InMemoryMentorshipRepository {
    db: MemoryDatabase,
}

impl InMemoryMentorshipRepository {
    pub fn new(db: MemoryDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MentorshipRepository for InMemoryMentorshipRepository {
    async fn create_program(&self, program: NewProgram) -> Result<MentorshipProgram, DomainError> {
        let mut tables = self.db.write().await;

        if !tables.users.contains_key(&program.mentor_id.value()) {
            return Err(DomainError::not_found(format!(
                "User {} not found",
                program.mentor_id
            )));
        }

        let id = ProgramId::new(tables.next_id())?;
        let program = program.into_program(id);
        tables.programs.insert(id.value(), program.clone());
        Ok(program)
    }

    async fn get_program(&self, id: ProgramId) -> Result<Option<MentorshipProgram>, DomainError> {
        Ok(self.db.read().await.programs.get(&id.value()).cloned())
    }

    async fn list_programs_by_mentor(
        &self,
        mentor_id: UserId,
    ) -> Result<Vec<MentorshipProgram>, DomainError> {
        let tables = self.db.read().await;
        Ok(tables
            .programs
            .values()
            .rev()
            .filter(|p| p.mentor_id == mentor_id)
            .cloned()
            .collect())
    }

    async fn list_active_programs(&self) -> Result<Vec<MentorshipProgram>, DomainError> {
        let tables = self.db.read().await;
        Ok(tables
            .programs
            .values()
            .rev()
            .filter(|p| p.status == ProgramStatus::Active)
            .cloned()
            .collect())
    }

    async fn create_request(&self, request: NewRequest) -> Result<MentorshipRequest, DomainError> {
        let mut tables = self.db.write().await;

        if !tables.programs.contains_key(&request.program_id.value()) {
            return Err(DomainError::not_found(format!(
                "Program {} not found",
                request.program_id
            )));
        }

        let id = RequestId::new(tables.next_id())?;
        let request = request.into_request(id);
        tables.requests.insert(id.value(), request.clone());
        Ok(request)
    }

    async fn get_request(&self, id: RequestId) -> Result<Option<MentorshipRequest>, DomainError> {
        Ok(self.db.read().await.requests.get(&id.value()).cloned())
    }

    async fn update_request_status(
        &self,
        id: RequestId,
        status: RequestStatus,
    ) -> Result<MentorshipRequest, DomainError> {
        let mut tables = self.db.write().await;
        let request = tables
            .requests
            .get_mut(&id.value())
            .ok_or_else(|| DomainError::not_found(format!("Request {} not found", id)))?;

        request.status = status;
        request.updated_at = Utc::now();
        Ok(request.clone())
    }

    async fn list_requests_by_mentee(
        &self,
        mentee_id: UserId,
    ) -> Result<Vec<MentorshipRequest>, DomainError> {
        let tables = self.db.read().await;
        Ok(tables
            .requests
            .values()
            .rev()
            .filter(|r| r.mentee_id == mentee_id)
            .cloned()
            .collect())
    }

    async fn list_requests_by_mentor(
        &self,
        mentor_id: UserId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<MentorshipRequest>, DomainError> {
        let tables = self.db.read().await;
        Ok(tables
            .requests
            .values()
            .rev()
            .filter(|r| r.mentor_id == mentor_id)
            .filter(|r| status.is_none_or(|s| r.status == s))
            .cloned()
            .collect())
    }

    async fn list_approved_requests_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<MentorshipRequest>, DomainError> {
        let tables = self.db.read().await;
        Ok(tables
            .requests
            .values()
            .rev()
            .filter(|r| r.status == RequestStatus::Approved && r.involves(user_id))
            .cloned()
            .collect())
    }

    async fn create_session(
        &self,
        session: SessionDraft,
    ) -> Result<MentorshipSession, DomainError> {
        let mut tables = self.db.write().await;

        if !tables.requests.contains_key(&session.request_id.value()) {
            return Err(DomainError::not_found(format!(
                "Request {} not found",
                session.request_id
            )));
        }

        let id = SessionId::new(tables.next_id())?;
        let session = session.into_session(id);
        tables.sessions.insert(id.value(), session.clone());
        Ok(session)
    }

    async fn get_session(&self, id: SessionId) -> Result<Option<MentorshipSession>, DomainError> {
        Ok(self.db.read().await.sessions.get(&id.value()).cloned())
    }

    async fn update_session_status(
        &self,
        id: SessionId,
        status: SessionStatus,
    ) -> Result<MentorshipSession, DomainError> {
        let mut tables = self.db.write().await;
        let session = tables
            .sessions
            .get_mut(&id.value())
            .ok_or_else(|| DomainError::not_found(format!("Session {} not found", id)))?;

        session.status = status;
        session.updated_at = Utc::now();
        Ok(session.clone())
    }

    async fn list_upcoming_sessions(
        &self,
        user_id: UserId,
        after: DateTime<Utc>,
    ) -> Result<Vec<MentorshipSession>, DomainError> {
        let tables = self.db.read().await;

        let mut sessions: Vec<MentorshipSession> = tables
            .sessions
            .values()
            .filter(|s| s.status == SessionStatus::Scheduled && s.start_time > after)
            .filter(|s| {
                tables
                    .session_participants(s)
                    .is_some_and(|(mentor, mentee)| mentor == user_id || mentee == user_id)
            })
            .cloned()
            .collect();

        sessions.sort_by_key(|s| s.start_time);
        Ok(sessions)
    }

    async fn session_counts_for_mentor(
        &self,
        mentor_id: UserId,
    ) -> Result<SessionCounts, DomainError> {
        let tables = self.db.read().await;

        let mut counts = SessionCounts::default();
        for session in tables.sessions.values() {
            if tables
                .session_participants(session)
                .is_some_and(|(mentor, _)| mentor == mentor_id)
            {
                counts.total += 1;
                if session.status == SessionStatus::Completed {
                    counts.completed += 1;
                }
            }
        }

        Ok(counts)
    }

    async fn create_feedback(&self, feedback: NewFeedback) -> Result<SessionFeedback, DomainError> {
        let mut tables = self.db.write().await;

        if !tables.sessions.contains_key(&feedback.session_id.value()) {
            return Err(DomainError::not_found(format!(
                "Session {} not found",
                feedback.session_id
            )));
        }
        if tables
            .feedback
            .values()
            .any(|f| f.session_id == feedback.session_id && f.user_id == feedback.user_id)
        {
            return Err(DomainError::conflict("Feedback already exists"));
        }

        let id = FeedbackId::new(tables.next_id())?;
        let feedback = feedback.into_feedback(id);
        tables.feedback.insert(id.value(), feedback.clone());
        Ok(feedback)
    }

    async fn list_feedback(&self, session_id: SessionId) -> Result<Vec<SessionFeedback>, DomainError> {
        let tables = self.db.read().await;
        Ok(tables
            .feedback
            .values()
            .filter(|f| f.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn rating_summary_for_mentor(
        &self,
        mentor_id: UserId,
    ) -> Result<RatingSummary, DomainError> {
        let tables = self.db.read().await;

        let mentored: HashSet<i64> = tables
            .sessions
            .values()
            .filter(|s| {
                tables
                    .session_participants(s)
                    .is_some_and(|(mentor, _)| mentor == mentor_id)
            })
            .map(|s| s.id.value())
            .collect();

        let ratings: Vec<i32> = tables
            .feedback
            .values()
            .filter(|f| mentored.contains(&f.session_id.value()) && f.user_id != mentor_id)
            .map(|f| f.rating)
            .collect();

        let count = ratings.len() as i64;
        let average = (count > 0)
            .then(|| ratings.iter().map(|r| f64::from(*r)).sum::<f64>() / count as f64);

        Ok(RatingSummary { average, count })
    }

    async fn replace_availability(
        &self,
        mentor_id: UserId,
        slots: Vec<AvailabilitySlot>,
    ) -> Result<Vec<AvailabilitySlot>, DomainError> {
        let mut tables = self.db.write().await;
        tables.availability.insert(mentor_id, slots.clone());
        Ok(slots)
    }

    async fn list_availability(
        &self,
        mentor_id: UserId,
    ) -> Result<Vec<AvailabilitySlot>, DomainError> {
        let tables = self.db.read().await;
        Ok(tables
            .availability
            .get(&mentor_id)
            .cloned()
            .unwrap_or_default())
    }
}
