//! Mentorship programs, requests, sessions and feedback

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::{ProgramStatus, RequestStatus, SessionStatus};
use crate::domain::id::{FeedbackId, ProgramId, RequestId, SessionId, UserId};
use crate::domain::DomainError;

/// Upper bound on a single session, in hours
pub const MAX_SESSION_HOURS: i64 = 4;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// A mentor-authored offering mentees can request to join
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorshipProgram {
    pub id: ProgramId,
    pub mentor_id: UserId,
    pub title: String,
    pub description: String,
    /// Free text, e.g. "6 weeks"
    pub duration: String,
    pub price: f64,
    /// Declared capacity. Not enforced against request counts.
    pub max_mentees: i32,
    pub status: ProgramStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Program fields supplied by the mentor
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramDraft {
    pub title: String,
    pub description: String,
    pub duration: String,
    #[serde(default)]
    pub price: f64,
    pub max_mentees: i32,
}

impl ProgramDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("title is required"));
        }
        if self.description.trim().is_empty() {
            return Err(DomainError::validation("description is required"));
        }
        if self.duration.trim().is_empty() {
            return Err(DomainError::validation("duration is required"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(DomainError::validation("price cannot be negative"));
        }
        if self.max_mentees < 1 {
            return Err(DomainError::validation("max_mentees must be at least 1"));
        }
        Ok(())
    }
}

/// Program ready to be inserted
#[derive(Debug, Clone)]
pub struct NewProgram {
    pub mentor_id: UserId,
    pub draft: ProgramDraft,
    pub status: ProgramStatus,
}

impl NewProgram {
    pub fn into_program(self, id: ProgramId) -> MentorshipProgram {
        let now = Utc::now();

        MentorshipProgram {
            id,
            mentor_id: self.mentor_id,
            title: self.draft.title,
            description: self.draft.description,
            duration: self.draft.duration,
            price: self.draft.price,
            max_mentees: self.draft.max_mentees,
            status: self.status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A mentee's ask to join a program
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorshipRequest {
    pub id: RequestId,
    pub mentee_id: UserId,
    pub program_id: ProgramId,
    /// Copied from the program when the request is made
    pub mentor_id: UserId,
    pub message: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MentorshipRequest {
    pub fn involves(&self, user: UserId) -> bool {
        self.mentor_id == user || self.mentee_id == user
    }
}

#[derive(Debug, Clone)]
pub struct NewRequest {
    pub mentee_id: UserId,
    pub program_id: ProgramId,
    pub mentor_id: UserId,
    pub message: String,
}

impl NewRequest {
    pub fn into_request(self, id: RequestId) -> MentorshipRequest {
        let now = Utc::now();

        MentorshipRequest {
            id,
            mentee_id: self.mentee_id,
            program_id: self.program_id,
            mentor_id: self.mentor_id,
            message: self.message,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Meeting scheduled under a request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorshipSession {
    pub id: SessionId,
    pub request_id: RequestId,
    pub title: String,
    pub topic: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub notes: String,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Session fields supplied by a participant. Any status in the input is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionDraft {
    pub request_id: RequestId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub topic: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
}

impl SessionDraft {
    pub fn into_session(self, id: SessionId) -> MentorshipSession {
        let now = Utc::now();

        MentorshipSession {
            id,
            request_id: self.request_id,
            title: self.title,
            topic: self.topic,
            start_time: self.start_time,
            end_time: self.end_time,
            notes: self.notes,
            status: SessionStatus::Scheduled,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Checks, in order: start not in the past, end after start, at most four hours.
pub fn validate_session_window(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    if start < now {
        return Err(DomainError::validation("session cannot start in the past"));
    }
    if end <= start {
        return Err(DomainError::validation("session end time must be after start time"));
    }
    if end - start > Duration::hours(MAX_SESSION_HOURS) {
        return Err(DomainError::validation("session cannot exceed 4 hours"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionFeedback {
    pub id: FeedbackId,
    pub session_id: SessionId,
    pub user_id: UserId,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub rating: i32,
    pub comment: String,
}

impl NewFeedback {
    pub fn into_feedback(self, id: FeedbackId) -> SessionFeedback {
        SessionFeedback {
            id,
            session_id: self.session_id,
            user_id: self.user_id,
            rating: self.rating,
            comment: self.comment,
            created_at: Utc::now(),
        }
    }
}

pub fn validate_rating(rating: i32) -> Result<(), DomainError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(DomainError::validation(format!(
            "rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }
    Ok(())
}

/// Weekly recurring slot in which a mentor takes sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    /// 0 = Sunday
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl AvailabilitySlot {
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(0..=6).contains(&self.day_of_week) {
            return Err(DomainError::validation("day_of_week must be between 0 and 6"));
        }
        if self.end_time <= self.start_time {
            return Err(DomainError::validation("availability end must be after start"));
        }
        Ok(())
    }
}

/// Average of feedback ratings; `average` is `None` without any feedback
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RatingSummary {
    pub average: Option<f64>,
    pub count: i64,
}

/// Session counters for one mentor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionCounts {
    pub total: i64,
    pub completed: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MentorAnalytics {
    pub total_sessions: i64,
    pub completed_sessions: i64,
    pub active_mentees: i64,
    pub average_rating: Option<f64>,
    pub rating_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MentorshipStats {
    pub total_programs: i64,
    pub active_programs: i64,
    pub pending_requests: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProgramDraft {
        ProgramDraft {
            title: "Rust from zero".into(),
            description: "Ownership, lifetimes, async".into(),
            duration: "6 weeks".into(),
            price: 0.0,
            max_mentees: 3,
        }
    }

    #[test]
    fn test_program_draft_validation() {
        assert!(draft().validate().is_ok());

        let mut d = draft();
        d.title = "  ".into();
        assert!(d.validate().is_err());

        let mut d = draft();
        d.price = -5.0;
        assert!(d.validate().is_err());

        let mut d = draft();
        d.max_mentees = 0;
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_program_draft_requires_description_field() {
        let missing = serde_json::from_value::<ProgramDraft>(serde_json::json!({
            "title": "Go",
            "duration": "2 weeks",
            "max_mentees": 1
        }));
        assert!(missing.is_err());

        let free = serde_json::from_value::<ProgramDraft>(serde_json::json!({
            "title": "Go",
            "description": "Basics",
            "duration": "2 weeks",
            "max_mentees": 1
        }))
        .unwrap();
        assert_eq!(free.price, 0.0);
    }

    #[test]
    fn test_session_window_order_of_checks() {
        let now = Utc::now();

        // In the past and inverted: the past check wins
        let err = validate_session_window(now - Duration::hours(2), now - Duration::hours(3), now)
            .unwrap_err();
        assert!(err.to_string().contains("past"));

        let err = validate_session_window(now + Duration::hours(1), now + Duration::hours(1), now)
            .unwrap_err();
        assert!(err.to_string().contains("after start"));

        let err = validate_session_window(
            now + Duration::hours(1),
            now + Duration::hours(5) + Duration::minutes(1),
            now,
        )
        .unwrap_err();
        assert!(err.to_string().contains("4 hours"));
    }

    #[test]
    fn test_session_window_boundaries() {
        let now = Utc::now();
        let max = Duration::hours(MAX_SESSION_HOURS);
        assert!(validate_session_window(now, now + max, now).is_ok());
        assert!(validate_session_window(now, now + max + Duration::seconds(1), now).is_err());
    }

    #[test]
    fn test_rating_range() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn test_availability_slot_validation() {
        let slot = AvailabilitySlot {
            day_of_week: 1,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        };
        assert!(slot.validate().is_ok());

        let bad_day = AvailabilitySlot {
            day_of_week: 7,
            ..slot.clone()
        };
        assert!(bad_day.validate().is_err());

        let inverted = AvailabilitySlot {
            start_time: slot.end_time,
            end_time: slot.start_time,
            ..slot
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_new_request_starts_pending() {
        let request = NewRequest {
            mentee_id: UserId::new(2).unwrap(),
            program_id: ProgramId::new(1).unwrap(),
            mentor_id: UserId::new(1).unwrap(),
            message: "hi".into(),
        }
        .into_request(RequestId::new(1).unwrap());

        assert_eq!(request.status, RequestStatus::Pending);
        assert!(request.involves(UserId::new(1).unwrap()));
        assert!(request.involves(UserId::new(2).unwrap()));
        assert!(!request.involves(UserId::new(3).unwrap()));
    }
}
