//! Mentorship domain
//!
//! Programs offered by approved mentors, requests to join them, sessions
//! scheduled under a request and the feedback left afterwards.

mod entity;
mod repository;
mod status;

pub use entity::{
    validate_rating, validate_session_window, AvailabilitySlot, MentorAnalytics,
    MentorshipProgram, MentorshipRequest, MentorshipSession, MentorshipStats, NewFeedback,
    NewProgram, NewRequest, ProgramDraft, RatingSummary, SessionCounts, SessionDraft,
    SessionFeedback, MAX_RATING, MAX_SESSION_HOURS, MIN_RATING,
};
pub use repository::MentorshipRepository;
pub use status::{ProgramStatus, RequestStatus, SessionStatus};
