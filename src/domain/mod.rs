//! Domain layer - Core business logic and entities

pub mod dashboard;
pub mod error;
pub mod id;
pub mod identity;
pub mod job;
pub mod mentorship;
pub mod profile;
pub mod user;

pub use dashboard::{Dashboard, DashboardKind, DashboardSection, FailurePolicy};
pub use error::DomainError;
pub use id::{ApplicationId, FeedbackId, JobId, ProfileId, ProgramId, RequestId, SessionId, UserId};
pub use identity::Identity;
pub use job::{ApplicationStatus, Job, JobApplication, JobRepository, JobStatus};
pub use mentorship::{
    MentorshipProgram, MentorshipRepository, MentorshipRequest, MentorshipSession, ProgramStatus,
    RequestStatus, SessionStatus,
};
pub use profile::{Profile, ProfileRepository};
pub use user::{User, UserRepository, UserRole};
