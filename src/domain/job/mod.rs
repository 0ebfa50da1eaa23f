//! Job board domain

mod entity;
mod repository;

pub use entity::{
    ApplicationStatus, ExperienceLevel, Job, JobApplication, JobDraft, JobStats, JobStatus,
    JobType, NewApplication, NewJob, RemotePolicy,
};
pub use repository::JobRepository;
