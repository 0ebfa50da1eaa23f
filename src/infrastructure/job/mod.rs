//! Job board infrastructure module

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresJobRepository;
pub use repository::InMemoryJobRepository;
pub use service::{ApplicationDraft, JobService};
