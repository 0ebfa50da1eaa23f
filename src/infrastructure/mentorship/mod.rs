//! Mentorship infrastructure module

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresMentorshipRepository;
pub use repository::InMemoryMentorshipRepository;
pub use service::MentorshipService;
