//! Infrastructure layer - storage, services and observability

pub mod auth;
pub mod dashboard;
pub mod job;
pub mod logging;
pub mod mentorship;
pub mod notification;
pub mod observability;
pub mod profile;
pub mod storage;
pub mod user;
