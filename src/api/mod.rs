//! API layer - HTTP endpoints and middleware

pub mod admin;
pub mod auth;
pub mod health;
pub mod jobs;
pub mod mentee;
pub mod mentor;
pub mod middleware;
pub mod profile;
pub mod router;
pub mod sessions;
pub mod state;
pub mod types;

pub use router::create_router;
pub use state::AppState;
