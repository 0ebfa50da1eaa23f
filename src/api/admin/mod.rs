//! Admin back-office endpoints

pub mod jobs;
pub mod logging;
pub mod users;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::state::AppState;

/// Create admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        // First admin account
        .route("/setup", post(users::setup))
        // Overview
        .route("/", get(users::dashboard))
        .route("/dashboard", get(users::dashboard))
        // Users and mentor approval
        .route("/users", get(users::list_users))
        .route("/profiles", get(users::list_profiles))
        .route("/mentors/{user_id}/approve", post(users::approve_mentor))
        // Job board
        .route("/jobs", get(jobs::list_jobs).post(jobs::create_job))
        .route("/jobs/{job_id}", delete(jobs::close_job))
        .route("/jobs/{job_id}/feature", post(jobs::feature_job))
        .route("/jobs/{job_id}/applications", get(jobs::list_applications))
        .route("/applications/{application_id}", put(jobs::update_application))
        // Operations
        .route(
            "/logging/level",
            get(logging::get_log_level).put(logging::set_log_level),
        )
}
