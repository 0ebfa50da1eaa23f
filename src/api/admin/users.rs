//! Admin account management: setup, dashboard, users and mentor approval

use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{parse_id, ApiError, Json};
use crate::domain::job::JobStats;
use crate::domain::profile::Profile;
use crate::domain::user::{User, UserStats};
use crate::domain::UserId;

#[derive(Debug, Deserialize)]
pub struct SetupRequest {
    #[serde(default = "default_admin_username")]
    pub username: String,
    pub email: String,
    pub password: String,
}

fn default_admin_username() -> String {
    "admin".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ApprovalRequest {
    #[serde(default = "default_approved")]
    pub approved: bool,
}

fn default_approved() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct AdminDashboard {
    pub users: UserStats,
    pub jobs: JobStats,
    /// Mentors waiting for approval, newest first
    pub pending_mentors: Vec<User>,
}

/// POST /admin/setup
///
/// Public, but only succeeds while no admin account exists.
pub async fn setup(
    State(state): State<AppState>,
    Json(request): Json<SetupRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let admin = state
        .user_service
        .setup_admin(&request.username, &request.email, &request.password)
        .await?;
    Ok((StatusCode::CREATED, Json(admin)))
}

/// GET /admin/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<AdminDashboard>, ApiError> {
    let users = state.user_service.stats().await?;
    let jobs = state.job_service.stats().await?;

    let mut pending_mentors: Vec<User> = state
        .user_service
        .list()
        .await?
        .into_iter()
        .filter(|u| u.is_mentor && !u.is_approved)
        .collect();
    pending_mentors.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(Json(AdminDashboard {
        users,
        jobs,
        pending_mentors,
    }))
}

pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.user_service.list().await?))
}

pub async fn list_profiles(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Profile>>, ApiError> {
    Ok(Json(state.profile_service.list().await?))
}

/// POST /admin/mentors/{user_id}/approve with optional `{"approved": false}`
pub async fn approve_mentor(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(user_id): Path<String>,
    Json(request): Json<ApprovalRequest>,
) -> Result<Json<User>, ApiError> {
    let user_id: UserId = parse_id(&user_id)?;
    let mentor = state
        .user_service
        .set_mentor_approval(user_id, request.approved)
        .await?;

    info!(admin_id = %admin.id, mentor_id = %mentor.id, approved = request.approved, "Mentor reviewed");
    Ok(Json(mentor))
}
