//! Mentee area: dashboard, program catalogue, requests and sessions

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{parse_id, ApiError, Json};
use crate::domain::mentorship::{MentorshipProgram, MentorshipRequest, MentorshipSession};
use crate::domain::{Dashboard, DashboardKind, ProgramId};

pub fn create_mentee_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/programs", get(list_programs))
        .route("/programs/{program_id}", get(get_program))
        .route("/request/{program_id}", post(request_mentorship))
        .route("/requests", get(list_requests))
        .route("/sessions", get(list_sessions))
}

#[derive(Debug, Default, Deserialize)]
pub struct MentorshipRequestBody {
    #[serde(default)]
    pub message: String,
}

/// GET /mentee/dashboard
///
/// All sections or an error; a partial mentee dashboard is never returned.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
) -> Result<Json<Dashboard>, ApiError> {
    let dashboard = state
        .dashboard_service
        .render(DashboardKind::Mentee, identity.user_id())
        .await?;
    Ok(Json(dashboard))
}

pub async fn list_programs(
    State(state): State<AppState>,
    RequireUser(_identity): RequireUser,
) -> Result<Json<Vec<MentorshipProgram>>, ApiError> {
    Ok(Json(
        state.mentorship_service.list_available_programs().await?,
    ))
}

pub async fn get_program(
    State(state): State<AppState>,
    RequireUser(_identity): RequireUser,
    Path(program_id): Path<String>,
) -> Result<Json<MentorshipProgram>, ApiError> {
    let program_id: ProgramId = parse_id(&program_id)?;
    Ok(Json(
        state.mentorship_service.program_details(program_id).await?,
    ))
}

/// POST /mentee/request/{program_id}
pub async fn request_mentorship(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
    Path(program_id): Path<String>,
    Json(body): Json<MentorshipRequestBody>,
) -> Result<(StatusCode, Json<MentorshipRequest>), ApiError> {
    let program_id: ProgramId = parse_id(&program_id)?;
    let request = state
        .mentorship_service
        .request_mentorship(identity, program_id, body.message)
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn list_requests(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
) -> Result<Json<Vec<MentorshipRequest>>, ApiError> {
    Ok(Json(
        state
            .mentorship_service
            .list_mentee_requests(identity.user_id())
            .await?,
    ))
}

/// Upcoming scheduled sessions, soonest first
pub async fn list_sessions(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
) -> Result<Json<Vec<MentorshipSession>>, ApiError> {
    Ok(Json(
        state
            .mentorship_service
            .upcoming_sessions(identity.user_id())
            .await?,
    ))
}
