//! Mentor area: dashboard, programs, incoming requests, availability

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Router,
};
use serde::Deserialize;

use crate::api::middleware::RequireMentor;
use crate::api::state::AppState;
use crate::api::types::{parse_id, ApiError, Json};
use crate::domain::mentorship::{
    AvailabilitySlot, MentorAnalytics, MentorshipProgram, MentorshipRequest, MentorshipStats,
    ProgramDraft,
};
use crate::domain::{Dashboard, DashboardKind, Identity, RequestId};

pub fn create_mentor_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/programs", get(list_programs).post(create_program))
        .route("/requests", get(list_requests))
        .route("/requests/{request_id}", put(respond_to_request))
        .route("/availability", get(get_availability).put(update_availability))
        .route("/analytics", get(analytics))
        .route("/stats", get(stats))
}

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub approve: bool,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    pub slots: Vec<AvailabilitySlot>,
}

/// GET /mentor/dashboard
///
/// Sections that fail to load are listed under `omitted`.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireMentor(mentor): RequireMentor,
) -> Result<Json<Dashboard>, ApiError> {
    let dashboard = state
        .dashboard_service
        .render(DashboardKind::Mentor, mentor.id)
        .await?;
    Ok(Json(dashboard))
}

pub async fn list_programs(
    State(state): State<AppState>,
    RequireMentor(mentor): RequireMentor,
) -> Result<Json<Vec<MentorshipProgram>>, ApiError> {
    Ok(Json(
        state
            .mentorship_service
            .list_mentor_programs(mentor.id)
            .await?,
    ))
}

pub async fn create_program(
    State(state): State<AppState>,
    RequireMentor(mentor): RequireMentor,
    Json(draft): Json<ProgramDraft>,
) -> Result<(StatusCode, Json<MentorshipProgram>), ApiError> {
    let program = state
        .mentorship_service
        .create_program(Identity::new(mentor.id), draft)
        .await?;
    Ok((StatusCode::CREATED, Json(program)))
}

pub async fn list_requests(
    State(state): State<AppState>,
    RequireMentor(mentor): RequireMentor,
) -> Result<Json<Vec<MentorshipRequest>>, ApiError> {
    Ok(Json(
        state
            .mentorship_service
            .list_mentor_requests(mentor.id)
            .await?,
    ))
}

/// PUT /mentor/requests/{request_id} with `{"approve": bool}`
pub async fn respond_to_request(
    State(state): State<AppState>,
    RequireMentor(mentor): RequireMentor,
    Path(request_id): Path<String>,
    Json(body): Json<RespondRequest>,
) -> Result<Json<MentorshipRequest>, ApiError> {
    let request_id: RequestId = parse_id(&request_id)?;
    let request = state
        .mentorship_service
        .respond_to_request(Identity::new(mentor.id), request_id, body.approve)
        .await?;
    Ok(Json(request))
}

pub async fn get_availability(
    State(state): State<AppState>,
    RequireMentor(mentor): RequireMentor,
) -> Result<Json<Vec<AvailabilitySlot>>, ApiError> {
    Ok(Json(state.mentorship_service.availability(mentor.id).await?))
}

/// PUT /mentor/availability replaces every weekly slot
pub async fn update_availability(
    State(state): State<AppState>,
    RequireMentor(mentor): RequireMentor,
    Json(body): Json<AvailabilityRequest>,
) -> Result<Json<Vec<AvailabilitySlot>>, ApiError> {
    let slots = state
        .mentorship_service
        .update_availability(Identity::new(mentor.id), body.slots)
        .await?;
    Ok(Json(slots))
}

pub async fn analytics(
    State(state): State<AppState>,
    RequireMentor(mentor): RequireMentor,
) -> Result<Json<MentorAnalytics>, ApiError> {
    Ok(Json(
        state.mentorship_service.mentor_analytics(mentor.id).await?,
    ))
}

pub async fn stats(
    State(state): State<AppState>,
    RequireMentor(mentor): RequireMentor,
) -> Result<Json<MentorshipStats>, ApiError> {
    Ok(Json(
        state.mentorship_service.mentorship_stats(mentor.id).await?,
    ))
}
