//! Session scheduling, feedback and request lifecycle endpoints shared by
//! both sides of a mentorship

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{parse_id, ApiError, Json};
use crate::domain::mentorship::{
    MentorshipRequest, MentorshipSession, RequestStatus, SessionDraft, SessionFeedback,
    SessionStatus,
};
use crate::domain::{RequestId, SessionId};

pub fn create_sessions_router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(schedule_session))
        .route("/sessions/{session_id}/status", put(update_session_status))
        .route(
            "/sessions/{session_id}/feedback",
            get(list_feedback).post(submit_feedback),
        )
        .route("/requests/{request_id}/status", put(update_request_status))
}

#[derive(Debug, Deserialize)]
pub struct SessionStatusRequest {
    pub status: SessionStatus,
}

#[derive(Debug, Deserialize)]
pub struct RequestStatusRequest {
    pub status: RequestStatus,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

/// POST /sessions
pub async fn schedule_session(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
    Json(draft): Json<SessionDraft>,
) -> Result<(StatusCode, Json<MentorshipSession>), ApiError> {
    let session = state
        .mentorship_service
        .schedule_session(identity, draft)
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn update_session_status(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
    Path(session_id): Path<String>,
    Json(body): Json<SessionStatusRequest>,
) -> Result<Json<MentorshipSession>, ApiError> {
    let session_id: SessionId = parse_id(&session_id)?;
    let session = state
        .mentorship_service
        .update_session_status(identity, session_id, body.status)
        .await?;
    Ok(Json(session))
}

pub async fn list_feedback(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<SessionFeedback>>, ApiError> {
    let session_id: SessionId = parse_id(&session_id)?;
    Ok(Json(
        state
            .mentorship_service
            .session_feedback(identity, session_id)
            .await?,
    ))
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
    Path(session_id): Path<String>,
    Json(body): Json<FeedbackRequest>,
) -> Result<(StatusCode, Json<SessionFeedback>), ApiError> {
    let session_id: SessionId = parse_id(&session_id)?;
    let feedback = state
        .mentorship_service
        .submit_feedback(identity, session_id, body.rating, body.comment)
        .await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

/// PUT /requests/{request_id}/status
pub async fn update_request_status(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
    Path(request_id): Path<String>,
    Json(body): Json<RequestStatusRequest>,
) -> Result<Json<MentorshipRequest>, ApiError> {
    let request_id: RequestId = parse_id(&request_id)?;
    let request = state
        .mentorship_service
        .update_request_status(identity, request_id, body.status)
        .await?;
    Ok(Json(request))
}
