//! Public job board

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{parse_id, ApiError, Json};
use crate::domain::job::{Job, JobApplication};
use crate::domain::JobId;
use crate::infrastructure::job::ApplicationDraft;

pub fn create_jobs_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_jobs))
        .route("/{job_id}", get(get_job))
        .route("/{job_id}/apply", post(apply))
}

/// GET /jobs - active listings, featured first
pub async fn list_jobs(State(state): State<AppState>) -> Result<Json<Vec<Job>>, ApiError> {
    Ok(Json(state.job_service.list_active_jobs().await?))
}

pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    let job_id: JobId = parse_id(&job_id)?;
    Ok(Json(state.job_service.get_job(job_id).await?))
}

/// POST /jobs/{job_id}/apply
pub async fn apply(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
    Path(job_id): Path<String>,
    Json(draft): Json<ApplicationDraft>,
) -> Result<(StatusCode, Json<JobApplication>), ApiError> {
    let job_id: JobId = parse_id(&job_id)?;
    let application = state.job_service.apply(identity, job_id, draft).await?;
    Ok((StatusCode::CREATED, Json(application)))
}
