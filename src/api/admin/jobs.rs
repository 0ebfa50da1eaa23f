//! Admin job board management

use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{parse_id, ApiError, Json};
use crate::domain::job::{ApplicationStatus, Job, JobApplication, JobDraft};
use crate::domain::{ApplicationId, Identity, JobId};

#[derive(Debug, Deserialize)]
pub struct FeatureRequest {
    pub featured: bool,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationStatusRequest {
    pub status: ApplicationStatus,
}

/// GET /admin/jobs - everything not closed
pub async fn list_jobs(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Job>>, ApiError> {
    Ok(Json(state.job_service.list_jobs_admin().await?))
}

pub async fn create_job(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(draft): Json<JobDraft>,
) -> Result<(StatusCode, Json<Job>), ApiError> {
    let job = state
        .job_service
        .create_job(Identity::new(admin.id), draft)
        .await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// DELETE /admin/jobs/{job_id} closes the listing; applications are kept
pub async fn close_job(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(job_id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    let job_id: JobId = parse_id(&job_id)?;
    Ok(Json(state.job_service.close_job(job_id).await?))
}

pub async fn feature_job(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(job_id): Path<String>,
    Json(request): Json<FeatureRequest>,
) -> Result<Json<Job>, ApiError> {
    let job_id: JobId = parse_id(&job_id)?;
    Ok(Json(
        state
            .job_service
            .set_featured(job_id, request.featured)
            .await?,
    ))
}

pub async fn list_applications(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(job_id): Path<String>,
) -> Result<Json<Vec<JobApplication>>, ApiError> {
    let job_id: JobId = parse_id(&job_id)?;
    Ok(Json(state.job_service.list_applications(job_id).await?))
}

pub async fn update_application(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(application_id): Path<String>,
    Json(request): Json<ApplicationStatusRequest>,
) -> Result<Json<JobApplication>, ApiError> {
    let application_id: ApplicationId = parse_id(&application_id)?;
    Ok(Json(
        state
            .job_service
            .update_application_status(application_id, request.status)
            .await?,
    ))
}
