//! Runtime log level control

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};

#[derive(Debug, Deserialize)]
pub struct LogLevelRequest {
    /// `EnvFilter` directive, e.g. `debug` or `nexus_mentorship=trace,sqlx=warn`
    pub level: String,
}

#[derive(Debug, Serialize)]
pub struct LogLevelResponse {
    pub level: String,
}

pub async fn get_log_level(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Json<LogLevelResponse> {
    Json(LogLevelResponse {
        level: state.logging.level(),
    })
}

/// PUT /admin/logging/level
pub async fn set_log_level(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(request): Json<LogLevelRequest>,
) -> Result<Json<LogLevelResponse>, ApiError> {
    state
        .logging
        .set_level(&request.level)
        .map_err(|e| ApiError::from(e).with_param("level"))?;

    Ok(Json(LogLevelResponse {
        level: state.logging.level(),
    }))
}
