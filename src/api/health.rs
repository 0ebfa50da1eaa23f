//! Liveness and readiness probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode};
use serde::Serialize;

use super::state::AppState;
use crate::api::types::Json;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<HealthCheck>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: &'static str,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub latency_ms: u64,
}

impl HealthResponse {
    fn from_checks(checks: Vec<HealthCheck>) -> (StatusCode, Json<Self>) {
        let healthy = checks.iter().all(|c| c.status == HealthStatus::Healthy);
        let (status, code) = if healthy {
            (HealthStatus::Healthy, StatusCode::OK)
        } else {
            (HealthStatus::Unhealthy, StatusCode::SERVICE_UNAVAILABLE)
        };

        (
            code,
            Json(Self {
                status,
                version: VERSION,
                checks,
            }),
        )
    }
}

/// GET /health - process is up
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    HealthResponse::from_checks(Vec::new())
}

/// GET /ready - storage answers queries
pub async fn ready_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    HealthResponse::from_checks(vec![check_storage(&state).await])
}

/// GET /live
pub async fn live_check() -> StatusCode {
    StatusCode::OK
}

async fn check_storage(state: &AppState) -> HealthCheck {
    let start = Instant::now();
    let result = state.user_service.stats().await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HealthCheck {
            name: "storage",
            status: HealthStatus::Healthy,
            message: None,
            latency_ms,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            HealthCheck {
                name: "storage",
                status: HealthStatus::Unhealthy,
                message: Some("storage unavailable".to_string()),
                latency_ms,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(status: HealthStatus) -> HealthCheck {
        HealthCheck {
            name: "storage",
            status,
            message: None,
            latency_ms: 1,
        }
    }

    #[test]
    fn test_no_checks_is_healthy() {
        let (code, Json(body)) = HealthResponse::from_checks(Vec::new());
        assert_eq!(code, StatusCode::OK);

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert!(json.get("checks").is_none());
    }

    #[test]
    fn test_any_failed_check_is_unavailable() {
        let (code, Json(body)) = HealthResponse::from_checks(vec![
            check(HealthStatus::Healthy),
            check(HealthStatus::Unhealthy),
        ]);
        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, HealthStatus::Unhealthy);
    }

    #[test]
    fn test_failed_check_carries_message() {
        let mut failed = check(HealthStatus::Unhealthy);
        failed.message = Some("storage unavailable".to_string());

        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["message"], "storage unavailable");
    }
}
