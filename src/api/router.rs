use axum::{middleware, routing::get, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::middleware::{
    logging_middleware, metrics_middleware, path_validation_middleware, recovery_layer,
    security_headers_middleware,
};
use super::state::AppState;
use super::{admin, auth, health, jobs, mentee, mentor, profile, sessions};
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Routes only, without the middleware stack
pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Probes
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Accounts
        .nest("/auth", auth::create_auth_router())
        .nest("/register", auth::create_registration_router())
        .nest("/profile", profile::create_profile_router())
        .merge(profile::create_discovery_router())
        // Mentorship
        .nest("/mentor", mentor::create_mentor_router())
        .nest("/mentee", mentee::create_mentee_router())
        .merge(sessions::create_sessions_router())
        // Job board
        .nest("/jobs", jobs::create_jobs_router())
        // Back-office
        .nest("/admin", admin::create_admin_router())
}

/// Create the full router with application state and middleware.
/// `/metrics` is mounted when a Prometheus recorder is installed.
pub fn create_router(state: AppState, metrics: Option<PrometheusMetrics>) -> Router {
    let development = state.development;
    let mut router = create_routes().with_state(state);

    if let Some(m) = metrics {
        router = router.merge(create_metrics_router(m));
    }

    // Last layer added runs first
    router
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(middleware::from_fn(path_validation_middleware))
        .layer(recovery_layer(development))
}
