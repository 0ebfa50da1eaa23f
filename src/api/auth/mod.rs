//! Authentication and registration endpoints
//!
//! Login issues a session token in a role-specific cookie; logout expires
//! every session cookie.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::middleware::{clear_session_cookie_headers, session_cookie_headers};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::{User, UserRole};
use crate::infrastructure::user::{RegistrationRequest, RegistrationRole};

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route("/verify/{token}", get(verify_email))
        .route("/password-reset", post(request_password_reset))
        .route("/password-reset/{token}", post(reset_password))
}

/// `/register/mentee` and `/register/mentor`
pub fn create_registration_router() -> Router<AppState> {
    Router::new()
        .route("/mentee", post(register_mentee))
        .route("/mentor", post(register_mentor))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub role: RegistrationRole,
    #[serde(flatten)]
    pub registration: RegistrationRequest,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: User,
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub role: UserRole,
    /// Where the client should go next
    pub dashboard: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct NewPasswordRequest {
    pub password: String,
}

fn dashboard_for(role: UserRole) -> &'static str {
    match role {
        UserRole::Admin => "/admin/dashboard",
        UserRole::Mentor => "/mentor/dashboard",
        UserRole::Mentee => "/mentee/dashboard",
    }
}

fn registered(user: User) -> (StatusCode, Json<RegisterResponse>) {
    let message = if user.is_mentor {
        "Registration received. Your mentor account is awaiting admin approval."
    } else {
        "Registration successful. Please verify your email address."
    };

    (StatusCode::CREATED, Json(RegisterResponse { user, message }))
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let user = state
        .user_service
        .register(request.role, request.registration)
        .await?;
    Ok(registered(user))
}

/// POST /register/mentee
pub async fn register_mentee(
    State(state): State<AppState>,
    Json(request): Json<RegistrationRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let user = state.user_service.register_mentee(request).await?;
    Ok(registered(user))
}

/// POST /register/mentor
pub async fn register_mentor(
    State(state): State<AppState>,
    Json(request): Json<RegistrationRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let user = state.user_service.register_mentor(request).await?;
    Ok(registered(user))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<LoginResponse>), ApiError> {
    let user = state
        .user_service
        .authenticate(&request.email, &request.password)
        .await?;

    let token = state.sessions.issue(user.id)?;
    let headers = session_cookie_headers(&user, &token, state.cookies)?;
    let role = user.role();

    Ok((
        headers,
        Json(LoginResponse {
            user,
            role,
            dashboard: dashboard_for(role),
        }),
    ))
}

/// GET /auth/logout
pub async fn logout(
    State(state): State<AppState>,
) -> Result<(HeaderMap, Json<MessageResponse>), ApiError> {
    let headers = clear_session_cookie_headers(state.cookies)?;

    Ok((
        headers,
        Json(MessageResponse {
            message: "Logged out successfully",
        }),
    ))
}

/// GET /auth/verify/{token}
pub async fn verify_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.user_service.verify_email(&token).await?;

    Ok(Json(MessageResponse {
        message: "Email verified. You can now log in.",
    }))
}

/// POST /auth/password-reset
///
/// Always succeeds so the response does not reveal which emails exist.
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(request): Json<PasswordResetRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .user_service
        .request_password_reset(&request.email)
        .await?;

    Ok(Json(MessageResponse {
        message: "If the address is registered, a reset link has been sent.",
    }))
}

/// POST /auth/password-reset/{token}
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(request): Json<NewPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .user_service
        .reset_password(&token, &request.password)
        .await?;

    info!("Password changed through reset link");
    Ok(Json(MessageResponse {
        message: "Password updated. You can now log in.",
    }))
}
