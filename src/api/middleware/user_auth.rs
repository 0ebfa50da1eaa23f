//! Session cookie authentication
//!
//! Role cookies are checked before the generic one; the first cookie present
//! decides the identity.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::User;
use crate::domain::Identity;

use super::cookies::SESSION_COOKIES;

/// Extractor for any signed-in user. Only the token is checked; the user is
/// not loaded from storage.
#[derive(Debug, Clone, Copy)]
pub struct RequireUser(pub Identity);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_session_token(&parts.headers)?;

        let identity = state
            .sessions
            .parse(&token)
            .map_err(|e| ApiError::unauthorized(e.to_string()))?;

        debug!(user_id = %identity.user_id(), "Session accepted");
        Ok(RequireUser(identity))
    }
}

/// Extractor for mentors. Loads the user and rejects everyone else with 403.
#[derive(Debug, Clone)]
pub struct RequireMentor(pub User);

impl FromRequestParts<AppState> for RequireMentor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = load_user(parts, state).await?;

        if !user.is_mentor {
            return Err(ApiError::forbidden("Mentor access required"));
        }

        Ok(RequireMentor(user))
    }
}

/// Resolve the session to a stored user
pub(super) async fn load_user(parts: &mut Parts, state: &AppState) -> Result<User, ApiError> {
    let RequireUser(identity) = RequireUser::from_request_parts(parts, state).await?;

    state
        .user_service
        .get(identity.user_id())
        .await?
        .ok_or_else(|| ApiError::unauthorized("User not found"))
}

/// Find the session token among the request cookies
pub fn extract_session_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let cookies: Vec<(&str, &str)> = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .collect();

    SESSION_COOKIES
        .iter()
        .find_map(|name| {
            cookies
                .iter()
                .find(|(key, value)| key == name && !value.is_empty())
                .map(|(_, value)| value.to_string())
        })
        .ok_or_else(|| ApiError::unauthorized("Authentication required. Please log in."))
}
