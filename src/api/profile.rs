//! Profile, settings and mentor discovery endpoints

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{parse_id, ApiError, Json, Query};
use crate::domain::profile::{
    MentorSearchFilter, MentorSummary, NotificationSettings, Profile, ProfileSettings,
    ProfileUpdate, PublicProfile,
};
use crate::domain::UserId;

/// `/profile` for the signed-in user
pub fn create_profile_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile).put(update_profile))
        .route("/settings", get(get_settings).put(update_settings))
        .route(
            "/notifications",
            get(get_notification_settings).put(update_notification_settings),
        )
}

/// Public discovery routes
pub fn create_discovery_router() -> Router<AppState> {
    Router::new()
        .route("/profiles/{user_id}", get(get_public_profile))
        .route("/mentors/search", get(search_mentors))
        .route("/mentors/specialties", get(list_specialties))
}

pub async fn get_profile(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
) -> Result<Json<Profile>, ApiError> {
    let profile = state.profile_service.profile(identity.user_id()).await?;
    Ok(Json(profile))
}

pub async fn update_profile(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<Profile>, ApiError> {
    let profile = state
        .profile_service
        .update_profile(identity, update)
        .await?;
    Ok(Json(profile))
}

pub async fn get_settings(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
) -> Result<Json<ProfileSettings>, ApiError> {
    Ok(Json(state.profile_service.settings(identity).await?))
}

pub async fn update_settings(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
    Json(settings): Json<ProfileSettings>,
) -> Result<Json<ProfileSettings>, ApiError> {
    let settings = state
        .profile_service
        .update_settings(identity, settings)
        .await?;
    Ok(Json(settings))
}

pub async fn get_notification_settings(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
) -> Result<Json<NotificationSettings>, ApiError> {
    Ok(Json(
        state.profile_service.notification_settings(identity).await?,
    ))
}

pub async fn update_notification_settings(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
    Json(settings): Json<NotificationSettings>,
) -> Result<Json<NotificationSettings>, ApiError> {
    let settings = state
        .profile_service
        .update_notification_settings(identity, settings)
        .await?;
    Ok(Json(settings))
}

/// GET /profiles/{user_id}
pub async fn get_public_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<PublicProfile>, ApiError> {
    let user_id: UserId = parse_id(&user_id)?;
    Ok(Json(state.profile_service.public_profile(user_id).await?))
}

/// GET /mentors/search?skills=&rate_min=&rate_max=&timezone=&available=
pub async fn search_mentors(
    State(state): State<AppState>,
    Query(filter): Query<MentorSearchFilter>,
) -> Result<Json<Vec<MentorSummary>>, ApiError> {
    Ok(Json(state.profile_service.search_mentors(&filter).await?))
}

pub async fn list_specialties(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.mentorship_service.available_specialties().await?))
}
