//! Session cookie headers

use axum::http::{header, HeaderMap, HeaderValue};

use crate::api::state::CookieSettings;
use crate::api::types::ApiError;
use crate::domain::user::{User, UserRole};

pub const ADMIN_SESSION_COOKIE: &str = "admin_session_token";
pub const MENTOR_SESSION_COOKIE: &str = "mentor_session_token";
pub const MENTEE_SESSION_COOKIE: &str = "mentee_session_token";
pub const SESSION_COOKIE: &str = "session_token";

/// Lookup order when authenticating
pub const SESSION_COOKIES: [&str; 4] = [
    ADMIN_SESSION_COOKIE,
    MENTOR_SESSION_COOKIE,
    MENTEE_SESSION_COOKIE,
    SESSION_COOKIE,
];

pub fn cookie_name_for(user: &User) -> &'static str {
    match user.role() {
        UserRole::Admin => ADMIN_SESSION_COOKIE,
        UserRole::Mentor => MENTOR_SESSION_COOKIE,
        UserRole::Mentee => MENTEE_SESSION_COOKIE,
    }
}

fn cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Strict",
        name, value, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` for a freshly issued session token
pub fn session_cookie_headers(
    user: &User,
    token: &str,
    settings: CookieSettings,
) -> Result<HeaderMap, ApiError> {
    let value = cookie(
        cookie_name_for(user),
        token,
        settings.ttl_hours.max(0) * 3600,
        settings.secure,
    );

    let mut headers = HeaderMap::new();
    headers.append(header::SET_COOKIE, header_value(&value)?);
    Ok(headers)
}

/// Expire every session cookie
pub fn clear_session_cookie_headers(settings: CookieSettings) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    for name in SESSION_COOKIES {
        headers.append(
            header::SET_COOKIE,
            header_value(&cookie(name, "", 0, settings.secure))?,
        );
    }
    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value)
        .map_err(|e| ApiError::internal(format!("Invalid cookie header: {}", e)))
}
