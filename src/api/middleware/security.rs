//! Security headers and request path validation

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::types::ApiError;

/// Add security headers to all responses
pub async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );

    // Responses carry per-user data
    if !headers.contains_key(header::CACHE_CONTROL) {
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate"),
        );
    }

    response
}

/// Reject traversal and null-byte paths before routing
pub async fn path_validation_middleware(request: Request<Body>, next: Next) -> Response {
    if let Err(e) = validate_path(request.uri().path()) {
        return e.into_response();
    }
    next.run(request).await
}

pub fn validate_path(path: &str) -> Result<(), ApiError> {
    if path.contains("..") || path.contains("//") {
        return Err(ApiError::bad_request("Invalid path: path traversal detected"));
    }
    if path.contains('\0') || path.contains("%00") {
        return Err(ApiError::bad_request("Invalid request: prohibited characters"));
    }
    Ok(())
}
