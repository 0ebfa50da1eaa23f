//! JSON extractor whose rejections use the API error envelope

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::{de::DeserializeOwned, Serialize};

use super::error::ApiError;

/// Drop-in for `axum::Json`. Every body problem is reported as a 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        AxumJson::<T>::from_request(req, state)
            .await
            .map(|AxumJson(value)| Json(value))
            .map_err(|rejection| {
                ApiError::bad_request(describe_rejection(&rejection)).with_code("invalid_json")
            })
    }
}

fn describe_rejection(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::JsonDataError(err) => format!("Invalid request body: {}", err.body_text()),
        JsonRejection::JsonSyntaxError(err) => format!("Malformed JSON: {}", err.body_text()),
        JsonRejection::MissingJsonContentType(_) => {
            "Expected request with `Content-Type: application/json`".to_string()
        }
        JsonRejection::BytesRejection(err) => {
            format!("Failed to read request body: {}", err.body_text())
        }
        other => other.body_text(),
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Login {
        email: String,
    }

    async fn extract(content_type: Option<&str>, body: &'static str) -> Result<Login, ApiError> {
        let mut builder = Request::builder().method("POST");
        if let Some(ct) = content_type {
            builder = builder.header("content-type", ct);
        }
        let request = builder.body(Body::from(body)).unwrap();

        Json::<Login>::from_request(request, &())
            .await
            .map(Json::into_inner)
    }

    #[tokio::test]
    async fn test_valid_body() {
        let login = extract(Some("application/json"), r#"{"email":"a@b.io"}"#)
            .await
            .unwrap();
        assert_eq!(login.email, "a@b.io");
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let err = extract(Some("application/json"), "{\"email\": ")
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.response.error.message.starts_with("Malformed JSON"));
        assert_eq!(err.response.error.code.as_deref(), Some("invalid_json"));
    }

    #[tokio::test]
    async fn test_missing_field() {
        let err = extract(Some("application/json"), "{}").await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.response.error.message.contains("email"));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let err = extract(None, r#"{"email":"a@b.io"}"#).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
