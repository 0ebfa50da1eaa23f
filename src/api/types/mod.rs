//! API request/response types

pub mod error;
pub mod extract;
pub mod json;

pub use error::{ApiError, ApiErrorResponse};
pub use extract::{parse_id, Query};
pub use json::Json;
