//! Error types for the recommendation core
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Recommend Error Enum ==
/// Unified error type for the recommendation core.
///
/// Only `MalformedInput`, `InvalidRequest` and `Internal` ever reach a caller.
/// The other variants are produced by leaf components and recovered locally.
#[derive(Error, Debug)]
pub enum RecommendError {
    /// Unknown customer or recipe
    #[error("Not found: {0}")]
    NotFound(String),

    /// No dietary profile is available for a recipe
    #[error("Classification unavailable: {0}")]
    OracleUnavailable(String),

    /// Cache snapshot could not be read
    #[error("Cache snapshot corrupt: {0}")]
    CacheCorrupt(String),

    /// Catalog data violates a required shape
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for RecommendError {
    fn into_response(self) -> Response {
        let status = match &self {
            RecommendError::NotFound(_) => StatusCode::NOT_FOUND,
            RecommendError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RecommendError::MalformedInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RecommendError::OracleUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            RecommendError::CacheCorrupt(_) | RecommendError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

impl From<serde_json::Error> for RecommendError {
    fn from(err: serde_json::Error) -> Self {
        RecommendError::MalformedInput(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the recommendation core.
pub type Result<T> = std::result::Result<T, RecommendError>;
