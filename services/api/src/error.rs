//! services/api/src/error.rs
//!
//! Defines the error types for the API service: `ApiError` for startup and
//! serving failures, and `HttpError` for failures of a single request.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use blog_core::{PortError, ValidationError};
use serde::Serialize;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::config::ConfigError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a page template that failed to load or render.
    #[error("Template Error: {0}")]
    Template(#[from] minijinja::Error),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The JSON body of every API error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// A failed request. Converting it into a response logs faults and hides
/// their details from the client.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Request body could not be parsed: {0}")]
    Parse(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Storage fault: {0}")]
    Storage(#[from] PortError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HttpError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            HttpError::Validation(_) | HttpError::Parse(_) => StatusCode::BAD_REQUEST,
            HttpError::NotFound => StatusCode::NOT_FOUND,
            HttpError::Storage(_) | HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            // An unreadable body is reported the same way as absent fields.
            HttpError::Validation(_) | HttpError::Parse(_) => "Missing fields",
            HttpError::NotFound => "Resource not found",
            HttpError::Storage(_) | HttpError::Internal(_) => "Internal server error",
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        match &self {
            HttpError::Storage(e) => error!("Storage fault while handling request: {:?}", e),
            HttpError::Internal(msg) => error!("Internal error while handling request: {}", msg),
            HttpError::Parse(msg) => warn!("Rejected unparseable request body: {}", msg),
            HttpError::Validation(_) | HttpError::NotFound => {}
        }

        (self.status_code(), Json(ErrorBody::new(self.public_message()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: HttpError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_maps_to_missing_fields() {
        let err = ValidationError { missing: vec!["title"] };
        let (status, body) = body_of(err.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"error": "Missing fields"}));
    }

    #[tokio::test]
    async fn storage_faults_hide_details() {
        let err: HttpError = PortError::Storage("disk I/O error at /var/db/blog.db".into()).into();
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"error": "Internal server error"}));
    }

    #[tokio::test]
    async fn not_found_body() {
        let (status, body) = body_of(HttpError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({"error": "Resource not found"}));
    }
}
