//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::db::repository::RepositoryError;
use crate::db::services::ServiceError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// No route matched
    NotFound(String),
    /// The store holds no rows but the operation needs some
    EmptyStore(String),
    /// Store failure
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::EmptyStore(msg) => {
                warn!("{}", msg);
                (StatusCode::NOT_FOUND, ApiError::new("EMPTY_STORE", msg))
            }
            AppError::Repository(e) => {
                error!("Store error: {}", e);
                if e.is_unavailable() {
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        ApiError::new("STORE_UNAVAILABLE", "Measurement store is unavailable")
                            .with_details(e.to_string()),
                    )
                } else {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiError::new("STORE_ERROR", "Measurement store query failed")
                            .with_details(e.to_string()),
                    )
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Store(e) => AppError::Repository(e),
            empty @ ServiceError::EmptyStore { .. } => AppError::EmptyStore(empty.to_string()),
        }
    }
}
