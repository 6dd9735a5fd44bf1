use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::errors::ServiceError;
use service::news::validation::FieldErrors;
use thiserror::Error;
use tracing::error;

pub const NEWS_NOT_FOUND: &str = "News not found";
pub const NEWS_EMPTY: &str = "No news data added yet";
pub const INTERNAL: &str = "Internal server error";
pub const INVALID: &str = "Invalid request data";

/// JSON error body: `{message}` or `{message, errors}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), errors: None }
    }

    pub fn validation(message: impl Into<String>, errors: FieldErrors) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into(), errors: Some(errors) }
    }

    pub fn not_found() -> Self { Self::new(StatusCode::NOT_FOUND, NEWS_NOT_FOUND) }

    /// Map a service failure; `invalid` is the operation's 400 message.
    pub fn from_service(e: ServiceError, invalid: &str) -> Self {
        match e {
            ServiceError::ValidationFailed(errors) => Self::validation(invalid, errors),
            ServiceError::NotFound(_) => Self::not_found(),
            ServiceError::EmptyCollection(_) => Self::new(StatusCode::NOT_FOUND, NEWS_EMPTY),
            ServiceError::Db(detail) => {
                // details stay in the log
                error!(error = %detail, "news store failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
            }
        }
    }
}

/// For operations without a validation step of their own.
impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self { Self::from_service(e, INVALID) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
