//! Custom error types for the console service

use auth::{LoginError, validation::FieldError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the console service
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Login form failed validation
    #[error("Invalid login form")]
    InvalidForm(Vec<FieldError>),

    /// Backend refused the credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Backend could not be reached or answered nonsense
    #[error("Backend unavailable: {0}")]
    BadGateway(String),

    #[error("Not found")]
    NotFound,

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl From<LoginError> for ConsoleError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::Invalid(fields) => ConsoleError::InvalidForm(fields),
            LoginError::Rejected(message) => ConsoleError::Unauthorized(message),
            LoginError::Transport(e) => {
                error!("Login backend unreachable: {}", e);
                ConsoleError::BadGateway(e.to_string())
            }
            LoginError::MalformedResponse(reason) => {
                error!("Malformed login response: {}", reason);
                ConsoleError::BadGateway(reason)
            }
            LoginError::Session(e) => {
                error!("Failed to persist session: {}", e);
                ConsoleError::InternalServerError
            }
        }
    }
}

impl IntoResponse for ConsoleError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ConsoleError::InvalidForm(fields) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "Invalid login form", "fields": fields}),
            ),
            ConsoleError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, json!({"error": message}))
            }
            ConsoleError::BadGateway(_) => (
                StatusCode::BAD_GATEWAY,
                json!({"error": "Backend unavailable"}),
            ),
            ConsoleError::NotFound => (StatusCode::NOT_FOUND, json!({"error": "Not found"})),
            ConsoleError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "Internal server error"}),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for console results
pub type ConsoleResult<T> = Result<T, ConsoleError>;
