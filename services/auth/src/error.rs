//! Error types for session and login operations

use common::StorageError;
use thiserror::Error;

use crate::validation::FieldError;

/// Errors raised by the session store
///
/// Only writes surface these to callers. Reads resolve every failure to
/// "no session" at the public boundary.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The storage backend failed
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),

    /// A stored record could not be decoded
    #[error("Corrupt session record under {key}: {reason}")]
    Corrupt { key: String, reason: String },

    /// A value could not be encoded for storage
    #[error("Failed to encode session record: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Type alias for Result with SessionError
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors raised while signing in
#[derive(Error, Debug)]
pub enum LoginError {
    /// The submitted form failed validation
    #[error("Invalid credentials: {}", summarize(.0))]
    Invalid(Vec<FieldError>),

    /// The backend refused the credentials
    #[error("{0}")]
    Rejected(String),

    /// The backend could not be reached
    #[error("Login backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with something other than a login envelope
    #[error("Malformed login response: {0}")]
    MalformedResponse(String),

    /// The session could not be persisted
    #[error(transparent)]
    Session(#[from] SessionError),
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
