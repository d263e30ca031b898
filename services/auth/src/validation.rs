//! Login form validation

use serde::Serialize;

use crate::models::LoginCredentials;

/// Shortest accepted username or password
pub const MIN_LEN: usize = 2;
/// Longest accepted username or password
pub const MAX_LEN: usize = 50;

/// A single rejected form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    validate_length("Username", username)
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    validate_length("Password", password)
}

/// Validate both fields, collecting every failure
pub fn validate_credentials(credentials: &LoginCredentials) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if let Err(message) = validate_username(&credentials.username) {
        errors.push(FieldError {
            field: "username",
            message,
        });
    }

    if let Err(message) = validate_password(&credentials.password) {
        errors.push(FieldError {
            field: "password",
            message,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_length(label: &str, value: &str) -> Result<(), String> {
    let len = value.chars().count();

    if len < MIN_LEN {
        return Err(format!("{} must be at least {} characters", label, MIN_LEN));
    }

    if len > MAX_LEN {
        return Err(format!("{} cannot exceed {} characters", label, MAX_LEN));
    }

    Ok(())
}
