//! Custom error types for the common library
//!
//! This module defines the errors raised by storage backends.

use thiserror::Error;

/// Custom error type for storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Error occurred reading or writing the backing file
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing medium holds data that cannot be decoded
    #[error("Storage data is corrupt: {0}")]
    Corrupt(String),

    /// Error returned by the Redis server or client
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Type alias for Result with StorageError
pub type StorageResult<T> = Result<T, StorageError>;
