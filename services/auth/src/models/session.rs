//! Persisted session record

use serde::{Deserialize, Serialize};

/// A value wrapped with its absolute expiry
///
/// Stored as `{"value": ..., "expiry": <epoch ms>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord<T> {
    pub value: T,
    pub expiry: i64,
}

impl<T> SessionRecord<T> {
    pub fn new(value: T, expiry: i64) -> Self {
        Self { value, expiry }
    }

    /// A record is valid strictly before its expiry instant
    pub fn is_valid_at(&self, now_millis: i64) -> bool {
        now_millis < self.expiry
    }
}
