//! Key/value storage backends for session state
//!
//! This module provides the storage capability the session store writes
//! through. Values are opaque strings, the same contract a browser's local
//! storage offers: the caller owns serialization and expiry.
//!
//! Three backends are available:
//! - [`MemoryStorage`] keeps entries for the life of the process.
//! - [`FileStorage`] keeps entries in a JSON object on disk so they survive
//!   restarts.
//! - [`RedisStorage`] keeps entries in Redis so several console processes
//!   share them. Concurrent writers simply overwrite each other.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use parking_lot::Mutex;
use redis::{Client, Commands};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::{StorageError, StorageResult};

/// Storage capability for raw string values
pub trait Storage: Send + Sync {
    /// Get the raw value stored under `key`
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete `key`; deleting a missing key is not an error
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

/// In-process storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Storage persisted as a single JSON object file
///
/// Every key maps to a JSON string. Writes go to a sibling temporary file
/// that is then renamed over the original, so a crash never leaves a
/// half-written document behind.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Open storage at `path`; the file is created on first write
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!("File storage opened at {}", path.display());
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    fn read_map(&self) -> StorageResult<Map<String, Value>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        if text.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StorageError::Corrupt(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(StorageError::Corrupt(format!(
                "{}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Read the map for modification, starting over if the file is unreadable
    ///
    /// The flag is set when the file was discarded and must be rewritten.
    fn read_map_for_write(&self) -> StorageResult<(Map<String, Value>, bool)> {
        match self.read_map() {
            Ok(map) => Ok((map, false)),
            Err(StorageError::Corrupt(reason)) => {
                warn!("Discarding corrupt storage file: {}", reason);
                Ok((Map::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> StorageResult<()> {
        let text = serde_json::to_string_pretty(map)
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let _guard = self.lock.lock();
        let map = self.read_map()?;

        match map.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            // Hand-edited files may hold structured values; pass them through as text
            Some(other) => Ok(Some(other.to_string())),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.lock.lock();
        let (mut map, _) = self.read_map_for_write()?;
        map.insert(key.to_string(), Value::String(value.to_string()));
        self.write_map(&map)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let _guard = self.lock.lock();
        let (mut map, discarded) = self.read_map_for_write()?;
        if map.remove(key).is_some() || discarded {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// Prefix applied to every key written to Redis
pub const REDIS_KEY_PREFIX: &str = "gas-console:";

/// Bound on connecting to Redis and on each command round trip
pub const DEFAULT_REDIS_TIMEOUT: Duration = Duration::from_secs(2);

/// Storage backed by a Redis server
///
/// Every operation is bounded by the configured timeout. A server that
/// stops answering surfaces as [`StorageError::Redis`].
pub struct RedisStorage {
    client: Client,
    timeout: Duration,
}

impl RedisStorage {
    /// Create a client for `url` (e.g. "redis://localhost:6379")
    ///
    /// No connection is made until the first operation.
    pub fn open(url: &str) -> StorageResult<Self> {
        Self::open_with_timeout(url, DEFAULT_REDIS_TIMEOUT)
    }

    pub fn open_with_timeout(url: &str, timeout: Duration) -> StorageResult<Self> {
        let client = Client::open(url)?;
        info!(
            "Redis storage initialized with URL: {} (timeout {:?})",
            url, timeout
        );
        Ok(Self { client, timeout })
    }

    fn connection(&self) -> StorageResult<redis::Connection> {
        let conn = self.client.get_connection_with_timeout(self.timeout)?;
        conn.set_read_timeout(Some(self.timeout))?;
        conn.set_write_timeout(Some(self.timeout))?;
        Ok(conn)
    }

    fn namespaced(key: &str) -> String {
        format!("{}{}", REDIS_KEY_PREFIX, key)
    }

    /// Check if Redis is reachable
    pub fn health_check(&self) -> StorageResult<bool> {
        let mut conn = self.connection()?;
        let pong: String = redis::cmd("PING").query(&mut conn)?;
        Ok(pong == "PONG")
    }
}

impl Storage for RedisStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let mut conn = self.connection()?;
        let value: Option<String> = conn.get(Self::namespaced(key))?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut conn = self.connection()?;
        let _: () = conn.set(Self::namespaced(key), value)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let mut conn = self.connection()?;
        let _: u64 = conn.del(Self::namespaced(key))?;
        Ok(())
    }
}
