//! Console configuration
//!
//! One console process serves one operator: it holds a single signed-in
//! session shared by every request it receives. It binds to loopback by
//! default so only the operator's own browser can reach it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use common::{FileStorage, MemoryStorage, RedisStorage, Storage};
use config::{Config, Environment};
use serde::Deserialize;
use tracing::info;

/// Where the signed-in session is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
    Redis,
}

/// Console configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Base URL of the backend REST API
    pub backend_url: String,
    pub storage: StorageBackend,
    /// File used by the `file` storage backend
    pub storage_path: PathBuf,
    /// Server used by the `redis` storage backend
    pub redis_url: String,
    /// Lifetime of a login session in hours
    pub session_ttl_hours: u64,
    /// Bound on each call to the backend API
    pub backend_timeout_secs: u64,
}

impl ConsoleConfig {
    /// Create a new ConsoleConfig from environment variables
    ///
    /// # Environment Variables
    /// - `CONSOLE_BIND_ADDR`: listen address (default: "127.0.0.1:3000").
    ///   Binding beyond loopback hands the signed-in session to every
    ///   client that can reach the port.
    /// - `CONSOLE_BACKEND_URL`: backend API base URL (default: "http://localhost:4000")
    /// - `CONSOLE_STORAGE`: `memory`, `file` or `redis` (default: "file")
    /// - `CONSOLE_STORAGE_PATH`: session file (default: "console-session.json")
    /// - `CONSOLE_REDIS_URL`: Redis URL (default: "redis://localhost:6379")
    /// - `CONSOLE_SESSION_TTL_HOURS`: session lifetime (default: 12)
    /// - `CONSOLE_BACKEND_TIMEOUT_SECS`: backend request timeout (default: 10)
    pub fn from_env() -> Result<Self> {
        let settings = Config::builder()
            .set_default("bind_addr", "127.0.0.1:3000")?
            .set_default("backend_url", "http://localhost:4000")?
            .set_default("storage", "file")?
            .set_default("storage_path", "console-session.json")?
            .set_default("redis_url", "redis://localhost:6379")?
            .set_default("session_ttl_hours", 12)?
            .set_default("backend_timeout_secs", 10)?
            .add_source(Environment::with_prefix("CONSOLE").try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_hours.saturating_mul(3600))
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_secs)
    }

    /// HTTP client for the backend API, bounded by the backend timeout
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .timeout(self.backend_timeout())
            .build()?;
        Ok(client)
    }

    /// Open the configured storage backend
    pub fn open_storage(&self) -> Result<Arc<dyn Storage>> {
        let storage: Arc<dyn Storage> = match self.storage {
            StorageBackend::Memory => {
                info!("Using in-memory session storage");
                Arc::new(MemoryStorage::new())
            }
            StorageBackend::File => Arc::new(FileStorage::open(&self.storage_path)),
            StorageBackend::Redis => {
                let redis = RedisStorage::open(&self.redis_url)?;
                if !redis.health_check()? {
                    anyhow::bail!("Redis at {} did not answer PING", self.redis_url);
                }
                Arc::new(redis)
            }
        };

        Ok(storage)
    }
}
