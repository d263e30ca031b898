//! Expiring session store
//!
//! Wraps a [`Storage`] backend and stamps every value with an absolute
//! expiry. Expired records are not swept in the background: they are
//! removed the first time a read observes them. Reading a valid record
//! never extends it.

use std::sync::Arc;
use std::time::Duration;

use common::{Clock, Storage, StorageError, SystemClock};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

use crate::{
    error::{SessionError, SessionResult},
    models::{Principal, SessionRecord},
};

/// Storage key holding the signed-in principal
pub const SIGNED_IN_KEY: &str = "signedIn";

/// Lifetime of a login session (12 hours)
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Outcome of reading a key
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// The record exists and has not expired
    Fresh(T),
    /// Nothing is stored under the key
    Missing,
    /// The record had expired and has been evicted
    Expired,
}

impl<T> Lookup<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Fresh(value) => Some(value),
            Lookup::Missing | Lookup::Expired => None,
        }
    }
}

/// Key/value store whose entries expire
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl SessionStore {
    /// Create a store over `storage` using the system clock and a 12 hour TTL
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            clock: Arc::new(SystemClock),
            ttl: DEFAULT_SESSION_TTL,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the TTL used by [`SessionStore::sign_in`]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store `value` under `key`, valid for `ttl` from now
    pub fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> SessionResult<()> {
        let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let expiry = self.clock.now_millis().saturating_add(ttl_millis);

        let raw = serde_json::to_string(&SessionRecord::new(value, expiry))
            .map_err(SessionError::Encode)?;
        self.storage.set_item(key, &raw)?;

        info!("Stored {} (expires at {})", key, expiry);
        Ok(())
    }

    /// Read `key`, treating every failure as "nothing stored"
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.lookup(key) {
            Ok(lookup) => lookup.into_option(),
            Err(e) => {
                warn!("Treating {} as absent: {}", key, e);
                None
            }
        }
    }

    /// Read `key`, reporting why nothing usable was found
    ///
    /// Expired and undecodable records are evicted before returning.
    pub fn lookup<T: DeserializeOwned>(&self, key: &str) -> SessionResult<Lookup<T>> {
        let raw = match self.storage.get_item(key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return Ok(Lookup::Missing),
            Err(e @ StorageError::Corrupt(_)) => {
                self.evict(key);
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        };

        let record: SessionRecord<T> = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                self.evict(key);
                return Err(SessionError::Corrupt {
                    key: key.to_string(),
                    reason: e.to_string(),
                });
            }
        };

        let now = self.clock.now_millis();
        if !record.is_valid_at(now) {
            debug!("{} expired at {} (now {})", key, record.expiry, now);
            self.evict(key);
            return Ok(Lookup::Expired);
        }

        Ok(Lookup::Fresh(record.value))
    }

    /// Delete `key` whether or not it exists
    pub fn remove(&self, key: &str) -> SessionResult<()> {
        self.storage.remove_item(key)?;
        info!("Removed {}", key);
        Ok(())
    }

    /// Persist `principal` as the signed-in session, replacing any other
    pub fn sign_in(&self, principal: &Principal) -> SessionResult<()> {
        info!("Creating session for employee: {}", principal.id);
        self.set(SIGNED_IN_KEY, principal, self.ttl)
    }

    /// The signed-in principal, if the session is present and valid
    pub fn signed_in(&self) -> Option<Principal> {
        self.get(SIGNED_IN_KEY)
    }

    /// Destroy the signed-in session
    pub fn sign_out(&self) -> SessionResult<()> {
        self.remove(SIGNED_IN_KEY)
    }

    fn evict(&self, key: &str) {
        if let Err(e) = self.storage.remove_item(key) {
            warn!("Failed to evict {}: {}", key, e);
        }
    }
}
