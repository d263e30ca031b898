//! Common library for the gas console
//!
//! This crate provides the pieces shared by the console services: the
//! key/value storage capability that session state is persisted through,
//! the clock used to stamp and check expiry times, and the storage error
//! type.
//!
//! ```rust,no_run
//! use common::{MemoryStorage, Storage};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let storage = MemoryStorage::new();
//!     storage.set_item("signedIn", "{}")?;
//!     println!("Stored value: {:?}", storage.get_item("signedIn")?);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod clock;
pub mod error;

pub use cache::{FileStorage, MemoryStorage, RedisStorage, Storage};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{StorageError, StorageResult};
