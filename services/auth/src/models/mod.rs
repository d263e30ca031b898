//! Session and identity models

pub mod credentials;
pub mod principal;
pub mod role;
pub mod session;

// Re-export for convenience
pub use credentials::LoginCredentials;
pub use principal::Principal;
pub use role::Role;
pub use session::SessionRecord;
