//! Session handling for the gas console
//!
//! This crate holds the signed-in session and the route guard built on it:
//! - [`session::SessionStore`] persists one principal with an expiry and
//!   evicts it lazily once the expiry passes.
//! - [`guard::AuthGuard`] decides on every navigation whether the current
//!   route may be shown or which route replaces it.
//! - [`login::LoginService`] validates credentials, asks the backend API to
//!   check them, and records the resulting session.

pub mod error;
pub mod guard;
pub mod login;
pub mod models;
pub mod routes;
pub mod session;
pub mod validation;

pub use error::{LoginError, SessionError, SessionResult};
pub use guard::{AuthGuard, AuthState, Decision, Navigation};
pub use login::{HttpLoginBackend, LoginBackend, LoginOutcome, LoginService};
pub use models::{LoginCredentials, Principal, Role, SessionRecord};
pub use routes::{RouteKind, RouteTable};
pub use session::{DEFAULT_SESSION_TTL, Lookup, SIGNED_IN_KEY, SessionStore};
