//! Route guard
//!
//! Decides, for every navigation, whether the current path may be shown
//! or which path should replace it. Two checks run in order:
//!
//! 1. The gate: signed-out visitors may only see the login route, and
//!    signed-in principals are sent from the login route to their home.
//! 2. The route wrapper: protected subtrees require a session, and each
//!    subtree only admits the role that owns it.
//!
//! Every redirect target is a route the same session is allowed to stay
//! on, so resolution never loops.

use tracing::debug;

use crate::{
    models::{Principal, Role},
    routes::RouteTable,
    session::SessionStore,
};

/// Who is navigating
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Unauthenticated,
    Admin(Principal),
    Employee(Principal),
}

impl AuthState {
    pub fn from_session(principal: Option<Principal>) -> Self {
        match principal {
            None => AuthState::Unauthenticated,
            Some(p) if p.is_admin() => AuthState::Admin(p),
            Some(p) => AuthState::Employee(p),
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            AuthState::Unauthenticated => None,
            AuthState::Admin(_) => Some(Role::Admin),
            AuthState::Employee(_) => Some(Role::Employee),
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            AuthState::Unauthenticated => None,
            AuthState::Admin(p) | AuthState::Employee(p) => Some(p),
        }
    }

    pub fn into_principal(self) -> Option<Principal> {
        match self {
            AuthState::Unauthenticated => None,
            AuthState::Admin(p) | AuthState::Employee(p) => Some(p),
        }
    }
}

/// What to do with a navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Render the requested path
    Stay,
    /// Replace the current history entry with this path
    Redirect(&'static str),
}

/// A resolved navigation
#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    pub state: AuthState,
    pub decision: Decision,
}

/// Route guard reading the signed-in session
#[derive(Clone)]
pub struct AuthGuard {
    store: SessionStore,
    routes: RouteTable,
}

impl AuthGuard {
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            routes: RouteTable::default(),
        }
    }

    /// Current session state
    pub fn state(&self) -> AuthState {
        AuthState::from_session(self.store.signed_in())
    }

    /// Apply the gate to `path`
    pub fn evaluate(&self, path: &str) -> Decision {
        self.gate(&self.state(), path)
    }

    /// Apply the route wrapper to `path`
    pub fn protect(&self, path: &str) -> Decision {
        self.wrap(&self.state(), path)
    }

    /// Apply the gate, then the route wrapper, against a single session read
    pub fn resolve(&self, path: &str) -> Navigation {
        let state = self.state();
        let decision = match self.gate(&state, path) {
            Decision::Stay => self.wrap(&state, path),
            redirect => redirect,
        };

        debug!(path, ?decision, role = ?state.role(), "Resolved navigation");
        Navigation { state, decision }
    }

    fn gate(&self, state: &AuthState, path: &str) -> Decision {
        let on_login = path == self.routes.login;

        match state.role() {
            None if on_login => Decision::Stay,
            None => Decision::Redirect(self.routes.login),
            Some(role) if on_login => Decision::Redirect(self.routes.home(role)),
            Some(_) => Decision::Stay,
        }
    }

    fn wrap(&self, state: &AuthState, path: &str) -> Decision {
        let kind = self.routes.classify(path);
        let Some(owner) = kind.owner() else {
            return Decision::Stay;
        };

        match state.role() {
            None => Decision::Redirect(self.routes.login),
            Some(role) if role != owner => Decision::Redirect(self.routes.home(role)),
            Some(_) => Decision::Stay,
        }
    }
}
