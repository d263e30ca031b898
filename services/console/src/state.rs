//! Application state shared across handlers

use std::sync::Arc;

use auth::{AuthGuard, LoginBackend, LoginService, SessionStore};

use crate::proxy::ApiProxy;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub guard: AuthGuard,
    pub login: LoginService,
    pub proxy: ApiProxy,
}

impl AppState {
    pub fn new(store: SessionStore, backend: Arc<dyn LoginBackend>, proxy: ApiProxy) -> Self {
        Self {
            guard: AuthGuard::new(store.clone()),
            login: LoginService::new(backend, store),
            proxy,
        }
    }
}
