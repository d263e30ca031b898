//! Sign-in and sign-out
//!
//! Credentials are checked by the backend API; this module only validates
//! the form, forwards it, and on success records the returned principal as
//! the signed-in session.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::{
    error::{LoginError, SessionResult},
    models::{LoginCredentials, Principal},
    routes::RouteTable,
    session::SessionStore,
    validation::validate_credentials,
};

/// Message shown when the backend gives no reason for a failure
pub const DEFAULT_LOGIN_ERROR: &str = "An unexpected error occurred. Please try again.";

/// Path of the backend login endpoint
pub const LOGIN_ENDPOINT: &str = "/api/employee/login";

/// Something that can turn credentials into a principal
#[async_trait]
pub trait LoginBackend: Send + Sync {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Principal, LoginError>;
}

/// Backend response envelope
#[derive(Debug, Deserialize)]
struct LoginEnvelope {
    #[serde(rename = "statusCode")]
    status_code: Option<u16>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

impl LoginEnvelope {
    fn rejection(self) -> LoginError {
        LoginError::Rejected(
            self.message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOGIN_ERROR.to_string()),
        )
    }
}

/// Login backend speaking to the REST API over HTTP
#[derive(Clone)]
pub struct HttpLoginBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLoginBackend {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, LOGIN_ENDPOINT)
    }
}

#[async_trait]
impl LoginBackend for HttpLoginBackend {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Principal, LoginError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(credentials)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let envelope: LoginEnvelope = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(LoginError::Rejected(DEFAULT_LOGIN_ERROR.to_string()));
            }
            Err(e) => return Err(LoginError::MalformedResponse(e.to_string())),
        };

        if !status.is_success() || envelope.status_code != Some(200) {
            return Err(envelope.rejection());
        }

        let data = envelope
            .data
            .ok_or_else(|| LoginError::MalformedResponse("missing data".to_string()))?;

        serde_json::from_value(data).map_err(|e| LoginError::MalformedResponse(e.to_string()))
    }
}

/// A completed sign-in
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub principal: Principal,
    /// Route to open next
    pub landing: &'static str,
}

/// Signs principals in and out of the session store
#[derive(Clone)]
pub struct LoginService {
    backend: Arc<dyn LoginBackend>,
    store: SessionStore,
    routes: RouteTable,
}

impl LoginService {
    pub fn new(backend: Arc<dyn LoginBackend>, store: SessionStore) -> Self {
        Self {
            backend,
            store,
            routes: RouteTable::default(),
        }
    }

    /// Validate, authenticate, and record the session
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, LoginError> {
        info!("Login attempt for user: {}", credentials.username);

        validate_credentials(credentials).map_err(LoginError::Invalid)?;

        let principal = match self.backend.authenticate(credentials).await {
            Ok(principal) => principal,
            Err(e) => {
                warn!("Login failed for user {}: {}", credentials.username, e);
                return Err(e);
            }
        };

        self.store.sign_in(&principal).map_err(|e| {
            error!("Failed to store session: {}", e);
            e
        })?;

        Ok(LoginOutcome {
            landing: self.routes.landing(principal.role),
            principal,
        })
    }

    /// Destroy the signed-in session
    pub fn logout(&self) -> SessionResult<()> {
        info!("Logout request");
        self.store.sign_out()
    }
}
