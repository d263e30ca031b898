//! Console service routes

use auth::{LoginCredentials, Principal, routes as paths};
use axum::{
    Extension, Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, Uri},
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{any, get, post},
};
use serde_json::json;
use tokio::task;
use tracing::error;

use crate::{
    error::{ConsoleError, ConsoleResult},
    middleware::guard_middleware,
    models::PageResponse,
    state::AppState,
};

/// Create the router for the console service
pub fn create_router(state: AppState) -> Router {
    let pages = Router::new()
        .route(paths::LOGIN_PATH, get(login_page))
        .route(paths::EMPLOYEE_DASHBOARD, get(employee_dashboard))
        .route(paths::EMPLOYEE_OPENING_DETAILS, get(opening_details))
        .route(paths::ADMIN_HOME, get(admin_dashboard))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/api/*path", any(proxy_api))
        .merge(pages)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "gas-console"
    }))
}

pub async fn login_page() -> Json<PageResponse> {
    Json(PageResponse::new("login", None))
}

pub async fn employee_dashboard(principal: Option<Extension<Principal>>) -> Json<PageResponse> {
    Json(PageResponse::new(
        "employee-dashboard",
        principal.map(|Extension(p)| p),
    ))
}

pub async fn opening_details(principal: Option<Extension<Principal>>) -> Json<PageResponse> {
    Json(PageResponse::new(
        "employee-opening-details",
        principal.map(|Extension(p)| p),
    ))
}

pub async fn admin_dashboard(principal: Option<Extension<Principal>>) -> Json<PageResponse> {
    Json(PageResponse::new(
        "admin-dashboard",
        principal.map(|Extension(p)| p),
    ))
}

pub async fn not_found() -> ConsoleError {
    ConsoleError::NotFound
}

/// Sign in through the backend and open the landing page
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginCredentials>,
) -> ConsoleResult<Redirect> {
    let outcome = state.login.login(&credentials).await?;
    Ok(Redirect::to(outcome.landing))
}

/// Sign out and return to the login page
pub async fn logout(State(state): State<AppState>) -> ConsoleResult<Redirect> {
    let login = state.login.clone();
    task::spawn_blocking(move || login.logout())
        .await
        .map_err(|e| {
            error!("Logout task failed: {}", e);
            ConsoleError::InternalServerError
        })?
        .map_err(|e| {
            error!("Failed to remove session: {}", e);
            ConsoleError::InternalServerError
        })?;

    Ok(Redirect::to(paths::LOGIN_PATH))
}

/// Relay an API call to the backend
pub async fn proxy_api(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> ConsoleResult<Response> {
    state.proxy.forward(method, &uri, &headers, body).await
}
