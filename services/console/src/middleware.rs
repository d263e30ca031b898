//! Route guard middleware

use auth::Decision;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tokio::task;
use tracing::error;

use crate::{error::ConsoleError, state::AppState};

/// Resolve the requested path against the signed-in session
///
/// Redirects replace the request with a `303 See Other`. When the page may
/// be shown, the signed-in principal (if any) is added to the request
/// extensions for the handler.
///
/// Storage backends are synchronous, so the session read runs on the
/// blocking pool.
pub async fn guard_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let guard = state.guard.clone();
    let path = req.uri().path().to_string();

    let navigation = match task::spawn_blocking(move || guard.resolve(&path)).await {
        Ok(navigation) => navigation,
        Err(e) => {
            error!("Route guard task failed: {}", e);
            return ConsoleError::InternalServerError.into_response();
        }
    };

    match navigation.decision {
        Decision::Redirect(target) => Redirect::to(target).into_response(),
        Decision::Stay => {
            if let Some(principal) = navigation.state.into_principal() {
                req.extensions_mut().insert(principal);
            }
            next.run(req).await
        }
    }
}
