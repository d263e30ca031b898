use std::sync::Arc;

use anyhow::Result;
use auth::{HttpLoginBackend, SessionStore};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod config;
mod error;
mod middleware;
mod models;
mod proxy;
mod routes;
mod state;

use crate::{config::ConsoleConfig, proxy::ApiProxy, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting gas console");

    let config = ConsoleConfig::from_env()?;
    info!(
        "Backend API at {}, session storage {:?}",
        config.backend_url, config.storage
    );

    let storage = config.open_storage()?;
    let store = SessionStore::new(storage).with_ttl(config.session_ttl());

    let http = config.http_client()?;
    let backend = Arc::new(HttpLoginBackend::new(http.clone(), &config.backend_url));
    let proxy = ApiProxy::new(http, &config.backend_url);

    let app_state = AppState::new(store, backend, proxy);

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("Gas console listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
