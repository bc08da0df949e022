//! Router, shared state, and the listener loop with graceful shutdown.

use crate::config::Config;
use crate::messenger::{MessengerClient, ReplySender};
use crate::server::webhook::{receive_webhook, verify_webhook};
use anyhow::{Context, Result};
use axum::{extract::State, routing::get, Json, Router};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared state for the handlers: read-only config and the reply sender.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub replies: Arc<dyn ReplySender>,
}

impl AppState {
    /// State backed by a Graph API client built from `config.messenger`.
    pub fn new(config: Config) -> Self {
        let client = MessengerClient::new(&config.messenger);
        Self::with_reply_sender(config, Arc::new(client))
    }

    /// State with a caller-supplied reply sender.
    pub fn with_reply_sender(config: Config, replies: Arc<dyn ReplySender>) -> Self {
        Self {
            config: Arc::new(config),
            replies,
        }
    }
}

/// All routes, bound to `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_http))
        .route("/webhook", get(verify_webhook).post(receive_webhook))
        .with_state(state)
}

/// Run the server; binds to config.server.bind:config.server.port.
/// Blocks until shutdown (e.g. Ctrl+C).
pub async fn run_server(config: Config) -> Result<()> {
    let placeholders = config.messenger.placeholder_credentials();
    if !placeholders.is_empty() {
        log::warn!(
            "using placeholder credentials for {}; handshake and replies will fail until they are set",
            placeholders.join(", ")
        );
    }
    let bind_addr = format!("{}:{}", config.server.bind.trim(), config.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("server is listening on {}", bind_addr);
    serve(listener, AppState::new(config)).await
}

/// Serve the router on an already-bound listener until shutdown.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    log::debug!(
        "reply delivery mode: {:?}",
        state.config.server.reply_delivery
    );
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited")?;
    log::info!("server stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
/// Replies still running on background tasks are not awaited.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                log::warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

/// GET / returns a simple health JSON (for probes).
async fn health_http(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "runtime": "running",
        "port": state.config.server.port,
    }))
}
