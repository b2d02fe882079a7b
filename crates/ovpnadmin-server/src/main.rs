//! `ovpnadmin` server entry point.
//!
//! Loads configuration, wires the docker-backed easy-rsa driver into the
//! session-gated web UI, and starts the Axum HTTP server with graceful
//! shutdown. A background sweeper prunes expired sessions alongside the
//! server and is cancelled on shutdown.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::HeaderValue;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use ovpnadmin_server::config::ServerConfig;
use ovpnadmin_server::routes;
use ovpnadmin_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!(
        image = %config.docker_image,
        vpn_data = %config.vpn_data,
        "ovpnadmin starting"
    );

    if config.admin_password_hash.is_empty() {
        tracing::warn!("ADMIN_PASSWORD_HASH is empty — nobody will be able to log in");
    }
    if config.easyrsa_password.is_empty() {
        tracing::warn!("EASYRSA_PASSWORD is empty — issuing and revoking will fail if the CA key is protected");
    }

    let state = Arc::new(AppState::from_config(&config));

    // Shutdown signal channel.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Spawn the expired-session sweeper.
    let sweeper_handle = {
        let state = Arc::clone(&state);
        let mut rx = shutdown_rx.clone();
        let interval_secs = config.session_sweep_interval_secs;
        tokio::spawn(async move {
            session_sweeper(&state, &mut rx, interval_secs).await;
        })
    };

    let app = routes::build_router(Arc::clone(&state))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "ovpnadmin listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await
        .context("server error")?;

    info!("waiting for background workers to stop");
    let _ = tokio::time::timeout(Duration::from_secs(5), sweeper_handle).await;

    info!("ovpnadmin stopped");
    Ok(())
}

/// Background worker that periodically prunes expired sessions.
async fn session_sweeper(
    state: &AppState,
    shutdown: &mut watch::Receiver<bool>,
    interval_secs: u64,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    info!(interval_secs, "session sweeper started");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let pruned = state.sessions.sweep().await;
                if pruned > 0 {
                    info!(pruned, "expired sessions removed");
                }
            }
            _ = shutdown.changed() => {
                info!("session sweeper shutting down");
                return;
            }
        }
    }
}

/// Wait for SIGINT or SIGTERM, then broadcast shutdown.
async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
    let _ = shutdown_tx.send(true);
}
