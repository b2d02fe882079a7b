//! Shared application state for the `ovpnadmin` server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`. It holds the easy-rsa driver, the session
//! store, and the admin credentials.

use std::sync::Arc;

use ovpnadmin_core::{CommandRunner, DockerRunner, EasyRsa};

use crate::config::ServerConfig;
use crate::session::SessionStore;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Driver for the containerized CA toolchain.
    pub easyrsa: EasyRsa,
    /// In-memory admin sessions.
    pub sessions: SessionStore,
    /// Admin login name.
    pub admin_user: String,
    /// Hex SHA-256 of the admin password.
    pub admin_password_hash: String,
    /// Session lifetime, also used as the cookie Max-Age.
    pub session_ttl_secs: u64,
}

impl AppState {
    /// Build production state from configuration (docker-backed runner).
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        let runner = Arc::new(DockerRunner {
            vpn_data: config.vpn_data.clone(),
            image: config.docker_image.clone(),
            container: config.vpn_container.clone(),
            use_sudo: config.use_sudo,
        });
        Self::new(runner, config)
    }

    /// Build state over an arbitrary runner (tests use a scripted one).
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>, config: &ServerConfig) -> Self {
        Self {
            easyrsa: EasyRsa::new(runner, config.easyrsa_password.clone()),
            sessions: SessionStore::new(config.session_ttl_secs),
            admin_user: config.admin_user.clone(),
            admin_password_hash: config.admin_password_hash.clone(),
            session_ttl_secs: config.session_ttl_secs,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
