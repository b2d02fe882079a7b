//! Server configuration for `ovpnadmin`.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Most settings can be overridden via `OVPNADMIN_*` environment variables;
//! the CA passphrase and admin password hash keep the names the toolchain
//! deployments already use.

use std::net::SocketAddr;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Host directory holding the PKI, bind-mounted into the toolchain.
    pub vpn_data: String,
    /// Docker image carrying easy-rsa and the ovpn helper scripts.
    pub docker_image: String,
    /// Name of the long-running VPN container (CRL publishing target).
    pub vpn_container: String,
    /// Prefix docker invocations with `sudo`.
    pub use_sudo: bool,
    /// CA passphrase fed to easy-rsa on stdin.
    pub easyrsa_password: String,
    /// Admin login name.
    pub admin_user: String,
    /// Hex SHA-256 of the admin password. Empty means login is impossible.
    pub admin_password_hash: String,
    /// Session lifetime in seconds.
    pub session_ttl_secs: u64,
    /// Interval between expired-session sweeps in seconds.
    pub session_sweep_interval_secs: u64,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `OVPNADMIN_BIND_ADDR` — full bind address (overrides `PORT`, default: `0.0.0.0:8082`)
    /// - `PORT` — port to bind on `0.0.0.0` (Railway convention)
    /// - `OVPNADMIN_VPN_DATA` — host PKI directory (default: `/opt/vpn-data`)
    /// - `OVPNADMIN_DOCKER_IMAGE` — toolchain image (default: `vpn`)
    /// - `OVPNADMIN_VPN_CONTAINER` — running VPN container name (default: `vpn`)
    /// - `OVPNADMIN_USE_SUDO` — prefix docker with sudo (default: `true`)
    /// - `EASYRSA_PASSWORD` — CA passphrase (default: empty)
    /// - `OVPNADMIN_ADMIN_USER` — admin login name (default: `admin`)
    /// - `ADMIN_PASSWORD_HASH` — hex SHA-256 of the admin password (default: empty)
    /// - `OVPNADMIN_SESSION_TTL` — session lifetime in seconds (default: `86400`)
    /// - `OVPNADMIN_SESSION_SWEEP_INTERVAL` — seconds between sweeps (default: `300`)
    /// - `OVPNADMIN_LOG_LEVEL` — log filter (default: `info`)
    #[must_use]
    pub fn from_env() -> Self {
        // Priority: OVPNADMIN_BIND_ADDR > PORT > default 0.0.0.0:8082
        let bind_addr = if let Ok(addr) = std::env::var("OVPNADMIN_BIND_ADDR") {
            addr.parse()
                .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 8082)))
        } else if let Ok(port_str) = std::env::var("PORT") {
            let port: u16 = port_str.parse().unwrap_or(8082);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            SocketAddr::from(([0, 0, 0, 0], 8082))
        };

        let vpn_data = std::env::var("OVPNADMIN_VPN_DATA")
            .unwrap_or_else(|_| "/opt/vpn-data".to_owned());

        let docker_image =
            std::env::var("OVPNADMIN_DOCKER_IMAGE").unwrap_or_else(|_| "vpn".to_owned());

        let vpn_container =
            std::env::var("OVPNADMIN_VPN_CONTAINER").unwrap_or_else(|_| "vpn".to_owned());

        let use_sudo = std::env::var("OVPNADMIN_USE_SUDO")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        let easyrsa_password = std::env::var("EASYRSA_PASSWORD").unwrap_or_default();

        let admin_user =
            std::env::var("OVPNADMIN_ADMIN_USER").unwrap_or_else(|_| "admin".to_owned());

        let admin_password_hash = std::env::var("ADMIN_PASSWORD_HASH")
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        let session_ttl_secs = std::env::var("OVPNADMIN_SESSION_TTL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400);

        let session_sweep_interval_secs = std::env::var("OVPNADMIN_SESSION_SWEEP_INTERVAL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(300);

        let log_level =
            std::env::var("OVPNADMIN_LOG_LEVEL").unwrap_or_else(|_| "info".to_owned());

        Self {
            bind_addr,
            vpn_data,
            docker_image,
            vpn_container,
            use_sudo,
            easyrsa_password,
            admin_user,
            admin_password_hash,
            session_ttl_secs,
            session_sweep_interval_secs,
            log_level,
        }
    }
}
