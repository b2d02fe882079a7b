//! `ovpnadmin` HTTP server.
//!
//! Wires the easy-rsa driver from `ovpnadmin-core` into a session-gated
//! Axum web UI: list, issue, download, and revoke OpenVPN client
//! certificates. The application owns no persistent state — every listing
//! is re-read from the toolchain's PKI directory on request.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;
pub mod templates;
