//! Core library for `ovpnadmin`.
//!
//! This crate knows how to drive a containerized easy-rsa/OpenVPN toolchain
//! and nothing else — no HTTP, no sessions, no rendering. All certificate
//! state lives inside the toolchain's PKI directory; every listing is
//! re-derived from the toolchain's output, never cached here.
//!
//! Commands flow through the [`CommandRunner`] trait so the invocation
//! mechanism (docker, sudo, a scripted stand-in for tests) stays pluggable.

mod easyrsa;
mod error;
mod listing;
mod runner;

pub use easyrsa::{EasyRsa, valid_client_name};
pub use error::CaError;
pub use listing::{CertStatus, ClientCert};
pub use runner::{CommandOutput, CommandRunner, DockerRunner, RecordedCall, ScriptedRunner};
