//! Error types for `ovpnadmin-core`.
//!
//! External-process failures carry the toolchain's stderr verbatim so the
//! caller can surface it to the operator. The CA passphrase is only ever
//! written to stdin and never appears in an error.

/// Errors from driving the CA toolchain.
#[derive(Debug, thiserror::Error)]
pub enum CaError {
    /// The client name contains characters outside `[A-Za-z0-9_.-]` or is empty.
    #[error("invalid client name {name:?}: only letters, digits, underscore, dot and dash are allowed")]
    InvalidName { name: String },

    /// The certificate has already been revoked.
    #[error("certificate for '{name}' is already revoked")]
    AlreadyRevoked { name: String },

    /// No certificate exists for the given client name.
    #[error("no certificate found for '{name}'")]
    NotFound { name: String },

    /// A toolchain command exited non-zero.
    #[error("'{command}' exited with status {status}: {detail}")]
    CommandFailed {
        command: String,
        status: i32,
        detail: String,
    },

    /// The toolchain process could not be spawned or its pipes failed.
    #[error("failed to run CA toolchain: {0}")]
    Spawn(#[from] std::io::Error),

    /// The toolchain produced output this crate cannot interpret.
    #[error("unparseable toolchain output: {reason}")]
    ParseOutput { reason: String },
}
