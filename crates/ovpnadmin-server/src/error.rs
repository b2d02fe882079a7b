//! HTTP error mapping for the `ovpnadmin` server.
//!
//! This is a browser UI, so errors become redirects carrying a flash
//! message rather than JSON bodies: domain failures land back on the
//! dashboard with an error banner, missing sessions land on `/login`.

use axum::response::{IntoResponse, Redirect, Response};

use ovpnadmin_core::CaError;

use crate::routes::{FlashKind, flash_redirect};

/// Application-level error returned from HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No valid session — send the browser to the login form.
    #[error("unauthorized")]
    Unauthorized,
    /// The request was malformed (bad client name, empty field).
    #[error("{0}")]
    BadRequest(String),
    /// The named certificate does not exist.
    #[error("{0}")]
    NotFound(String),
    /// The certificate was revoked before this request.
    #[error("certificate \"{0}\" is already revoked")]
    AlreadyRevoked(String),
    /// The external toolchain failed; message shown verbatim.
    #[error("{0}")]
    Toolchain(String),
}

impl From<CaError> for AppError {
    fn from(err: CaError) -> Self {
        match err {
            CaError::InvalidName { .. } => Self::BadRequest(err.to_string()),
            CaError::AlreadyRevoked { name } => Self::AlreadyRevoked(name),
            CaError::NotFound { .. } => Self::NotFound(err.to_string()),
            CaError::CommandFailed { .. } | CaError::Spawn(_) | CaError::ParseOutput { .. } => {
                Self::Toolchain(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::Unauthorized => Redirect::to("/login").into_response(),
            Self::BadRequest(_) | Self::NotFound(_) | Self::AlreadyRevoked(_) => {
                flash_redirect(&self.to_string(), FlashKind::Error).into_response()
            }
            Self::Toolchain(msg) => {
                tracing::warn!(error = %msg, "toolchain operation failed");
                flash_redirect(&format!("Error: {msg}"), FlashKind::Error).into_response()
            }
        }
    }
}
