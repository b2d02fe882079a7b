//! Certificate actions: create, revoke, download.

use std::sync::Arc;

use axum::Form;
use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::error::AppError;
use crate::routes::{FlashKind, flash_redirect};
use crate::state::AppState;

/// MIME type browsers associate with `.ovpn` profiles.
const OVPN_MIME: &str = "application/x-openvpn-profile";

#[derive(Debug, Deserialize)]
pub struct CreateForm {
    client_name: String,
}

/// `POST /create` — issue a certificate, then send the browser straight to
/// the profile download.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CreateForm>,
) -> Result<Redirect, AppError> {
    let name = form.client_name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Client name required".to_owned()));
    }

    state.easyrsa.build_client(name).await?;
    Ok(Redirect::to(&format!("/download/{name}")))
}

/// `POST /revoke/{name}` — revoke, regenerate the CRL, publish it.
pub async fn revoke(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Redirect, AppError> {
    state.easyrsa.revoke_client(&name).await?;
    Ok(flash_redirect(
        &format!("Certificate \"{name}\" revoked successfully!"),
        FlashKind::Success,
    ))
}

/// `GET /download/{name}` — stream the `.ovpn` profile as an attachment.
///
/// The profile text goes straight from the toolchain's stdout into the
/// response body; no temp file is involved.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    let profile = state.easyrsa.client_config(&name).await?;

    Ok((
        [
            (CONTENT_TYPE, OVPN_MIME.to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{name}.ovpn\""),
            ),
        ],
        profile,
    )
        .into_response())
}
