//! The certificate dashboard at `/`.

use std::sync::Arc;

use axum::Extension;
use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;

use crate::middleware::AuthContext;
use crate::state::AppState;
use crate::templates;

/// Flash message carried in the query string by redirecting actions.
#[derive(Debug, Deserialize)]
pub struct FlashParams {
    message: Option<String>,
    kind: Option<String>,
}

/// `GET /` — list certificates and render the dashboard.
///
/// The listing is re-read from the toolchain on every request. If even the
/// fallback listing fails, the dashboard still renders — empty, with the
/// toolchain error as a banner — so the operator can see what broke.
pub async fn index(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<FlashParams>,
) -> Html<String> {
    let (certs, listing_error) = match state.easyrsa.list_clients().await {
        Ok(certs) => (certs, None),
        Err(err) => {
            tracing::error!(error = %err, "certificate listing failed");
            (Vec::new(), Some(format!("Error listing certificates: {err}")))
        }
    };

    let flash = if let Some(ref msg) = listing_error {
        Some((msg.as_str(), "error"))
    } else {
        params
            .message
            .as_deref()
            .map(|msg| (msg, params.kind.as_deref().unwrap_or("success")))
    };

    Html(templates::render_dashboard(&auth.username, &certs, flash))
}
