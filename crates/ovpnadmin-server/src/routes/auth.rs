//! Login and logout routes.
//!
//! A single shared admin account: the submitted password is SHA-256 hashed
//! and compared in constant time against the configured hash. Successful
//! logins get an in-memory session and a cookie; failures re-render the
//! form with an inline error, no redirect.

use std::sync::Arc;

use axum::Form;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::SET_COOKIE;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::middleware::{clear_session_cookie, session_cookie, set_session_cookie};
use crate::session::verify_password;
use crate::state::AppState;
use crate::templates;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

/// `GET /login` — render the login form.
pub async fn login_page() -> Html<String> {
    Html(templates::render_login(None))
}

/// `POST /login` — check credentials and open a session.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Response {
    if state.admin_password_hash.is_empty() {
        tracing::warn!("login attempted but ADMIN_PASSWORD_HASH is not configured");
        return Html(templates::render_login(Some(
            "Login is not configured on this server",
        )))
        .into_response();
    }

    let user_ok = form.username == state.admin_user;
    let pass_ok = verify_password(&form.password, &state.admin_password_hash);
    if !(user_ok && pass_ok) {
        tracing::info!(username = %form.username, "failed login attempt");
        return Html(templates::render_login(Some("Invalid username or password")))
            .into_response();
    }

    let id = state.sessions.create(&form.username).await;
    tracing::info!(username = %form.username, "admin logged in");

    (
        [(SET_COOKIE, set_session_cookie(&id, state.session_ttl_secs))],
        Redirect::to("/"),
    )
        .into_response()
}

/// `GET /logout` — revoke the session and clear the cookie.
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(id) = session_cookie(&headers) {
        state.sessions.revoke(&id).await;
    }
    (
        [(SET_COOKIE, clear_session_cookie())],
        Redirect::to("/login"),
    )
        .into_response()
}
