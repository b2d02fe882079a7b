//! Session-cookie authentication middleware.
//!
//! Every route except `/login` sits behind [`auth_middleware`]: it reads
//! the session cookie, validates it against the in-memory store, and
//! injects an [`AuthContext`] into request extensions. Browsers without a
//! valid session are redirected to `/login` rather than handed a 401 —
//! this is an HTML UI, not an API.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "ovpnadmin_session";

/// Identity attached to authenticated requests.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub username: String,
}

/// Extract the session cookie value from request headers.
#[must_use]
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_owned())
    })
}

/// Build a `Set-Cookie` value that installs the session cookie.
#[must_use]
pub fn set_session_cookie(id: &str, max_age_secs: u64) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

/// Build a `Set-Cookie` value that clears the session cookie.
#[must_use]
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Axum middleware gating the certificate routes behind a valid session.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(id) = session_cookie(req.headers()) else {
        return Redirect::to("/login").into_response();
    };

    match state.sessions.validate(&id).await {
        Some(session) => {
            req.extensions_mut().insert(AuthContext {
                username: session.username,
            });
            next.run(req).await
        }
        None => Redirect::to("/login").into_response(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn finds_session_cookie_among_others() {
        let h = headers("theme=dark; ovpnadmin_session=abc123; lang=en");
        assert_eq!(session_cookie(&h).as_deref(), Some("abc123"));
    }

    #[test]
    fn missing_or_foreign_cookies_yield_none() {
        assert!(session_cookie(&HeaderMap::new()).is_none());
        let h = headers("theme=dark; other=1");
        assert!(session_cookie(&h).is_none());
    }

    #[test]
    fn cookie_attributes() {
        let set = set_session_cookie("abc", 86_400);
        assert!(set.contains("HttpOnly"));
        assert!(set.contains("SameSite=Lax"));
        assert!(set.contains("Max-Age=86400"));

        let clear = clear_session_cookie();
        assert!(clear.contains("Max-Age=0"));
    }
}
