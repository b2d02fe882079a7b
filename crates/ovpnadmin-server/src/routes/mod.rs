//! HTTP routes for the `ovpnadmin` web UI.
//!
//! Navigation is redirect-with-flash: actions land back on the dashboard
//! with a `?message=…&kind=…` query string that the next render turns into
//! a banner.

pub mod auth;
pub mod certs;
pub mod dashboard;

use std::sync::Arc;

use axum::Router;
use axum::middleware as axum_mw;
use axum::response::Redirect;
use axum::routing::{get, post};

use crate::middleware::auth_middleware;
use crate::state::AppState;

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Redirect to the dashboard carrying a flash message.
#[must_use]
pub fn flash_redirect(message: &str, kind: FlashKind) -> Redirect {
    Redirect::to(&format!(
        "/?message={}&kind={}",
        urlencoding::encode(message),
        kind.as_str()
    ))
}

/// Build the full application router.
///
/// Everything except `/login` sits behind the session middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    // Issue/revoke each spin up a docker container; cap them so a burst of
    // form submissions cannot pile up easy-rsa runs.
    let actions = Router::new()
        .route("/create", post(certs::create))
        .route("/revoke/{name}", post(certs::revoke))
        .layer(tower::limit::ConcurrencyLimitLayer::new(4));

    let protected = Router::new()
        .route("/", get(dashboard::index))
        .route("/download/{name}", get(certs::download))
        .route("/logout", get(auth::logout))
        .merge(actions)
        .route_layer(axum_mw::from_fn_with_state(
            Arc::clone(&state),
            auth_middleware,
        ));

    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .merge(protected)
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use ovpnadmin_core::{CommandOutput, CommandRunner, ScriptedRunner};

    use crate::config::ServerConfig;
    use crate::session::hash_password;

    fn test_config() -> ServerConfig {
        ServerConfig {
            bind_addr: ([127, 0, 0, 1], 0).into(),
            vpn_data: "/tmp/vpn-data".to_owned(),
            docker_image: "vpn".to_owned(),
            vpn_container: "vpn".to_owned(),
            use_sudo: false,
            easyrsa_password: "ca-pass".to_owned(),
            admin_user: "admin".to_owned(),
            admin_password_hash: hash_password("hunter2"),
            session_ttl_secs: 3600,
            session_sweep_interval_secs: 300,
            log_level: "info".to_owned(),
        }
    }

    fn ok(stdout: &str) -> CommandOutput {
        CommandOutput {
            status: 0,
            stdout: stdout.to_owned(),
            stderr: String::new(),
        }
    }

    fn app_with(responses: Vec<CommandOutput>) -> (Router, Arc<AppState>) {
        let runner = Arc::new(ScriptedRunner::new(responses));
        let state = Arc::new(AppState::new(
            runner as Arc<dyn CommandRunner>,
            &test_config(),
        ));
        (build_router(Arc::clone(&state)), state)
    }

    fn form_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    async fn login(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(form_request("/login", "username=admin&password=hunter2"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/");

        let set_cookie = response.headers()[SET_COOKIE].to_str().unwrap();
        let (pair, _) = set_cookie.split_once(';').unwrap();
        pair.to_owned()
    }

    #[tokio::test]
    async fn unauthenticated_dashboard_redirects_to_login() {
        let (app, _) = app_with(vec![]);
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/login");
    }

    #[tokio::test]
    async fn login_page_is_reachable_without_a_session() {
        let (app, _) = app_with(vec![]);
        let response = app
            .oneshot(Request::get("/login").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn wrong_password_does_not_issue_a_session() {
        let (app, _) = app_with(vec![]);
        let response = app
            .oneshot(form_request("/login", "username=admin&password=wrong"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!response.headers().contains_key(SET_COOKIE));
    }

    #[tokio::test]
    async fn login_then_dashboard_renders_listing() {
        let (app, _) = app_with(vec![ok(
            "name,begin,end,status\nalice,May 15 17:36:51 2025 GMT,May 13 17:36:51 2035 GMT,VALID\n",
        )]);
        let cookie = login(&app).await;

        let response = app
            .oneshot(
                Request::get("/")
                    .header(COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn create_redirects_to_download_on_success() {
        let (app, _) = app_with(vec![ok("issued")]);
        let cookie = login(&app).await;

        let mut request = form_request("/create", "client_name=alice");
        request
            .headers_mut()
            .insert(COOKIE, cookie.parse().unwrap());
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/download/alice");
    }

    #[tokio::test]
    async fn create_with_invalid_name_flashes_an_error() {
        let (app, _) = app_with(vec![]);
        let cookie = login(&app).await;

        let mut request = form_request("/create", "client_name=bad%20name");
        request
            .headers_mut()
            .insert(COOKIE, cookie.parse().unwrap());
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[LOCATION].to_str().unwrap();
        assert!(location.starts_with("/?message="));
        assert!(location.ends_with("kind=error"));
    }

    #[tokio::test]
    async fn revoke_flashes_success_and_runs_crl_steps() {
        let (app, _) = app_with(vec![ok("revoked"), ok("crl"), ok("")]);
        let cookie = login(&app).await;

        let mut request = form_request("/revoke/bob", "");
        request
            .headers_mut()
            .insert(COOKIE, cookie.parse().unwrap());
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[LOCATION].to_str().unwrap();
        assert!(location.contains("kind=success"), "got {location}");
    }

    #[tokio::test]
    async fn download_sets_attachment_headers() {
        let (app, _) = app_with(vec![ok("client\ndev tun\n")]);
        let cookie = login(&app).await;

        let response = app
            .oneshot(
                Request::get("/download/alice")
                    .header(COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[CONTENT_TYPE],
            "application/x-openvpn-profile"
        );
        let disposition = response.headers()["content-disposition"].to_str().unwrap();
        assert!(disposition.contains("alice.ovpn"));
    }

    #[tokio::test]
    async fn logout_clears_the_cookie_and_kills_the_session() {
        let (app, state) = app_with(vec![]);
        let cookie = login(&app).await;

        let response = app
            .clone()
            .oneshot(
                Request::get("/logout")
                    .header(COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/login");
        let set_cookie = response.headers()[SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.contains("Max-Age=0"));
        assert!(state.sessions.is_empty().await);

        // The old cookie no longer works.
        let response = app
            .oneshot(
                Request::get("/")
                    .header(COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/login");
    }

    #[test]
    fn flash_redirect_percent_encodes_the_message() {
        let redirect = flash_redirect("a & b", FlashKind::Error);
        // Redirect does not expose its target; round-trip through a response.
        let response = axum::response::IntoResponse::into_response(redirect);
        let location = response.headers()[LOCATION].to_str().unwrap();
        assert_eq!(location, "/?message=a%20%26%20b&kind=error");
    }
}
