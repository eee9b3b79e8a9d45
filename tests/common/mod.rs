//! Common test utilities and helpers
//!
//! Mounts the seven sign-in steps on one mock server that plays both the
//! API and the website.

#![allow(dead_code)]

use serde_json::json;
use trakt_sync_client::{Settings, TraktClient};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SIGN_IN_PAGE: &str = include_str!("../fixtures/signin.html");
pub const ACTIVATE_PAGE: &str = include_str!("../fixtures/activate.html");
pub const AUTHORIZE_PAGE: &str = include_str!("../fixtures/authorize.html");
pub const AUTHORIZED_PAGE: &str = include_str!("../fixtures/authorized.html");

pub const ACCESS_TOKEN: &str = "access-token-123";
pub const USERNAME: &str = "sean";
pub const SESSION_COOKIE: &str = "_trakt_session=abc";

/// Settings with test credentials and both base URLs on `base_url`
pub fn settings(base_url: &str, mode: &str) -> Settings {
    let mut settings = Settings::default();
    settings.trakt.client_id = "client-id".to_string();
    settings.trakt.client_secret = "client-secret".to_string();
    settings.trakt.email = "sean@example.com".to_string();
    settings.trakt.password = "hunter2".to_string();
    settings.trakt.sync_mode = mode.to_string();
    settings.network.api_base_url = base_url.to_string();
    settings.network.browser_base_url = base_url.to_string();
    settings
}

fn html(page: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(page.as_bytes().to_vec(), "text/html; charset=utf-8")
}

/// Mount every sign-in step; each form submission only matches with the
/// token scraped from the page before it.
pub async fn mount_sign_in(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth/device/code"))
        .and(header("trakt-api-key", "client-id"))
        .and(body_string_contains("client-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "device_code": "device-code-1",
            "user_code": "USERCODE",
            "verification_url": "https://trakt.tv/activate",
            "expires_in": 600,
            "interval": 5
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/signin"))
        .respond_with(html(SIGN_IN_PAGE))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/signin"))
        .and(body_string_contains("authenticity_token=signin-token"))
        .and(body_string_contains("user%5Blogin%5D=sean%40example.com"))
        .and(body_string_contains("user%5Bremember_me%5D=1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", format!("{}; Path=/", SESSION_COOKIE).as_str())
                .set_body_string("<html></html>"),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/activate"))
        .and(header("cookie", SESSION_COOKIE))
        .respond_with(html(ACTIVATE_PAGE))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/activate"))
        .and(body_string_contains("authenticity_token=activate-token"))
        .and(body_string_contains("code=USERCODE"))
        .and(body_string_contains("commit=Continue"))
        .respond_with(html(AUTHORIZE_PAGE))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/activate/authorize"))
        .and(body_string_contains("authenticity_token=authorize-token"))
        .and(body_string_contains("commit=Yes"))
        .respond_with(html(AUTHORIZED_PAGE))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/device/token"))
        .and(body_string_contains("device-code-1"))
        .and(body_string_contains("client-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": ACCESS_TOKEN,
            "token_type": "bearer",
            "expires_in": 7776000,
            "refresh_token": "refresh-token",
            "scope": "public",
            "created_at": 1700000000
        })))
        .mount(server)
        .await;
}

/// Start a mock server with the sign-in steps mounted
pub async fn sign_in_server() -> MockServer {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;
    server
}

/// Signed-in client against `server`
pub async fn client(server: &MockServer, mode: &str) -> TraktClient {
    TraktClient::new(&settings(&server.uri(), mode))
        .await
        .expect("sign-in against mock server")
}

/// Requests received so far, excluding the sign-in sequence
pub async fn sync_requests(server: &MockServer) -> Vec<wiremock::Request> {
    const SIGN_IN_PATHS: [&str; 5] = [
        "/oauth/device/code",
        "/oauth/device/token",
        "/auth/signin",
        "/activate",
        "/activate/authorize",
    ];
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| !SIGN_IN_PATHS.contains(&request.url.path()))
        .collect()
}
