#![allow(dead_code)]

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode},
};
use chrono::{TimeDelta, Utc};
use quizzify::{
    config::{Config, SpotifyConfig},
    server::AppState,
    types::TokenSnapshot,
};
use serde_json::Value;
use tower::ServiceExt;
use url::Url;
use wiremock::MockServer;

pub const CLIENT_ID: &str = "test_client_id";
pub const CLIENT_SECRET: &str = "test_client_secret";
pub const REDIRECT_URI: &str = "http://127.0.0.1:8000/auth/callback";
pub const AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const SCOPE: &str = "user-top-read user-read-email";
pub const TOKEN_PATH: &str = "/api/token";
pub const BASIC_AUTH: &str = "Basic dGVzdF9jbGllbnRfaWQ6dGVzdF9jbGllbnRfc2VjcmV0";

pub fn spotify_config(server: &MockServer) -> SpotifyConfig {
    SpotifyConfig {
        client_id: CLIENT_ID.to_string(),
        client_secret: CLIENT_SECRET.to_string(),
        redirect_uri: REDIRECT_URI.to_string(),
        auth_url: Url::parse(AUTH_URL).unwrap(),
        token_url: Url::parse(&format!("{}{}", server.uri(), TOKEN_PATH)).unwrap(),
        scope: SCOPE.to_string(),
        api_url: format!("{}/v1", server.uri()),
        request_timeout: Duration::from_secs(5),
    }
}

pub fn app_state(server: &MockServer) -> AppState {
    let config = Config {
        server_address: "127.0.0.1:0".to_string(),
        spotify: spotify_config(server),
    };
    AppState::from_config(&config).unwrap()
}

/// Reads the `state` query parameter of an authorization URL.
pub fn state_of(authorization_url: &str) -> String {
    Url::parse(authorization_url)
        .unwrap()
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .expect("authorization url carries a state")
}

pub fn snapshot(access: &str, refresh: Option<&str>, expires_in: TimeDelta) -> TokenSnapshot {
    TokenSnapshot {
        access_token: access.to_string(),
        refresh_token: refresh.map(str::to_string),
        expires_at: Utc::now() + expires_in,
    }
}

/// Asserts that `snapshot` expires roughly `seconds` from now.
pub fn assert_expires_in(snapshot: &TokenSnapshot, seconds: i64) {
    let drift = (snapshot.expires_at - Utc::now() - TimeDelta::seconds(seconds)).num_seconds();
    assert!(drift.abs() <= 5, "unexpected expiry drift of {drift}s");
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, HeaderMap, Value) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}
