//! # Spotify Integration Module
//!
//! This module is the integration layer between Quizzify and Spotify's services.
//! It covers the OAuth token endpoint and the subset of the Web API the quiz
//! relies on.
//!
//! ## Architecture
//!
//! ```text
//! HTTP handlers (api)
//!          ↓
//! SpotifyApi ── authorization_header() ──→ TokenManager
//!     ├── artists (top artists, artist details)
//!     ├── albums (album details)
//!     └── songs (top songs)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API / Accounts service
//! ```
//!
//! ## Authentication Strategy
//!
//! [`auth`] implements the Authorization-Code grant with client credentials
//! sent as HTTP Basic authentication. The resulting bearer token is owned by
//! [`crate::management::TokenManager`]; every catalog request asks it for a
//! live token through [`authorization_header`], which refreshes expired tokens
//! transparently and fails with `Unauthenticated` when no credentials exist.
//!
//! ## Error Handling
//!
//! - Token problems surface as [`crate::error::AuthError`] wrapped in
//!   [`crate::error::ApiError::Auth`]
//! - Non-200 answers from the Web API keep their status code
//!   ([`crate::error::ApiError::Upstream`])
//! - Transport failures and timeouts become [`crate::error::ApiError::Request`]
//!
//! No request is retried automatically.

use std::{sync::Arc, time::Duration};

use reqwest::{
    Client, StatusCode,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;

use crate::{
    error::{ApiError, AuthError},
    management::TokenManager,
};

pub mod albums;
pub mod artists;
pub mod auth;
pub mod songs;

/// Spotify caps `limit` on the top items endpoints to this value.
pub const MAX_TOP_ITEMS: u32 = 50;

/// Rejects a top items `limit` Spotify would not honour.
fn check_limit(limit: u32, items: &'static str) -> Result<(), ApiError> {
    if limit > MAX_TOP_ITEMS {
        return Err(ApiError::LimitExceeded {
            items,
            max: MAX_TOP_ITEMS,
        });
    }
    Ok(())
}

/// Builds the HTTP client used for every outbound request.
pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder().timeout(timeout).build()
}

/// Returns the `Authorization: Bearer <token>` header for a catalog request.
///
/// # Errors
///
/// Propagates [`TokenManager::get_valid_token`] failures, most notably
/// [`AuthError::Unauthenticated`] before the first successful login.
pub async fn authorization_header(tokens: &TokenManager) -> Result<HeaderMap, AuthError> {
    let snapshot = tokens.get_valid_token().await?;
    // tokens are opaque ASCII; anything else is not usable as a bearer credential
    let value = HeaderValue::from_str(&format!("Bearer {}", snapshot.access_token))
        .map_err(|_| AuthError::Unauthenticated)?;

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// Client for the Spotify Web API sharing one [`TokenManager`].
#[derive(Clone)]
pub struct SpotifyApi {
    http: Client,
    base_url: String,
    tokens: Arc<TokenManager>,
}

impl SpotifyApi {
    pub fn new(http: Client, base_url: impl Into<String>, tokens: Arc<TokenManager>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    /// Sends an authorized GET request and decodes the JSON response.
    ///
    /// `failure` becomes the detail message when Spotify answers with
    /// anything other than `200 OK`.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        failure: &str,
    ) -> Result<T, ApiError> {
        let headers = authorization_header(&self.tokens).await?;
        let res = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .headers(headers)
            .query(query)
            .send()
            .await?;

        match res.status() {
            StatusCode::OK => Ok(res.json::<T>().await?),
            status => Err(ApiError::upstream(status.as_u16(), failure)),
        }
    }
}
