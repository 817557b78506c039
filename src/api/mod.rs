//! # API Module
//!
//! HTTP endpoints served to the quiz client.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! The authorization flow is a thin layer over
//! [`crate::management::TokenManager`]; the handlers hold no state of their own.
//!
//! - [`login`] - `GET /auth/login`, 307 redirect to Spotify's authorization page
//!   carrying a fresh CSRF `state`
//! - [`callback`] - `GET /auth/callback`, verifies `state` and exchanges `code`
//!   for tokens
//! - [`refresh`] - `GET /auth/tokens/refresh`, forces a token refresh
//! - [`tokens`] - `GET /auth/tokens`, current live token payload
//!
//! Token payloads have the shape
//! `{"access_token", "refresh_token", "token_expiration_date"}`.
//!
//! ### Catalog
//!
//! - [`top_artists`] - `GET /artists/top?time_range=&limit=`
//! - [`artist`] - `GET /artists/{id}`
//! - [`album`] - `GET /albums/{id}`
//! - [`top_songs`] - `GET /songs/top?time_range=&limit=`
//!
//! Top item limits above 50 are rejected with 400.
//!
//! ### Monitoring
//!
//! - [`index`] - `GET /`
//! - [`health`] - `GET /health`, status and version
//!
//! ## Errors
//!
//! Failures are returned as `{"detail": "<message>"}` with the status chosen
//! by [`crate::error::AuthError::status_code`] and
//! [`crate::error::ApiError::status_code`].

mod auth;
mod catalog;
mod health;

pub use auth::{callback, login, refresh, tokens};
pub use catalog::{album, artist, top_artists, top_songs};
pub use health::{health, index};
