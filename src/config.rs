//! Configuration management for the Quizzify backend.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage application
//! configuration including Spotify API credentials, endpoint URLs, the requested
//! scope and server settings.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the current working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)

use std::{env, fmt, path::PathBuf, time::Duration};

use thiserror::Error;
use url::Url;

/// Address the HTTP server binds to when `SERVER_ADDRESS` is not set.
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8000";

/// Timeout applied to every outbound request when `SPOTIFY_REQUEST_TIMEOUT` is not set.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value `{value}`: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Loads environment variables from `.env` files.
///
/// Variables already present in the process environment are never overwritten.
/// The working directory is searched first, then the platform-specific local
/// data directory under `quizzify/.env`. Missing files are not an error since
/// every value can also be provided directly through the environment.
///
/// # Directory Structure
///
/// The data directory file lives in:
/// - Linux: `~/.local/share/quizzify/.env`
/// - macOS: `~/Library/Application Support/quizzify/.env`
/// - Windows: `%LOCALAPPDATA%/quizzify/.env`
///
/// # Errors
///
/// This function will return an error if:
/// - The data directory cannot be created
/// - An existing `.env` file cannot be read or parsed
pub async fn load_env() -> Result<(), String> {
    let _ = dotenv::dotenv();

    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("quizzify/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Complete runtime configuration of the service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address and port the HTTP server binds to, e.g. `127.0.0.1:8000`.
    pub server_address: String,
    pub spotify: SpotifyConfig,
}

/// Static credentials and endpoints for the Spotify accounts and Web API.
///
/// The client secret is only ever sent to the token endpoint inside the
/// Basic `Authorization` header and is redacted from `Debug` output.
#[derive(Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Callback URL registered in the Spotify developer dashboard.
    pub redirect_uri: String,
    /// Authorization endpoint the user is redirected to, e.g. `https://accounts.spotify.com/authorize`.
    pub auth_url: Url,
    /// Token endpoint for code exchange and refresh, e.g. `https://accounts.spotify.com/api/token`.
    pub token_url: Url,
    /// Space separated list of requested permissions.
    pub scope: String,
    /// Base URL of the Web API, e.g. `https://api.spotify.com/v1`.
    pub api_url: String,
    /// Upper bound for every outbound HTTP request.
    pub request_timeout: Duration,
}

impl Config {
    /// Reads the whole configuration from the process environment.
    ///
    /// Call [`load_env`] first to pick up values from `.env` files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] for every required variable that is not
    /// set and [`ConfigError::Invalid`] for URLs or numbers that fail to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server_address: env::var("SERVER_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_SERVER_ADDRESS.to_string()),
            spotify: SpotifyConfig::from_env()?,
        })
    }
}

impl fmt::Debug for SpotifyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("auth_url", &self.auth_url.as_str())
            .field("token_url", &self.token_url.as_str())
            .field("scope", &self.scope)
            .field("api_url", &self.api_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl SpotifyConfig {
    /// Reads the Spotify credentials and endpoints from the process environment.
    ///
    /// # Variables
    ///
    /// - `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` - application credentials
    /// - `SPOTIFY_REDIRECT_URI` - OAuth callback URL
    /// - `SPOTIFY_AUTH_URL`, `SPOTIFY_TOKEN_URL` - accounts service endpoints
    /// - `SPOTIFY_AUTH_SCOPE` - requested scope
    /// - `SPOTIFY_BASE_URL` - Web API base URL
    /// - `SPOTIFY_REQUEST_TIMEOUT` - optional timeout in seconds (default 120)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: required("SPOTIFY_REDIRECT_URI")?,
            auth_url: parse_url("SPOTIFY_AUTH_URL")?,
            token_url: parse_url("SPOTIFY_TOKEN_URL")?,
            scope: required("SPOTIFY_AUTH_SCOPE")?,
            api_url: required("SPOTIFY_BASE_URL")?,
            request_timeout: timeout("SPOTIFY_REQUEST_TIMEOUT")?,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn parse_url(name: &'static str) -> Result<Url, ConfigError> {
    let value = required(name)?;
    Url::parse(&value).map_err(|e| ConfigError::Invalid {
        name,
        value,
        reason: e.to_string(),
    })
}

// Unset or blank falls back to the default.
fn timeout(name: &'static str) -> Result<Duration, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::Invalid {
                name,
                value,
                reason: e.to_string(),
            }),
        _ => Ok(DEFAULT_REQUEST_TIMEOUT),
    }
}
