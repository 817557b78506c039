use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::{Mutex, RwLock};
use reqwest::Client;

use crate::{
    config::SpotifyConfig,
    error::AuthError,
    info,
    spotify::{
        self,
        auth::{Grant, request_token},
    },
    success,
    types::{TokenResponse, TokenSnapshot},
    utils, warning,
};

/// Access token and its expiry are only ever stored together.
#[derive(Debug, Clone)]
struct AccessToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[derive(Debug, Default)]
struct TokenState {
    access: Option<AccessToken>,
    refresh_token: Option<String>,
}

impl TokenState {
    fn snapshot(&self) -> Option<TokenSnapshot> {
        self.access.as_ref().map(|access| TokenSnapshot {
            access_token: access.token.clone(),
            refresh_token: self.refresh_token.clone(),
            expires_at: access.expires_at,
        })
    }

    fn live_snapshot(&self, now: DateTime<Utc>) -> Option<TokenSnapshot> {
        match &self.access {
            Some(access) if !access.is_expired(now) => self.snapshot(),
            _ => None,
        }
    }
}

/// Owner of the Spotify credentials shared by every outbound request.
///
/// Reads of a live token only take a short read lock. Every operation that
/// talks to the token endpoint first acquires `flight`, so at most one
/// exchange or refresh request is in flight at any time; callers queued behind
/// it observe the updated state once it completes.
pub struct TokenManager {
    config: SpotifyConfig,
    http: Client,
    state: RwLock<TokenState>,
    expected_state: Mutex<Option<String>>,
    flight: tokio::sync::Mutex<()>,
}

impl TokenManager {
    /// Creates an empty, unauthenticated manager.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be built (e.g. no TLS backend).
    pub fn new(config: SpotifyConfig) -> Result<Self, reqwest::Error> {
        let http = spotify::http_client(config.request_timeout)?;
        Ok(Self::with_client(config, http))
    }

    pub fn with_client(config: SpotifyConfig, http: Client) -> Self {
        TokenManager {
            config,
            http,
            state: RwLock::new(TokenState::default()),
            expected_state: Mutex::new(None),
            flight: tokio::sync::Mutex::new(()),
        }
    }

    /// Seeds the manager with previously persisted credentials.
    pub fn restore(&self, snapshot: TokenSnapshot) {
        let mut state = self.state.write();
        state.access = Some(AccessToken {
            token: snapshot.access_token,
            expires_at: snapshot.expires_at,
        });
        state.refresh_token = snapshot.refresh_token;
    }

    /// Current credentials without any expiry check or refresh.
    pub fn snapshot(&self) -> Option<TokenSnapshot> {
        self.state.read().snapshot()
    }

    /// Builds the authorization redirect URL with a fresh CSRF state.
    ///
    /// The new state replaces the previous one, so only the most recently
    /// issued redirect can complete the flow.
    pub fn build_authorization_url(&self) -> String {
        let state = utils::generate_state(utils::STATE_LENGTH);
        let url = spotify::auth::authorization_url(&self.config, &state);
        *self.expected_state.lock() = Some(state);
        url.into()
    }

    /// Exchanges an authorization code for access and refresh tokens.
    ///
    /// A `state` of `None` skips the CSRF comparison. Nothing is stored unless
    /// the token endpoint answers with `200 OK`.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidState`] if `state` differs from the pending one
    /// - [`AuthError::MissingCode`] if `code` is absent or empty
    /// - [`AuthError::TokenExchangeFailed`] if the token endpoint rejects the
    ///   code or cannot be reached
    pub async fn exchange_code(
        &self,
        code: Option<&str>,
        state: Option<&str>,
    ) -> Result<TokenSnapshot, AuthError> {
        if let Some(state) = state {
            if self.expected_state.lock().as_deref() != Some(state) {
                return Err(AuthError::InvalidState);
            }
        }
        let code = code
            .filter(|c| !c.is_empty())
            .ok_or(AuthError::MissingCode)?;

        let grant = Grant::AuthorizationCode { code };
        let _flight = self.flight.lock().await;
        info!("Exchanging authorization code for an access token");
        let response = match request_token(&self.http, &self.config, grant).await {
            Ok(response) => response,
            Err(e) => {
                warning!("Token exchange failed: {}", e);
                return Err(e);
            }
        };

        let expires_at =
            expiry(&response, Utc::now()).ok_or_else(|| invalid_expiry(grant, &response))?;
        let mut state = self.state.write();
        state.access = Some(AccessToken {
            token: response.access_token,
            expires_at,
        });
        state.refresh_token = response.refresh_token;
        success!("Authorized with Spotify, token valid until {}", expires_at);
        state.snapshot().ok_or(AuthError::Unauthenticated)
    }

    /// Mints a new access token from the stored refresh token.
    ///
    /// The stored refresh token is only replaced when the response carries a
    /// new one. On failure the previous credentials are left untouched.
    ///
    /// # Errors
    ///
    /// - [`AuthError::NoRefreshToken`] if no refresh token was ever obtained
    /// - [`AuthError::TokenRefreshFailed`] if the token endpoint rejects the
    ///   refresh token or cannot be reached
    pub async fn refresh(&self) -> Result<TokenSnapshot, AuthError> {
        let _flight = self.flight.lock().await;
        self.refresh_in_flight().await
    }

    /// Returns live credentials, refreshing them first when expired.
    ///
    /// Never hands out an expired token: if the refresh fails, so does this call.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Unauthenticated`] if there is no live access token and
    ///   no refresh token to mint one
    /// - [`AuthError::TokenRefreshFailed`] if the required refresh fails
    pub async fn get_valid_token(&self) -> Result<TokenSnapshot, AuthError> {
        let live = self.state.read().live_snapshot(Utc::now());
        if let Some(snapshot) = live {
            return Ok(snapshot);
        }

        let _flight = self.flight.lock().await;
        // someone else may have refreshed while we waited
        let live = self.state.read().live_snapshot(Utc::now());
        if let Some(snapshot) = live {
            return Ok(snapshot);
        }
        if self.state.read().refresh_token.is_none() {
            return Err(AuthError::Unauthenticated);
        }
        self.refresh_in_flight().await
    }

    /// Refresh body; the caller must hold `flight`.
    async fn refresh_in_flight(&self) -> Result<TokenSnapshot, AuthError> {
        let refresh_token = self
            .state
            .read()
            .refresh_token
            .clone()
            .ok_or(AuthError::NoRefreshToken)?;

        info!("Refreshing Spotify access token");
        let grant = Grant::RefreshToken {
            refresh_token: &refresh_token,
        };
        let response = match request_token(&self.http, &self.config, grant).await {
            Ok(response) => response,
            Err(e) => {
                warning!("Token refresh failed: {}", e);
                return Err(e);
            }
        };

        let expires_at =
            expiry(&response, Utc::now()).ok_or_else(|| invalid_expiry(grant, &response))?;
        let mut state = self.state.write();
        state.access = Some(AccessToken {
            token: response.access_token,
            expires_at,
        });
        if let Some(rotated) = response.refresh_token {
            state.refresh_token = Some(rotated);
        }
        success!("Access token refreshed, valid until {}", expires_at);
        state.snapshot().ok_or(AuthError::Unauthenticated)
    }
}

fn expiry(response: &TokenResponse, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let lifetime = TimeDelta::try_seconds(i64::try_from(response.expires_in).ok()?)?;
    now.checked_add_signed(lifetime)
}

fn invalid_expiry(grant: Grant<'_>, response: &TokenResponse) -> AuthError {
    grant.failure(
        None,
        format!("unusable expires_in value {}", response.expires_in),
    )
}
