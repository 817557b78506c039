use reqwest::{Client, StatusCode, header::AUTHORIZATION};
use serde::Deserialize;
use url::Url;

use crate::{config::SpotifyConfig, error::AuthError, types::TokenResponse, utils};

/// Grant sent to the token endpoint.
#[derive(Debug, Clone, Copy)]
pub enum Grant<'a> {
    AuthorizationCode { code: &'a str },
    RefreshToken { refresh_token: &'a str },
}

impl<'a> Grant<'a> {
    fn form<'c>(&self, config: &'c SpotifyConfig) -> Vec<(&'static str, &'c str)>
    where
        'a: 'c,
    {
        match *self {
            Grant::AuthorizationCode { code } => vec![
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", config.redirect_uri.as_str()),
            ],
            Grant::RefreshToken { refresh_token } => vec![
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ],
        }
    }

    pub(crate) fn failure(&self, status: Option<u16>, reason: impl Into<String>) -> AuthError {
        let reason = reason.into();
        match self {
            Grant::AuthorizationCode { .. } => AuthError::TokenExchangeFailed { status, reason },
            Grant::RefreshToken { .. } => AuthError::TokenRefreshFailed { status, reason },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Builds the URL the user is redirected to for authorization.
///
/// `show_dialog=true` makes Spotify ask for consent again even when the user
/// already authorized the application, so switching accounts stays possible.
pub fn authorization_url(config: &SpotifyConfig, state: &str) -> Url {
    let mut url = config.auth_url.clone();
    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("redirect_uri", &config.redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", &config.scope)
        .append_pair("state", state)
        .append_pair("show_dialog", "true");
    url
}

/// Posts a grant to the token endpoint and decodes the token response.
///
/// The client credentials travel in a Basic `Authorization` header, the grant
/// itself as an `application/x-www-form-urlencoded` body. Anything other than
/// `200 OK` is a failure carrying the upstream status; transport errors and
/// undecodable bodies are failures without a status.
///
/// # Errors
///
/// [`AuthError::TokenExchangeFailed`] for authorization code grants and
/// [`AuthError::TokenRefreshFailed`] for refresh grants.
pub async fn request_token(
    http: &Client,
    config: &SpotifyConfig,
    grant: Grant<'_>,
) -> Result<TokenResponse, AuthError> {
    let res = http
        .post(config.token_url.clone())
        .header(
            AUTHORIZATION,
            utils::encode_basic_auth(&config.client_id, &config.client_secret),
        )
        .form(&grant.form(config))
        .send()
        .await
        .map_err(|e| grant.failure(None, transport_reason(&e)))?;

    let status = res.status();
    if status != StatusCode::OK {
        let body = res.text().await.unwrap_or_default();
        let reason = match serde_json::from_str::<ProviderError>(&body) {
            Ok(ProviderError {
                error,
                error_description: Some(description),
            }) => format!("{error} ({description})"),
            Ok(ProviderError { error, .. }) => error,
            Err(_) => format!("token endpoint responded with {status}"),
        };
        return Err(grant.failure(Some(status.as_u16()), reason));
    }

    res.json::<TokenResponse>()
        .await
        .map_err(|e| grant.failure(None, format!("malformed token response: {e}")))
}

fn transport_reason(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "token endpoint did not answer before the timeout".to_string()
    } else if e.is_connect() {
        format!("could not connect to token endpoint: {e}")
    } else {
        e.to_string()
    }
}
