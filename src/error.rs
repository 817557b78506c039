//! Error types shared by the token manager, the Spotify client and the HTTP layer.
//!
//! Every error converts into an HTTP response with a JSON body of the form
//! `{"detail": "<message>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Failures of the OAuth token lifecycle.
///
/// A `status` of `None` on the exchange and refresh variants means the token
/// endpoint never produced a usable HTTP answer: the request timed out, the
/// connection failed, or a 200 body could not be decoded.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("State parameter does not match the pending authorization request")]
    InvalidState,

    #[error("Authorization code not provided")]
    MissingCode,

    #[error("Failed to retrieve access token: {reason}")]
    TokenExchangeFailed { status: Option<u16>, reason: String },

    #[error("Failed to refresh access token: {reason}")]
    TokenRefreshFailed { status: Option<u16>, reason: String },

    #[error("Refresh token not available")]
    NoRefreshToken,

    #[error("Invalid or missing access token")]
    Unauthenticated,
}

impl AuthError {
    /// Upstream status attached to a failed exchange or refresh, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AuthError::TokenExchangeFailed { status, .. }
            | AuthError::TokenRefreshFailed { status, .. } => *status,
            _ => None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidState | AuthError::MissingCode | AuthError::NoRefreshToken => {
                StatusCode::BAD_REQUEST
            }
            AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::TokenExchangeFailed { status, .. }
            | AuthError::TokenRefreshFailed { status, .. } => passthrough(*status),
        }
    }
}

/// Failures of outbound catalog requests.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Limit cannot exceed {max} {items}.")]
    LimitExceeded { items: &'static str, max: u32 },

    #[error("{detail}")]
    Upstream { status: u16, detail: String },

    #[error("Request to Spotify failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl ApiError {
    pub fn upstream(status: u16, detail: impl Into<String>) -> Self {
        ApiError::Upstream {
            status,
            detail: detail.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Auth(e) => e.status_code(),
            ApiError::LimitExceeded { .. } => StatusCode::BAD_REQUEST,
            ApiError::Upstream { status, .. } => passthrough(Some(*status)),
            ApiError::Request(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

// Anything that is not a valid error status collapses to 502.
fn passthrough(status: Option<u16>) -> StatusCode {
    status
        .and_then(|s| StatusCode::from_u16(s).ok())
        .filter(|s| s.is_client_error() || s.is_server_error())
        .unwrap_or(StatusCode::BAD_GATEWAY)
}

fn detail_response(status: StatusCode, detail: String) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        detail_response(self.status_code(), self.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        detail_response(self.status_code(), self.to_string())
    }
}
