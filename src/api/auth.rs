use axum::{
    Extension, Json,
    extract::Query,
    response::{IntoResponse, Redirect},
};

use crate::{
    error::AuthError,
    info,
    server::AppState,
    types::{CallbackParams, TokenSnapshot},
};

/// `GET /auth/login`: redirects the user to Spotify's consent page.
pub async fn login(Extension(state): Extension<AppState>) -> impl IntoResponse {
    info!("Redirecting user to Spotify authorization URL");
    Redirect::temporary(&state.tokens.build_authorization_url())
}

/// `GET /auth/callback`: Spotify redirects here with `code` and `state`.
pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(state): Extension<AppState>,
) -> Result<Json<TokenSnapshot>, AuthError> {
    let snapshot = state
        .tokens
        .exchange_code(params.code.as_deref(), params.state.as_deref())
        .await?;
    Ok(Json(snapshot))
}

/// `GET /auth/tokens/refresh`: forces a refresh with the stored refresh token.
pub async fn refresh(
    Extension(state): Extension<AppState>,
) -> Result<Json<TokenSnapshot>, AuthError> {
    Ok(Json(state.tokens.refresh().await?))
}

/// `GET /auth/tokens`: current live credentials, refreshed if they expired.
pub async fn tokens(
    Extension(state): Extension<AppState>,
) -> Result<Json<TokenSnapshot>, AuthError> {
    Ok(Json(state.tokens.get_valid_token().await?))
}
