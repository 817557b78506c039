use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};

use crate::{
    Res, api, config::Config, info, management::TokenManager, spotify, spotify::SpotifyApi,
};

/// Shared handles injected into every request handler.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenManager>,
    pub spotify: SpotifyApi,
}

impl AppState {
    pub fn new(tokens: Arc<TokenManager>, spotify: SpotifyApi) -> Self {
        Self { tokens, spotify }
    }

    /// Wires a fresh, unauthenticated token manager and catalog client.
    pub fn from_config(config: &Config) -> Res<Self> {
        let http = spotify::http_client(config.spotify.request_timeout)?;
        let tokens = Arc::new(TokenManager::with_client(
            config.spotify.clone(),
            http.clone(),
        ));
        let spotify = SpotifyApi::new(http, config.spotify.api_url.clone(), Arc::clone(&tokens));
        Ok(Self::new(tokens, spotify))
    }
}

pub fn router(state: AppState) -> Router {
    let auth = Router::new()
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/tokens", get(api::tokens))
        .route("/tokens/refresh", get(api::refresh));

    Router::new()
        .route("/", get(api::index))
        .route("/health", get(api::health))
        .nest("/auth", auth)
        .route("/artists/top", get(api::top_artists))
        .route("/artists/{id}", get(api::artist))
        .route("/albums/{id}", get(api::album))
        .route("/songs/top", get(api::top_songs))
        .layer(Extension(state))
}

pub async fn start_api_server(config: Config) -> Res<()> {
    let app = router(AppState::from_config(&config)?);

    let addr = SocketAddr::from_str(&config.server_address)
        .map_err(|e| format!("Failed to parse server address: {e}"))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
