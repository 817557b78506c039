use axum::{
    Extension, Json,
    extract::{Path, Query},
};

use crate::{
    error::ApiError,
    server::AppState,
    types::{Album, Artist, TopItemsQuery, TopSong},
};

pub async fn top_artists(
    Query(query): Query<TopItemsQuery>,
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<Artist>>, ApiError> {
    let artists = state
        .spotify
        .top_artists(query.time_range, query.limit)
        .await?;
    Ok(Json(artists))
}

pub async fn top_songs(
    Query(query): Query<TopItemsQuery>,
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<TopSong>>, ApiError> {
    let songs = state
        .spotify
        .top_songs(query.time_range, query.limit)
        .await?;
    Ok(Json(songs))
}

pub async fn artist(
    Path(artist_id): Path<String>,
    Extension(state): Extension<AppState>,
) -> Result<Json<Artist>, ApiError> {
    Ok(Json(state.spotify.artist(&artist_id).await?))
}

pub async fn album(
    Path(album_id): Path<String>,
    Extension(state): Extension<AppState>,
) -> Result<Json<Album>, ApiError> {
    Ok(Json(state.spotify.album(&album_id).await?))
}
