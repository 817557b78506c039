use crate::{
    error::ApiError,
    types::{Album, SpotifyAlbum},
    utils,
};

use super::SpotifyApi;

impl From<SpotifyAlbum> for Album {
    fn from(raw: SpotifyAlbum) -> Self {
        let image_url = utils::get_highest_resolution_image(&raw.images).map(|i| i.url.clone());
        Album {
            release_year: utils::release_year(&raw.release_date),
            artist_id: raw.artists.into_iter().next().map(|a| a.id),
            id: raw.id,
            name: raw.name,
            image_url,
            popularity: raw.popularity,
            total_tracks: raw.total_tracks,
        }
    }
}

impl SpotifyApi {
    /// Fetches a single album (`GET /albums/{id}`).
    pub async fn album(&self, album_id: &str) -> Result<Album, ApiError> {
        let raw: SpotifyAlbum = self
            .get(
                &format!("/albums/{album_id}"),
                &[],
                "Failed to retrieve the album's information",
            )
            .await?;

        Ok(raw.into())
    }
}
