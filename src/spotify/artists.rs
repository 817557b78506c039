use crate::{
    error::ApiError,
    types::{Artist, SpotifyArtist, TimeRange, TopArtistsResponse},
    utils,
};

use super::{SpotifyApi, check_limit};

impl From<SpotifyArtist> for Artist {
    fn from(raw: SpotifyArtist) -> Self {
        let image_url = utils::get_highest_resolution_image(&raw.images).map(|i| i.url.clone());
        Artist {
            id: raw.id,
            name: raw.name,
            popularity: raw.popularity,
            genres: raw.genres,
            followers: raw.followers.map(|f| f.total),
            image_url,
        }
    }
}

impl SpotifyApi {
    /// Fetches the current user's top artists (`GET /me/top/artists`).
    ///
    /// Fails with [`ApiError::LimitExceeded`] when `limit` is above 50.
    pub async fn top_artists(
        &self,
        time_range: TimeRange,
        limit: u32,
    ) -> Result<Vec<Artist>, ApiError> {
        check_limit(limit, "artists")?;
        let res: TopArtistsResponse = self
            .get(
                "/me/top/artists",
                &[
                    ("time_range", time_range.to_string()),
                    ("limit", limit.to_string()),
                ],
                "Failed to retrieve top artists",
            )
            .await?;

        Ok(res.items.into_iter().map(Artist::from).collect())
    }

    /// Fetches a single artist (`GET /artists/{id}`).
    pub async fn artist(&self, artist_id: &str) -> Result<Artist, ApiError> {
        let raw: SpotifyArtist = self
            .get(
                &format!("/artists/{artist_id}"),
                &[],
                "Failed to retrieve artist information",
            )
            .await?;

        Ok(raw.into())
    }
}
