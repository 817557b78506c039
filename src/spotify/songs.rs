use crate::{
    error::ApiError,
    types::{Album, Song, SpotifyTrack, TimeRange, TopSong, TopTracksResponse},
};

use super::{SpotifyApi, check_limit};

impl From<SpotifyTrack> for TopSong {
    fn from(raw: SpotifyTrack) -> Self {
        let song = Song {
            artist_id: raw.artists.first().map(|a| a.id.clone()),
            album_id: raw.album.id.clone(),
            id: raw.id,
            name: raw.name,
            popularity: raw.popularity,
            duration_ms: raw.duration_ms,
            track_number: raw.track_number,
        };
        TopSong {
            song,
            artists: raw.artists,
            album: Album::from(raw.album),
        }
    }
}

impl SpotifyApi {
    /// Fetches the current user's top tracks (`GET /me/top/tracks`).
    ///
    /// The album comes from the track object itself, so no extra request is
    /// made per song.
    pub async fn top_songs(
        &self,
        time_range: TimeRange,
        limit: u32,
    ) -> Result<Vec<TopSong>, ApiError> {
        check_limit(limit, "songs")?;
        let res: TopTracksResponse = self
            .get(
                "/me/top/tracks",
                &[
                    ("time_range", time_range.to_string()),
                    ("limit", limit.to_string()),
                ],
                "Failed to retrieve top songs",
            )
            .await?;

        Ok(res.items.into_iter().map(TopSong::from).collect())
    }
}
