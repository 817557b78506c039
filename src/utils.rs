use base64::{Engine, engine::general_purpose::STANDARD};
use rand::{Rng, distr::Alphanumeric};

use crate::types::Image;

/// Length of the CSRF state sent with every authorization redirect.
pub const STATE_LENGTH: usize = 16;

/// Generates an opaque alphanumeric string from the thread-local CSPRNG.
pub fn generate_state(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Builds the value of a Basic `Authorization` header for `client_id:client_secret`.
pub fn encode_basic_auth(client_id: &str, client_secret: &str) -> String {
    let credentials = format!("{client_id}:{client_secret}");
    format!("Basic {}", STANDARD.encode(credentials))
}

/// Picks the image with the largest pixel area; the first one wins on ties.
pub fn get_highest_resolution_image(images: &[Image]) -> Option<&Image> {
    fn area(image: &Image) -> u64 {
        u64::from(image.height.unwrap_or(0)) * u64::from(image.width.unwrap_or(0))
    }

    images.iter().fold(None, |best, image| match best {
        Some(current) if area(current) >= area(image) => Some(current),
        _ => Some(image),
    })
}

/// Extracts the year from a Spotify release date (`YYYY`, `YYYY-MM` or `YYYY-MM-DD`).
pub fn release_year(release_date: &str) -> Option<String> {
    let year = release_date.get(..4)?;
    year.chars()
        .all(|c| c.is_ascii_digit())
        .then(|| year.to_string())
}
