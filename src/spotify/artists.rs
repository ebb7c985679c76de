use crate::{error::ApiError, spotify::SpotifyClient, types::Artist};

/// Retrieves catalog metadata for one artist, including its genres.
///
/// # Arguments
///
/// * `client` - Authenticated client
/// * `artist_id` - Spotify id of the artist
///
/// # Returns
///
/// The artist on success. Spotify leaves `genres` empty for many smaller
/// artists; that is not an error.
///
/// # Example
///
/// ```
/// let artist = get_artist(&client, "0OdUWJ0sBjDrqHygGUXeCF").await?;
/// println!("{}: {}", artist.name, artist.genres.join(", "));
/// ```
pub async fn get_artist(client: &SpotifyClient, artist_id: &str) -> Result<Artist, ApiError> {
    client
        .get_json(&format!("/artists/{}", artist_id), &[])
        .await
}
