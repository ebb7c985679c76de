use crate::{
    error::ApiError,
    spotify::SpotifyClient,
    types::{Paging, PlayHistory, RecommendationsResponse, Term, Track},
};

/// Retrieves the user's top tracks for a listening window.
///
/// # Arguments
///
/// * `client` - Authenticated client
/// * `term` - Listening window (`short_term`, `medium_term` or `long_term`)
/// * `limit` - Maximum number of tracks to return (1-50)
///
/// # Example
///
/// ```
/// let tracks = top_tracks(&client, Term::ShortTerm, 50).await?;
/// ```
pub async fn top_tracks(
    client: &SpotifyClient,
    term: Term,
    limit: u32,
) -> Result<Vec<Track>, ApiError> {
    let page: Paging<Track> = client
        .get_json(
            "/me/top/tracks",
            &[
                ("limit", limit.to_string()),
                ("time_range", term.as_str().to_string()),
            ],
        )
        .await?;

    Ok(page.items)
}

/// Retrieves the tracks of the user's most recent plays, newest first.
///
/// The same track shows up once per play; callers deduplicate.
pub async fn recently_played(client: &SpotifyClient, limit: u32) -> Result<Vec<Track>, ApiError> {
    let page: Paging<PlayHistory> = client
        .get_json(
            "/me/player/recently-played",
            &[("limit", limit.to_string())],
        )
        .await?;

    Ok(page.items.into_iter().map(|item| item.track).collect())
}

/// Retrieves catalog metadata for one track.
///
/// Unknown or malformed ids yield `Ok(None)` instead of an error.
pub async fn get_track(client: &SpotifyClient, track_id: &str) -> Result<Option<Track>, ApiError> {
    match client
        .get_json::<Track>(&format!("/tracks/{}", track_id), &[])
        .await
    {
        Ok(track) => Ok(Some(track)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

pub async fn recommendations(
    client: &SpotifyClient,
    seed_tracks: &[String],
    limit: u32,
) -> Result<Vec<Track>, ApiError> {
    let response: RecommendationsResponse = client
        .get_json(
            "/recommendations",
            &[
                ("seed_tracks", seed_tracks.join(",")),
                ("limit", limit.to_string()),
            ],
        )
        .await?;

    Ok(response.tracks)
}
