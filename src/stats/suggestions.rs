//! Song suggestions seeded by the user's own tracks.

use crate::{
    error::StoreError,
    management::TrackStore,
    spotify::SpotifyApi,
    types::{Suggestion, Term, Track},
    utils, warning,
};

/// Maximum number of seed tracks per recommendation request.
pub const MAX_SEEDS: usize = 5;

/// Below this many valid top-track seeds, recently played tracks are used.
pub const MIN_SEEDS: usize = 3;

pub const RECENT_SEED_LIMIT: u32 = 20;
pub const SUGGESTION_LIMIT: u32 = 5;

/// Suggestions for `username` seeded by the stored top tracks of `term`.
///
/// Only reading the store can fail; every upstream failure degrades as
/// described on [`suggest_from_candidates`].
pub async fn song_suggestions<A: SpotifyApi>(
    api: &A,
    store: &TrackStore,
    username: &str,
    term: Term,
) -> Result<Vec<Suggestion>, StoreError> {
    let candidates: Vec<String> = store
        .tracks(username, term)
        .await?
        .into_iter()
        .map(|record| record.track_id)
        .collect();

    Ok(suggest_from_candidates(api, &candidates).await)
}

/// Suggestions seeded by `candidates`, best candidates first.
///
/// - fewer than [`MIN_SEEDS`] valid candidates: the recently played tracks
///   are validated instead; if they cannot be fetched, nothing is suggested
/// - no valid seed at all: nothing is suggested
/// - recommendation request fails: the seeds themselves are described
pub async fn suggest_from_candidates<A: SpotifyApi>(
    api: &A,
    candidates: &[String],
) -> Vec<Suggestion> {
    let mut seeds = validate_seed_tracks(api, candidates).await;

    if seeds.len() < MIN_SEEDS {
        warning!("Not enough valid top tracks, using recently played...");
        let recent = match api.recently_played(RECENT_SEED_LIMIT).await {
            Ok(tracks) => tracks,
            Err(e) => {
                warning!("Could not fetch recent tracks: {}", e);
                return Vec::new();
            }
        };

        let recent_ids: Vec<String> = recent.into_iter().filter_map(|t| t.id).collect();
        seeds = validate_seed_tracks(api, &recent_ids).await;
    }

    if seeds.is_empty() {
        warning!("No valid seed tracks found.");
        return Vec::new();
    }

    seeds.truncate(MAX_SEEDS);
    match api.recommendations(&seeds, SUGGESTION_LIMIT).await {
        Ok(tracks) => tracks.iter().filter_map(describe_recommendation).collect(),
        Err(e) => {
            warning!("Spotify API error (recommendations): {}", e);
            fallback_suggestions(api, &seeds).await
        }
    }
}

/// Keeps the ids of tracks that exist, have an id and are not local files.
///
/// Stops after [`MAX_SEEDS`] valid tracks; duplicates count once. Lookup
/// errors are logged and the candidate is skipped.
pub async fn validate_seed_tracks<A: SpotifyApi>(api: &A, track_ids: &[String]) -> Vec<String> {
    let mut valid: Vec<String> = Vec::with_capacity(MAX_SEEDS);

    for track_id in track_ids {
        if valid.len() >= MAX_SEEDS {
            break;
        }
        if valid.contains(track_id) {
            continue;
        }

        match api.track(track_id).await {
            Ok(Some(track)) if track.is_local => warning!("Skipping local track: {}", track_id),
            Ok(Some(track)) if track.id.is_some() => valid.push(track_id.clone()),
            Ok(_) => warning!("Invalid track: {}", track_id),
            Err(e) => warning!("Error validating track {}: {}", track_id, e),
        }
    }

    valid
}

fn describe_recommendation(track: &Track) -> Option<Suggestion> {
    let track_id = track.id.as_deref()?;
    let artist = track
        .first_artist()
        .map(|a| a.name.clone())
        .unwrap_or_else(|| "Unknown".to_string());
    let album = track.album.as_ref().map(|a| a.name.clone());
    let duration = utils::format_duration(track.duration_ms);

    let summary = match &album {
        Some(album) => format!(
            "{} by {} from the album \"{}\" ({}).",
            track.name, artist, album, duration
        ),
        None => format!("{} by {} ({}).", track.name, artist, duration),
    };

    Some(Suggestion {
        track: track.name.clone(),
        artist,
        album,
        duration: Some(duration),
        summary,
        image: track.image_url().map(str::to_string),
        preview: track.preview_url.clone(),
        url: utils::track_url(track_id),
    })
}

/// Describes the seed tracks themselves when Spotify cannot recommend.
async fn fallback_suggestions<A: SpotifyApi>(api: &A, seeds: &[String]) -> Vec<Suggestion> {
    let mut fallback = Vec::with_capacity(seeds.len());

    for track_id in seeds {
        let suggestion = match api.track(track_id).await {
            Ok(Some(track)) => {
                let artist = track
                    .first_artist()
                    .map(|a| a.name.clone())
                    .unwrap_or_else(|| "Unknown".to_string());
                Suggestion {
                    summary: format!("{} by {}.", track.name, artist),
                    track: track.name.clone(),
                    artist,
                    album: track.album.as_ref().map(|a| a.name.clone()),
                    duration: None,
                    image: track.image_url().map(str::to_string),
                    preview: track.preview_url.clone(),
                    url: utils::track_url(track_id),
                }
            }
            result => {
                if let Err(e) = result {
                    warning!("Error fetching fallback track info for {}: {}", track_id, e);
                }
                Suggestion {
                    track: track_id.clone(),
                    artist: "Unknown".to_string(),
                    album: None,
                    duration: None,
                    summary: "Listen on Spotify.".to_string(),
                    image: None,
                    preview: None,
                    url: utils::track_url(track_id),
                }
            }
        };
        fallback.push(suggestion);
    }

    fallback
}
