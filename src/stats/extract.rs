//! Top-track extraction.
//!
//! Collects up to [`MAX_TRACKS`] unique tracks per listening window, first
//! from the top-tracks endpoint and then, when that falls short, from the
//! recently played history. Every track is tagged with the genres of its
//! first artist and the whole set replaces what the store held for the
//! (user, term) pair before.

use std::{
    collections::{HashMap, HashSet},
    time::Duration,
};

use tokio::time::sleep;

use crate::{
    error::{ApiError, Error},
    management::TrackStore,
    spotify::SpotifyApi,
    types::{SimpleArtist, Term, Track, TrackRecord},
    warning,
};

/// Maximum number of stored tracks per (user, term).
pub const MAX_TRACKS: usize = 25;

/// Number of candidates requested from each endpoint.
pub const CANDIDATE_LIMIT: u32 = 50;

/// Genre of tracks whose artist has no genre data.
pub const UNKNOWN_GENRE: &str = "Unknown";

/// Fetches and tags the top tracks of `username` for `term`.
///
/// Genre lookups that fail are logged and recorded as [`UNKNOWN_GENRE`]. A
/// failing recently-played backfill is logged as well and the rows found so
/// far are returned. Only a failure of the top-tracks call itself is an error.
pub async fn extract_top_tracks<A: SpotifyApi>(
    api: &A,
    username: &str,
    term: Term,
) -> Result<Vec<TrackRecord>, ApiError> {
    let mut picked: Vec<Track> = Vec::with_capacity(MAX_TRACKS);
    let mut seen: HashSet<String> = HashSet::new();

    let top = api.top_tracks(term, CANDIDATE_LIMIT).await?;
    collect_unique(top, &mut picked, &mut seen);

    if picked.len() < MAX_TRACKS {
        match api.recently_played(CANDIDATE_LIMIT).await {
            Ok(recent) => collect_unique(recent, &mut picked, &mut seen),
            Err(e) => warning!("Cannot backfill {} from recently played: {}", term, e),
        }
    }

    let mut genres = GenreCache::default();
    let mut records = Vec::with_capacity(picked.len());

    for track in picked {
        let genre = genres.lookup(api, track.first_artist()).await;
        let artist_name = track
            .first_artist()
            .map(|a| a.name.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        let Track { id, name, .. } = track;
        let Some(track_id) = id else { continue };

        records.push(TrackRecord {
            username: username.to_string(),
            track_id,
            term,
            track_name: name,
            artist_name,
            genre,
            play_count: records.len() as u32 + 1,
        });
    }

    Ok(records)
}

/// Extracts the top tracks for `term` and replaces the stored rows with them.
pub async fn store_top_tracks<A: SpotifyApi>(
    api: &A,
    store: &TrackStore,
    username: &str,
    term: Term,
) -> Result<Vec<TrackRecord>, Error> {
    let records = extract_top_tracks(api, username, term).await?;
    store.replace_tracks(username, term, &records).await?;
    Ok(records)
}

/// Refreshes all three terms in order, pausing `delay` between them.
///
/// Returns the number of rows stored per term.
pub async fn refresh_all_terms<A: SpotifyApi>(
    api: &A,
    store: &TrackStore,
    username: &str,
    delay: Duration,
) -> Result<Vec<(Term, usize)>, Error> {
    let mut stored = Vec::with_capacity(Term::ALL.len());

    for (idx, term) in Term::ALL.into_iter().enumerate() {
        if idx > 0 && !delay.is_zero() {
            sleep(delay).await;
        }

        let records = store_top_tracks(api, store, username, term).await?;
        stored.push((term, records.len()));
    }

    Ok(stored)
}

/// Appends tracks not seen before until `picked` holds [`MAX_TRACKS`].
///
/// Local files have no id and are skipped.
fn collect_unique(tracks: Vec<Track>, picked: &mut Vec<Track>, seen: &mut HashSet<String>) {
    for track in tracks {
        if picked.len() >= MAX_TRACKS {
            break;
        }
        if track.is_local {
            continue;
        }
        let Some(id) = track.id.as_ref() else {
            continue;
        };
        if seen.insert(id.clone()) {
            picked.push(track);
        }
    }
}

/// Memoised genre strings by artist id for one extraction run.
#[derive(Default)]
struct GenreCache {
    by_artist: HashMap<String, String>,
}

impl GenreCache {
    async fn lookup<A: SpotifyApi>(&mut self, api: &A, artist: Option<&SimpleArtist>) -> String {
        let Some(artist_id) = artist.and_then(|a| a.id.as_deref()) else {
            return UNKNOWN_GENRE.to_string();
        };

        if let Some(genre) = self.by_artist.get(artist_id) {
            return genre.clone();
        }

        let genre = match api.artist(artist_id).await {
            Ok(artist) if !artist.genres.is_empty() => artist.genres.join(", "),
            Ok(_) => UNKNOWN_GENRE.to_string(),
            Err(e) => {
                warning!("Error fetching genres for artist {}: {}", artist_id, e);
                UNKNOWN_GENRE.to_string()
            }
        };

        self.by_artist.insert(artist_id.to_string(), genre.clone());
        genre
    }
}
