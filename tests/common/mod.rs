#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use spotvibe::{
    error::ApiError,
    spotify::SpotifyApi,
    types::{Album, Artist, Image, SimpleArtist, Term, Track, UserProfile},
};

// Helper function to create a test track by a single artist
pub fn track(id: &str, artist_id: &str) -> Track {
    Track {
        id: Some(id.to_string()),
        name: format!("Track {}", id),
        artists: vec![SimpleArtist {
            id: Some(artist_id.to_string()),
            name: format!("Artist {}", artist_id),
        }],
        album: Some(Album {
            name: format!("Album {}", id),
            images: vec![Image {
                url: format!("https://i.scdn.co/image/{}", id),
                height: Some(640),
                width: Some(640),
            }],
        }),
        is_local: false,
        preview_url: None,
        duration_ms: 215_000,
    }
}

// Helper function to create a local file, which has no id
pub fn local_track(name: &str) -> Track {
    Track {
        id: None,
        name: name.to_string(),
        artists: Vec::new(),
        album: None,
        is_local: true,
        preview_url: None,
        duration_ms: 0,
    }
}

// `count` tracks with ids `{prefix}0..`, all by artist `a-{prefix}`
pub fn tracks(prefix: &str, count: usize) -> Vec<Track> {
    (0..count)
        .map(|i| track(&format!("{}{}", prefix, i), &format!("a-{}", prefix)))
        .collect()
}

fn upstream_error() -> ApiError {
    ApiError::Status {
        status: 500,
        message: "upstream failure".to_string(),
    }
}

/// In-process stand-in for the Spotify Web API.
///
/// Tracks listed in `top`, `recent` or `catalog` are known to the `track`
/// lookup. Call counters let tests check how often an endpoint was hit.
#[derive(Default)]
pub struct FakeSpotify {
    pub top: HashMap<Term, Vec<Track>>,
    pub top_fails: bool,
    pub recent: Vec<Track>,
    pub recent_fails: bool,
    pub genres: HashMap<String, Vec<String>>,
    pub failing_artists: HashSet<String>,
    pub catalog: Vec<Track>,
    pub failing_tracks: HashSet<String>,
    /// `None` makes the recommendations endpoint fail.
    pub recommendations: Option<Vec<Track>>,

    pub artist_calls: AtomicUsize,
    pub recent_calls: AtomicUsize,
    pub seed_requests: Mutex<Vec<Vec<String>>>,
}

impl FakeSpotify {
    pub fn with_top(mut self, term: Term, tracks: Vec<Track>) -> Self {
        self.top.insert(term, tracks);
        self
    }

    pub fn with_recent(mut self, tracks: Vec<Track>) -> Self {
        self.recent = tracks;
        self
    }

    pub fn with_genres(mut self, artist_id: &str, genres: &[&str]) -> Self {
        self.genres.insert(
            artist_id.to_string(),
            genres.iter().map(|g| g.to_string()).collect(),
        );
        self
    }

    pub fn with_recommendations(mut self, tracks: Vec<Track>) -> Self {
        self.recommendations = Some(tracks);
        self
    }

    pub fn artist_calls(&self) -> usize {
        self.artist_calls.load(Ordering::SeqCst)
    }

    pub fn recent_calls(&self) -> usize {
        self.recent_calls.load(Ordering::SeqCst)
    }

    pub fn seed_requests(&self) -> Vec<Vec<String>> {
        self.seed_requests.lock().unwrap().clone()
    }

    fn known_tracks(&self) -> impl Iterator<Item = &Track> {
        self.top
            .values()
            .flatten()
            .chain(self.recent.iter())
            .chain(self.catalog.iter())
    }
}

impl SpotifyApi for FakeSpotify {
    async fn current_user(&self) -> Result<UserProfile, ApiError> {
        Ok(UserProfile {
            id: "tester".to_string(),
            display_name: Some("Test User".to_string()),
        })
    }

    async fn top_tracks(&self, term: Term, limit: u32) -> Result<Vec<Track>, ApiError> {
        if self.top_fails {
            return Err(ApiError::Unauthorized);
        }
        let tracks = self.top.get(&term).cloned().unwrap_or_default();
        Ok(tracks.into_iter().take(limit as usize).collect())
    }

    async fn recently_played(&self, limit: u32) -> Result<Vec<Track>, ApiError> {
        self.recent_calls.fetch_add(1, Ordering::SeqCst);
        if self.recent_fails {
            return Err(upstream_error());
        }
        Ok(self.recent.iter().take(limit as usize).cloned().collect())
    }

    async fn artist(&self, artist_id: &str) -> Result<Artist, ApiError> {
        self.artist_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_artists.contains(artist_id) {
            return Err(upstream_error());
        }
        Ok(Artist {
            id: artist_id.to_string(),
            name: format!("Artist {}", artist_id),
            genres: self.genres.get(artist_id).cloned().unwrap_or_default(),
        })
    }

    async fn track(&self, track_id: &str) -> Result<Option<Track>, ApiError> {
        if self.failing_tracks.contains(track_id) {
            return Err(upstream_error());
        }
        Ok(self
            .known_tracks()
            .find(|t| t.id.as_deref() == Some(track_id))
            .cloned())
    }

    async fn recommendations(
        &self,
        seed_tracks: &[String],
        limit: u32,
    ) -> Result<Vec<Track>, ApiError> {
        self.seed_requests.lock().unwrap().push(seed_tracks.to_vec());
        match &self.recommendations {
            Some(tracks) => Ok(tracks.iter().take(limit as usize).cloned().collect()),
            None => Err(upstream_error()),
        }
    }
}
