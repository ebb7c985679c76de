//! # Spotify Integration Module
//!
//! This module is the integration layer between spotvibe and the Spotify Web
//! API. It handles the OAuth flow, HTTP communication, token refresh and the
//! retry rules for transient upstream failures.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI, Dashboard, Stats)
//!          ↓
//! SpotifyApi trait
//!          ↓
//! SpotifyClient
//!     ├── Authentication (OAuth 2.0 authorization code + PKCE)
//!     ├── User profile
//!     ├── Artist metadata (genres)
//!     └── Tracks (top items, recently played, catalog, recommendations)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## The `SpotifyApi` seam
//!
//! The extraction, genre and suggestion logic in [`crate::stats`] is written
//! against the [`SpotifyApi`] trait rather than the concrete client, so it can
//! run against an in-process fake in tests.
//!
//! ## Error Handling
//!
//! - **502 Bad Gateway**: retried after a fixed 10 second pause
//! - **429 Too Many Requests**: retried after `Retry-After` when it is at most
//!   two minutes
//! - **401 Unauthorized**: surfaced as [`ApiError::Unauthorized`]; the user
//!   has to log in again
//! - Every request is attempted at most three times
//!
//! ## API Coverage
//!
//! - `GET /me` - Profile of the logged-in user
//! - `GET /me/top/tracks` - Top tracks per listening window
//! - `GET /me/player/recently-played` - Recently played tracks
//! - `GET /artists/{id}` - Artist metadata including genres
//! - `GET /tracks/{id}` - Track metadata, used to validate seed tracks
//! - `GET /recommendations` - Recommendations seeded by tracks
//! - `POST /api/token` - Code exchange and token refresh

pub mod artists;
pub mod auth;
mod client;
pub mod tracks;
pub mod user;

pub use client::SpotifyClient;

use crate::{
    error::ApiError,
    types::{Artist, Term, Track, UserProfile},
};

/// Operations of the Spotify Web API used by spotvibe.
#[allow(async_fn_in_trait)]
pub trait SpotifyApi {
    async fn current_user(&self) -> Result<UserProfile, ApiError>;

    /// Top tracks of the user for `term`, most listened first.
    async fn top_tracks(&self, term: Term, limit: u32) -> Result<Vec<Track>, ApiError>;

    /// Tracks of the most recent plays, newest first, possibly repeating.
    async fn recently_played(&self, limit: u32) -> Result<Vec<Track>, ApiError>;

    async fn artist(&self, artist_id: &str) -> Result<Artist, ApiError>;

    /// Catalog metadata of a track; `None` when Spotify does not know it.
    async fn track(&self, track_id: &str) -> Result<Option<Track>, ApiError>;

    async fn recommendations(
        &self,
        seed_tracks: &[String],
        limit: u32,
    ) -> Result<Vec<Track>, ApiError>;
}
