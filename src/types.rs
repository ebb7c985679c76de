use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tabled::Tabled;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// Body of a successful `POST /api/token` call.
///
/// A refresh response may omit `refresh_token`, in which case the previous one
/// stays valid.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub state: String,
    pub token: Option<Token>,
}

/// Listening-history window of the top-items endpoints.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    #[default]
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl Term {
    pub const ALL: [Term; 3] = [Term::ShortTerm, Term::MediumTerm, Term::LongTerm];

    pub fn as_str(&self) -> &'static str {
        match self {
            Term::ShortTerm => "short_term",
            Term::MediumTerm => "medium_term",
            Term::LongTerm => "long_term",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Term::ShortTerm => "Last 4 Weeks",
            Term::MediumTerm => "Last 6 Months",
            Term::LongTerm => "All Time",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown term {0:?}, expected short_term, medium_term or long_term")]
pub struct ParseTermError(pub String);

impl FromStr for Term {
    type Err = ParseTermError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "short_term" => Ok(Term::ShortTerm),
            "medium_term" => Ok(Term::MediumTerm),
            "long_term" => Ok(Term::LongTerm),
            other => Err(ParseTermError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
}

impl UserProfile {
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("User")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleArtist {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

/// A track as returned by the catalog, top-items and recommendation endpoints.
///
/// `id` is `None` for local files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
    pub album: Option<Album>,
    #[serde(default)]
    pub is_local: bool,
    pub preview_url: Option<String>,
    #[serde(default)]
    pub duration_ms: u64,
}

impl Track {
    pub fn first_artist(&self) -> Option<&SimpleArtist> {
        self.artists.first()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.album
            .as_ref()
            .and_then(|a| a.images.first())
            .map(|i| i.url.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayHistory {
    pub track: Track,
    pub played_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub tracks: Vec<Track>,
}

/// One stored row of the `top_tracks` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub username: String,
    pub track_id: String,
    pub term: Term,
    pub track_name: String,
    pub artist_name: String,
    pub genre: String,
    pub play_count: u32,
}

/// A song suggestion ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub track: String,
    pub artist: String,
    pub album: Option<String>,
    pub duration: Option<String>,
    pub summary: String,
    pub image: Option<String>,
    pub preview: Option<String>,
    pub url: String,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    #[tabled(rename = "#")]
    pub rank: u32,
    #[tabled(rename = "Track")]
    pub track: String,
    #[tabled(rename = "Artist")]
    pub artist: String,
    #[tabled(rename = "Genre")]
    pub genre: String,
}

#[derive(Tabled)]
pub struct StoredTrackTableRow {
    #[tabled(rename = "User")]
    pub username: String,
    #[tabled(rename = "Term")]
    pub term: String,
    #[tabled(rename = "#")]
    pub rank: u32,
    #[tabled(rename = "Track")]
    pub track: String,
    #[tabled(rename = "Artist")]
    pub artist: String,
    #[tabled(rename = "Genre")]
    pub genre: String,
}

#[derive(Tabled)]
pub struct GenreTableRow {
    #[tabled(rename = "Genre")]
    pub genre: String,
    #[tabled(rename = "Count")]
    pub count: usize,
    #[tabled(rename = "Share")]
    pub share: String,
}

#[derive(Tabled)]
pub struct GenreDeltaTableRow {
    #[tabled(rename = "")]
    pub direction: String,
    #[tabled(rename = "Genre")]
    pub genre: String,
    #[tabled(rename = "Now")]
    pub current: String,
    #[tabled(rename = "All Time")]
    pub all_time: String,
    #[tabled(rename = "Delta")]
    pub delta: String,
}

#[derive(Tabled)]
pub struct SuggestionTableRow {
    #[tabled(rename = "Track")]
    pub track: String,
    #[tabled(rename = "Artist")]
    pub artist: String,
    #[tabled(rename = "Link")]
    pub url: String,
}
