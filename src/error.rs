//! Error types shared across the crate.
//!
//! Each concern owns its error enum: talking to Spotify ([`ApiError`]),
//! persisting tracks ([`StoreError`]) and reading the configuration
//! ([`ConfigError`]). Operations that span concerns, like a refresh that
//! fetches and then stores, return the umbrella [`Error`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Spotify responded with {status}: {message}")]
    Status { status: u16, message: String },

    #[error("not authenticated with Spotify, please log in again")]
    Unauthorized,

    #[error("cannot decode Spotify response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("authorization failed: {0}")]
    Auth(String),
}

impl ApiError {
    /// Whether the error means the user has to log in again.
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::Auth(_))
    }

    /// Whether the requested resource does not exist upstream.
    ///
    /// Spotify answers unknown and malformed ids with either 404 or 400.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 400 | 404, .. })
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("cannot prepare database location: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt row in top_tracks: {0}")]
    Corrupt(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required Spotify credentials: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: String, value: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Api(e) if e.is_auth())
    }
}
