//! Configuration management for spotvibe.
//!
//! Configuration comes from environment variables, optionally seeded from a
//! `.env` file in the local data directory. The three Spotify application
//! credentials are required; everything else has a default.
//!
//! The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::{error::ConfigError, stats::genres::Grouping};

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SCOPE: &str = "user-read-private user-top-read user-read-recently-played";
pub const DEFAULT_TERM_DELAY_SECS: u64 = 2;

const CLIENT_ID: &str = "SPOTIFY_CLIENT_ID";
const CLIENT_SECRET: &str = "SPOTIFY_CLIENT_SECRET";
const REDIRECT_URI: &str = "SPOTIFY_REDIRECT_URI";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the `spotvibe` data directory if it doesn't exist. Unlike a missing
/// directory, a missing `.env` file is not an error: the credentials may just
/// as well come from the process environment (containers, CI, systemd units).
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spotvibe/.env`
/// - macOS: `~/Library/Application Support/spotvibe/.env`
/// - Windows: `%LOCALAPPDATA%/spotvibe/.env`
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or if an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Returns the directory holding the `.env` file, the token cache and the
/// default database.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotvibe");
    path
}

/// Runtime settings resolved from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub server_address: String,
    pub api_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub scope: String,
    pub database_path: PathBuf,
    pub token_path: PathBuf,
    pub genre_grouping: Grouping,
    pub term_delay: Duration,
}

impl Settings {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the settings through `lookup`.
    ///
    /// All missing credentials are reported together so a fresh install can
    /// be fixed in one go. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let missing: Vec<String> = [CLIENT_ID, CLIENT_SECRET, REDIRECT_URI]
            .into_iter()
            .filter(|key| get(*key).is_none())
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let genre_grouping = match get("GENRE_GROUPING") {
            Some(value) => parse_value("GENRE_GROUPING", &value)?,
            None => Grouping::default(),
        };

        let term_delay = match get("REFRESH_TERM_DELAY_SECS") {
            Some(value) => Duration::from_secs(parse_value("REFRESH_TERM_DELAY_SECS", &value)?),
            None => Duration::from_secs(DEFAULT_TERM_DELAY_SECS),
        };

        let data_dir = data_dir();

        Ok(Settings {
            client_id: get(CLIENT_ID).unwrap_or_default(),
            client_secret: get(CLIENT_SECRET).unwrap_or_default(),
            redirect_uri: get(REDIRECT_URI).unwrap_or_default(),
            server_address: get("SERVER_ADDRESS")
                .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string()),
            api_url: get("SPOTIFY_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            auth_url: get("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: get("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            scope: get("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            database_path: get("SPOTVIBE_DATABASE")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join("spotify_data.db")),
            token_path: data_dir.join("cache/token.json"),
            genre_grouping,
            term_delay,
        })
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
    })
}
