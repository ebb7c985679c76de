use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::{sync::Mutex, time::sleep};

use crate::{
    config::Settings,
    error::ApiError,
    management::TokenManager,
    spotify::{SpotifyApi, artists, tracks, user},
    types::{Artist, Term, Track, UserProfile},
    warning,
};

/// Attempts per request, including the first one.
const MAX_ATTEMPTS: u32 = 3;
const BAD_GATEWAY_PAUSE: Duration = Duration::from_secs(10);
const MAX_RETRY_AFTER_SECS: u64 = 120;

/// Authenticated Spotify Web API client.
///
/// Owns the token manager, so an expired access token is refreshed
/// transparently before the request that needs it.
pub struct SpotifyClient {
    http: Client,
    settings: Settings,
    tokens: Mutex<TokenManager>,
}

impl SpotifyClient {
    pub fn new(settings: Settings, tokens: TokenManager) -> Self {
        Self {
            http: Client::new(),
            settings,
            tokens: Mutex::new(tokens),
        }
    }

    /// Builds a client from the token cached by a previous login.
    ///
    /// Returns `ApiError::Unauthorized` when there is no usable cached token.
    pub async fn from_cache(settings: &Settings) -> Result<Self, ApiError> {
        let tokens = TokenManager::load(&settings.token_path)
            .await
            .map_err(|_| ApiError::Unauthorized)?;
        Ok(Self::new(settings.clone(), tokens))
    }

    /// Issue time of the token this client was built with, or of its latest
    /// refresh.
    pub async fn token_obtained_at(&self) -> u64 {
        self.tokens.lock().await.obtained_at()
    }

    async fn access_token(&self) -> String {
        self.tokens
            .lock()
            .await
            .get_valid_token(&self.settings)
            .await
    }

    /// Issues `GET {api_url}{path}` and decodes the JSON body.
    ///
    /// `502 Bad Gateway` is retried after a fixed pause and `429 Too Many
    /// Requests` after the advertised `Retry-After`, both at most
    /// `MAX_ATTEMPTS` times in total.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.settings.api_url, path);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let token = self.access_token().await;
            let response = self
                .http
                .get(&url)
                .query(query)
                .bearer_auth(token)
                .send()
                .await?;

            let status = response.status();
            if status.is_success() {
                let body = response.bytes().await?;
                return serde_json::from_slice(&body).map_err(ApiError::from);
            }

            match status {
                StatusCode::BAD_GATEWAY if attempt < MAX_ATTEMPTS => {
                    sleep(BAD_GATEWAY_PAUSE).await;
                    continue; // retry
                }
                StatusCode::TOO_MANY_REQUESTS if attempt < MAX_ATTEMPTS => {
                    match retry_after(&response) {
                        Some(secs) if secs <= MAX_RETRY_AFTER_SECS => {
                            sleep(Duration::from_secs(secs)).await;
                            continue; // retry
                        }
                        Some(secs) => warning!(
                            "Retry after has reached an abnormal high of {} seconds. Try again later.",
                            secs
                        ),
                        None => {}
                    }
                    return Err(status_error(response).await);
                }
                StatusCode::UNAUTHORIZED => return Err(ApiError::Unauthorized),
                _ => return Err(status_error(response).await),
            }
        }
    }
}

fn retry_after(response: &Response) -> Option<u64> {
    response
        .headers()
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
}

async fn status_error(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    ApiError::Status { status, message }
}

impl SpotifyApi for SpotifyClient {
    async fn current_user(&self) -> Result<UserProfile, ApiError> {
        user::current_user(self).await
    }

    async fn top_tracks(&self, term: Term, limit: u32) -> Result<Vec<Track>, ApiError> {
        tracks::top_tracks(self, term, limit).await
    }

    async fn recently_played(&self, limit: u32) -> Result<Vec<Track>, ApiError> {
        tracks::recently_played(self, limit).await
    }

    async fn artist(&self, artist_id: &str) -> Result<Artist, ApiError> {
        artists::get_artist(self, artist_id).await
    }

    async fn track(&self, track_id: &str) -> Result<Option<Track>, ApiError> {
        tracks::get_track(self, track_id).await
    }

    async fn recommendations(
        &self,
        seed_tracks: &[String],
        limit: u32,
    ) -> Result<Vec<Track>, ApiError> {
        tracks::recommendations(self, seed_tracks, limit).await
    }
}
