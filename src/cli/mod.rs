//! # CLI Module
//!
//! Command implementations of the `spotvibe` binary. Every command takes the
//! resolved [`Settings`], reports progress through the logging macros and
//! terminates with `error!` on failures it cannot recover from.
//!
//! ## Commands
//!
//! - [`auth`] - OAuth login through the browser and a temporary callback server
//! - [`serve`] - runs the web dashboard
//! - [`refresh`] - extracts the top tracks of one or all terms into the store
//! - [`tracks`] - prints the stored top tracks of a term
//! - [`genres`] - prints the genre distribution of a term and its change
//!   compared to all time
//! - [`suggest`] - prints song suggestions seeded by the stored top tracks
//! - [`db`] - prints the tables and the first rows of the store
//! - [`logout`] - removes the cached token
//!
//! ## Usage Patterns
//!
//! ```bash
//! spotvibe auth                          # Authenticate with Spotify
//! spotvibe refresh                       # Fetch all three terms
//! spotvibe genres --term medium_term     # Genre breakdown of the last 6 months
//! spotvibe serve                         # Open the dashboard on 127.0.0.1:8888
//! ```

mod auth;
mod db;
mod refresh;
mod serve;
mod stats;

pub use auth::{auth, logout};
pub use db::db;
pub use refresh::refresh;
pub use serve::serve;
pub use stats::{genres, suggest, tracks};

use crate::{
    config::Settings,
    error,
    management::TrackStore,
    spotify::{SpotifyApi, SpotifyClient},
    error::ApiError,
    types::UserProfile,
    warning,
};

async fn open_store(settings: &Settings) -> TrackStore {
    match TrackStore::open(&settings.database_path).await {
        Ok(store) => store,
        Err(e) => error!(
            "Cannot open database {}. Err: {}",
            settings.database_path.display(),
            e
        ),
    }
}

async fn client(settings: &Settings) -> SpotifyClient {
    match SpotifyClient::from_cache(settings).await {
        Ok(client) => client,
        Err(_) => error!("Failed to load token. Please run spotvibe auth"),
    }
}

async fn current_user(client: &SpotifyClient) -> UserProfile {
    match client.current_user().await {
        Ok(user) => user,
        Err(e) => profile_failed(&e),
    }
}

/// Owner of the stored tracks for commands that only read the store.
///
/// Falls back to the only user in the store when the profile cannot be
/// fetched, e.g. offline or with an expired login.
async fn stored_user(settings: &Settings, store: &TrackStore) -> UserProfile {
    let failure = match SpotifyClient::from_cache(settings).await {
        Ok(client) => match client.current_user().await {
            Ok(user) => return user,
            Err(e) => e,
        },
        Err(e) => e,
    };

    match store.sole_username().await {
        Ok(Some(username)) => {
            warning!(
                "Cannot fetch Spotify profile ({}). Showing stored data of {}.",
                failure,
                username
            );
            UserProfile {
                id: username,
                display_name: None,
            }
        }
        _ => profile_failed(&failure),
    }
}

fn profile_failed(e: &ApiError) -> ! {
    if e.is_auth() {
        error!("Spotify login expired. Please run spotvibe auth")
    }
    error!("Cannot fetch Spotify profile. Err: {}", e)
}
