use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Extension, Router,
    routing::{get, post},
};
use tokio::sync::Mutex;

use crate::{
    Res, api,
    config::Settings,
    info,
    management::TrackStore,
    types::{PkceToken, UserProfile},
};

/// State of the single dashboard session.
///
/// Handlers hold the session lock for the whole request, which serializes
/// user actions.
#[derive(Debug, Default)]
pub struct Session {
    /// Login in progress, or the result of the last completed one.
    pub pending: Option<PkceToken>,
    /// Profile of the logged-in user.
    pub user: Option<UserProfile>,
    /// `obtained_at` of the token `user` was fetched with. A different cached
    /// token means another login happened, possibly as another user.
    pub user_token: u64,
}

pub struct AppState {
    pub settings: Settings,
    pub store: TrackStore,
    pub session: Mutex<Session>,
}

impl AppState {
    pub fn new(settings: Settings, store: TrackStore) -> Self {
        Self {
            settings,
            store,
            session: Mutex::new(Session::default()),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(api::dashboard))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/refresh", post(api::refresh))
        .route("/logout", post(api::logout))
        .route("/health", get(api::health))
        .layer(Extension(state))
}

pub async fn start_api_server(state: Arc<AppState>) -> Res<()> {
    let addr = SocketAddr::from_str(&state.settings.server_address)?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
