use std::sync::Arc;

use crate::{
    cli::open_store, config::Settings, error, management::TokenManager, server::AppState, spotify,
    success,
};

pub async fn auth(settings: Settings) {
    let store = open_store(&settings).await;
    let state = Arc::new(AppState::new(settings, store));
    spotify::auth::auth(state).await;
}

pub async fn logout(settings: Settings) {
    match TokenManager::clear(&settings.token_path).await {
        Ok(()) => success!("Logged out. Cached token removed."),
        Err(e) => error!("Cannot remove cached token. Err: {}", e),
    }
}
