use std::sync::Arc;

use crate::{
    cli::open_store,
    config::Settings,
    error, info,
    server::{AppState, start_api_server},
};

pub async fn serve(settings: Settings) {
    let store = open_store(&settings).await;
    info!(
        "Dashboard data is stored in {}",
        settings.database_path.display()
    );

    let state = Arc::new(AppState::new(settings, store));
    if let Err(e) = start_api_server(state).await {
        error!("Dashboard server stopped. Err: {}", e)
    }
}
