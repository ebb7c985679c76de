use crate::{
    cli::{client, current_user, open_store},
    config::Settings,
    error,
    stats::extract::{refresh_all_terms, store_top_tracks},
    success,
    types::Term,
    utils,
};

/// Extracts the top tracks of `term`, or of all terms, into the store.
pub async fn refresh(settings: Settings, term: Option<Term>) {
    let store = open_store(&settings).await;
    let client = client(&settings).await;
    let user = current_user(&client).await;

    let pb = utils::spinner(&format!("Fetching Spotify data for {}...", user.name()));
    let result = match term {
        Some(term) => store_top_tracks(&client, &store, &user.id, term)
            .await
            .map(|records| vec![(term, records.len())]),
        None => refresh_all_terms(&client, &store, &user.id, settings.term_delay).await,
    };
    pb.finish_and_clear();

    match result {
        Ok(stored) => {
            for (term, count) in stored {
                success!("Stored {} tracks for {} ({})", count, term.label(), term);
            }
        }
        Err(e) if e.is_auth() => error!("Spotify login expired. Please run spotvibe auth"),
        Err(e) => error!("Cannot refresh top tracks. Err: {}", e),
    }
}
