use tabled::Table;

use crate::{cli::open_store, config::Settings, error, info, types::StoredTrackTableRow};

const SAMPLE_ROWS: u32 = 10;

/// Prints the tables of the store and the first rows of `top_tracks`.
pub async fn db(settings: Settings) {
    let store = open_store(&settings).await;

    let tables = match store.table_names().await {
        Ok(tables) => tables,
        Err(e) => error!("Cannot list tables. Err: {}", e),
    };
    info!("Database: {}", settings.database_path.display());
    info!("Tables: {}", tables.join(", "));

    let sample = match store.sample(SAMPLE_ROWS).await {
        Ok(sample) => sample,
        Err(e) => error!("Cannot read top_tracks. Err: {}", e),
    };
    if sample.is_empty() {
        info!("top_tracks is empty. Run spotvibe refresh first.");
        return;
    }

    let rows: Vec<StoredTrackTableRow> = sample
        .into_iter()
        .map(|t| StoredTrackTableRow {
            username: t.username,
            term: t.term.to_string(),
            rank: t.play_count,
            track: t.track_name,
            artist: t.artist_name,
            genre: t.genre,
        })
        .collect();

    info!("First {} rows of top_tracks:", SAMPLE_ROWS);
    println!("{}", Table::new(rows));
}
