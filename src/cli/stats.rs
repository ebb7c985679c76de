use tabled::Table;

use crate::{
    cli::{client, current_user, open_store, stored_user},
    config::Settings,
    error, info,
    management::TrackStore,
    stats::{
        genres::{self, Grouping},
        suggestions::song_suggestions,
    },
    types::{
        GenreDeltaTableRow, GenreTableRow, SuggestionTableRow, Term, TrackRecord, TrackTableRow,
    },
    utils,
};

pub async fn tracks(settings: Settings, term: Term) {
    let store = open_store(&settings).await;
    let user = stored_user(&settings, &store).await;
    let tracks = stored_tracks(&store, &user.id, term).await;

    if tracks.is_empty() {
        info!("No tracks stored for {}. Run spotvibe refresh first.", term.label());
        return;
    }

    let rows: Vec<TrackTableRow> = tracks
        .into_iter()
        .map(|t| TrackTableRow {
            rank: t.play_count,
            track: t.track_name,
            artist: t.artist_name,
            genre: t.genre,
        })
        .collect();

    info!("Top tracks of {}, {}:", user.name(), term.label());
    println!("{}", Table::new(rows));
}

/// Prints the genre distribution of `term` and, unless `term` is all time,
/// how each genre's share changed compared to all time.
///
/// `grouping` defaults to the configured grouping.
pub async fn genres(settings: Settings, term: Term, grouping: Option<Grouping>) {
    let store = open_store(&settings).await;
    let user = stored_user(&settings, &store).await;
    let tracks = stored_tracks(&store, &user.id, term).await;

    let grouping = grouping.unwrap_or(settings.genre_grouping);
    let shares = genres::distribution(tracks.iter().map(|t| t.genre.as_str()), grouping);
    if shares.is_empty() {
        info!("No genre data available for {}.", term.label());
        return;
    }

    let rows: Vec<GenreTableRow> = shares
        .into_iter()
        .map(|s| GenreTableRow {
            genre: s.genre,
            count: s.count,
            share: format!("{:.1}%", s.percentage),
        })
        .collect();

    info!("Genre distribution - {} ({}):", term.label(), grouping);
    println!("{}", Table::new(rows));

    if term == Term::LongTerm {
        return;
    }

    let all_time = stored_tracks(&store, &user.id, Term::LongTerm).await;
    if all_time.is_empty() {
        info!("No all time data stored. Run spotvibe refresh to compare.");
        return;
    }

    let deltas = genres::delta(
        &genres::distribution(tracks.iter().map(|t| t.genre.as_str()), Grouping::None),
        &genres::distribution(all_time.iter().map(|t| t.genre.as_str()), Grouping::None),
    );
    let rows: Vec<GenreDeltaTableRow> = deltas
        .into_iter()
        .map(|d| GenreDeltaTableRow {
            direction: d.direction.symbol().to_string(),
            genre: d.genre,
            current: format!("{:.1}%", d.current),
            all_time: format!("{:.1}%", d.all_time),
            delta: format!("{:+.1}", d.delta),
        })
        .collect();

    info!("Compared to All Time:");
    println!("{}", Table::new(rows));
}

pub async fn suggest(settings: Settings, term: Term) {
    let store = open_store(&settings).await;
    let client = client(&settings).await;
    let user = current_user(&client).await;

    let pb = utils::spinner("Looking for song suggestions...");
    let suggestions = song_suggestions(&client, &store, &user.id, term).await;
    pb.finish_and_clear();

    let suggestions = match suggestions {
        Ok(suggestions) => suggestions,
        Err(e) => error!("Cannot read stored tracks. Err: {}", e),
    };

    if suggestions.is_empty() {
        info!("No song suggestions available. Try refreshing your data.");
        return;
    }

    for s in &suggestions {
        info!("{}", s.summary);
    }

    let rows: Vec<SuggestionTableRow> = suggestions
        .into_iter()
        .map(|s| SuggestionTableRow {
            track: s.track,
            artist: s.artist,
            url: s.url,
        })
        .collect();
    println!("{}", Table::new(rows));
}

async fn stored_tracks(store: &TrackStore, username: &str, term: Term) -> Vec<TrackRecord> {
    match store.tracks(username, term).await {
        Ok(tracks) => tracks,
        Err(e) => error!("Cannot read stored tracks. Err: {}", e),
    }
}
