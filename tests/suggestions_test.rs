mod common;

use common::{FakeSpotify, track, tracks};
use spotvibe::{
    management::TrackStore,
    stats::suggestions::{MAX_SEEDS, song_suggestions, suggest_from_candidates, validate_seed_tracks},
    types::{Term, TrackRecord},
};

// Helper function to store the given track ids as top tracks of "tester"
async fn store_with(ids: &[&str]) -> TrackStore {
    let store = TrackStore::in_memory().await.unwrap();
    let records: Vec<TrackRecord> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| TrackRecord {
            username: "tester".to_string(),
            track_id: id.to_string(),
            term: Term::ShortTerm,
            track_name: format!("Track {}", id),
            artist_name: "Artist".to_string(),
            genre: "Unknown".to_string(),
            play_count: i as u32 + 1,
        })
        .collect();
    store
        .replace_tracks("tester", Term::ShortTerm, &records)
        .await
        .unwrap();
    store
}

fn ids(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{}{}", prefix, i)).collect()
}

#[tokio::test]
async fn test_suggestions_seeded_by_top_tracks() {
    let store = store_with(&["t0", "t1", "t2", "t3", "t4", "t5"]).await;
    let mut api = FakeSpotify::default().with_recommendations(vec![track("rec1", "x")]);
    api.catalog = tracks("t", 6);

    let suggestions = song_suggestions(&api, &store, "tester", Term::ShortTerm)
        .await
        .unwrap();

    assert_eq!(suggestions.len(), 1);
    let s = &suggestions[0];
    assert_eq!(s.track, "Track rec1");
    assert_eq!(s.artist, "Artist x");
    assert_eq!(s.album.as_deref(), Some("Album rec1"));
    assert_eq!(s.duration.as_deref(), Some("3:35"));
    assert_eq!(s.url, "https://open.spotify.com/track/rec1");
    assert_eq!(s.image.as_deref(), Some("https://i.scdn.co/image/rec1"));

    // Best candidates first, never more than five seeds
    assert_eq!(api.seed_requests(), vec![ids("t", MAX_SEEDS)]);
    assert_eq!(api.recent_calls(), 0);
}

#[tokio::test]
async fn test_recently_played_used_with_too_few_seeds() {
    let store = store_with(&["t0", "t1", "gone"]).await;
    let mut api = FakeSpotify::default()
        .with_recent(tracks("r", 4))
        .with_recommendations(vec![track("rec1", "x")]);
    api.catalog = tracks("t", 2);

    let suggestions = song_suggestions(&api, &store, "tester", Term::ShortTerm)
        .await
        .unwrap();

    assert_eq!(suggestions.len(), 1);
    assert_eq!(api.recent_calls(), 1);
    assert_eq!(api.seed_requests(), vec![ids("r", 4)]);
}

#[tokio::test]
async fn test_no_suggestions_when_recently_played_fails() {
    let store = store_with(&["t0"]).await;
    let mut api = FakeSpotify::default().with_recommendations(vec![track("rec1", "x")]);
    api.catalog = tracks("t", 1);
    api.recent_fails = true;

    let suggestions = song_suggestions(&api, &store, "tester", Term::ShortTerm)
        .await
        .unwrap();

    assert!(suggestions.is_empty());
    assert!(api.seed_requests().is_empty());
}

#[tokio::test]
async fn test_no_suggestions_without_any_seed() {
    let store = TrackStore::in_memory().await.unwrap();
    let api = FakeSpotify::default().with_recommendations(vec![track("rec1", "x")]);

    let suggestions = song_suggestions(&api, &store, "tester", Term::ShortTerm)
        .await
        .unwrap();

    // Empty store and empty history: recently played was still consulted
    assert!(suggestions.is_empty());
    assert_eq!(api.recent_calls(), 1);
    assert!(api.seed_requests().is_empty());
}

#[tokio::test]
async fn test_failing_recommendations_fall_back_to_seeds() {
    let mut api = FakeSpotify::default();
    api.catalog = tracks("t", 3);

    let suggestions = suggest_from_candidates(&api, &ids("t", 3)).await;

    let names: Vec<&str> = suggestions.iter().map(|s| s.track.as_str()).collect();
    assert_eq!(names, vec!["Track t0", "Track t1", "Track t2"]);
    assert_eq!(suggestions[0].artist, "Artist a-t");
    assert_eq!(suggestions[0].summary, "Track t0 by Artist a-t.");
    assert_eq!(suggestions[0].url, "https://open.spotify.com/track/t0");
}

#[tokio::test]
async fn test_validate_seed_tracks() {
    let mut local = track("local", "x");
    local.is_local = true;

    let mut api = FakeSpotify::default();
    api.catalog = vec![track("a", "x"), track("b", "x"), track("c", "x"), local];
    api.failing_tracks.insert("c".to_string());

    let candidates: Vec<String> = ["a", "local", "a", "missing", "c", "b"]
        .iter()
        .map(|id| id.to_string())
        .collect();
    let seeds = validate_seed_tracks(&api, &candidates).await;

    assert_eq!(seeds, vec!["a".to_string(), "b".to_string()]);
}

#[tokio::test]
async fn test_validate_stops_at_max_seeds() {
    let mut api = FakeSpotify::default();
    api.catalog = tracks("t", 10);

    let seeds = validate_seed_tracks(&api, &ids("t", 10)).await;

    assert_eq!(seeds, ids("t", MAX_SEEDS));
}
