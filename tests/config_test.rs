use std::{collections::HashMap, time::Duration};

use spotvibe::{
    config::{DEFAULT_API_URL, DEFAULT_SCOPE, DEFAULT_SERVER_ADDRESS, Settings},
    error::ConfigError,
    stats::genres::Grouping,
};

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

const CREDENTIALS: [(&str, &str); 3] = [
    ("SPOTIFY_CLIENT_ID", "client-id"),
    ("SPOTIFY_CLIENT_SECRET", "client-secret"),
    ("SPOTIFY_REDIRECT_URI", "http://127.0.0.1:8888/callback"),
];

#[test]
fn test_all_missing_credentials_reported_together() {
    let err = Settings::from_lookup(lookup(&[("SPOTIFY_CLIENT_SECRET", "secret")])).unwrap_err();

    match err {
        ConfigError::Missing(keys) => {
            assert_eq!(keys, vec!["SPOTIFY_CLIENT_ID", "SPOTIFY_REDIRECT_URI"])
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_blank_credentials_count_as_missing() {
    let err = Settings::from_lookup(lookup(&[
        ("SPOTIFY_CLIENT_ID", "  "),
        ("SPOTIFY_CLIENT_SECRET", "secret"),
        ("SPOTIFY_REDIRECT_URI", "http://127.0.0.1:8888/callback"),
    ]))
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        "missing required Spotify credentials: SPOTIFY_CLIENT_ID"
    );
}

#[test]
fn test_defaults() {
    let settings = Settings::from_lookup(lookup(&CREDENTIALS)).unwrap();

    assert_eq!(settings.client_id, "client-id");
    assert_eq!(settings.server_address, DEFAULT_SERVER_ADDRESS);
    assert_eq!(settings.api_url, DEFAULT_API_URL);
    assert_eq!(settings.scope, DEFAULT_SCOPE);
    assert_eq!(settings.genre_grouping, Grouping::TopN(6));
    assert_eq!(settings.term_delay, Duration::from_secs(2));
    assert!(settings.database_path.ends_with("spotify_data.db"));
    assert!(settings.token_path.ends_with("cache/token.json"));
}

#[test]
fn test_overrides() {
    let mut vars = CREDENTIALS.to_vec();
    vars.extend([
        ("SERVER_ADDRESS", "0.0.0.0:9000"),
        ("SPOTIFY_API_URL", "http://localhost:1234/v1/"),
        ("SPOTVIBE_DATABASE", "/tmp/stats.db"),
        ("GENRE_GROUPING", "threshold:5"),
        ("REFRESH_TERM_DELAY_SECS", "0"),
    ]);

    let settings = Settings::from_lookup(lookup(&vars)).unwrap();

    assert_eq!(settings.server_address, "0.0.0.0:9000");
    assert_eq!(settings.api_url, "http://localhost:1234/v1");
    assert_eq!(settings.database_path.to_str(), Some("/tmp/stats.db"));
    assert_eq!(settings.genre_grouping, Grouping::Threshold(5.0));
    assert!(settings.term_delay.is_zero());
}

#[test]
fn test_invalid_optional_value() {
    let mut vars = CREDENTIALS.to_vec();
    vars.push(("GENRE_GROUPING", "pie-chart"));

    let err = Settings::from_lookup(lookup(&vars)).unwrap_err();

    match err {
        ConfigError::Invalid { key, value } => {
            assert_eq!(key, "GENRE_GROUPING");
            assert_eq!(value, "pie-chart");
        }
        other => panic!("unexpected error: {}", other),
    }
}
