use spotvibe::stats::genres::{
    Direction, GenreShare, Grouping, OTHER_GENRE, count_genres, delta, distribution,
};

fn total_percentage(shares: &[GenreShare]) -> f64 {
    shares.iter().map(|s| s.percentage).sum()
}

fn share<'a>(shares: &'a [GenreShare], genre: &str) -> Option<&'a GenreShare> {
    shares.iter().find(|s| s.genre == genre)
}

#[test]
fn test_count_genres_orders_by_count_then_name() {
    let counts = count_genres(["rock, pop", "pop", "jazz", "rock", "blues"]);

    assert_eq!(
        counts,
        vec![
            ("pop".to_string(), 2),
            ("rock".to_string(), 2),
            ("blues".to_string(), 1),
            ("jazz".to_string(), 1),
        ]
    );
}

#[test]
fn test_distribution_sums_to_hundred() {
    let genres = ["indie pop, bedroom pop", "indie pop", "Unknown", "shoegaze"];

    for grouping in [
        Grouping::None,
        Grouping::TopN(1),
        Grouping::Threshold(30.0),
    ] {
        let shares = distribution(genres, grouping);
        assert!((total_percentage(&shares) - 100.0).abs() < 1e-9);
    }
}

#[test]
fn test_distribution_ignores_unknown_and_blanks() {
    let shares = distribution(["Unknown", " , ", "techno"], Grouping::None);

    assert_eq!(shares.len(), 1);
    assert_eq!(shares[0].genre, "techno");
    assert_eq!(shares[0].count, 1);
    assert!((shares[0].percentage - 100.0).abs() < 1e-9);
}

#[test]
fn test_distribution_empty_without_known_genres() {
    assert!(distribution(["Unknown", "Unknown"], Grouping::default()).is_empty());
    assert!(distribution(Vec::<String>::new(), Grouping::None).is_empty());
}

#[test]
fn test_top_n_groups_the_rest_into_other() {
    let genres = ["a", "a", "a", "b", "b", "c", "d"];
    let shares = distribution(genres, Grouping::TopN(2));

    let names: Vec<&str> = shares.iter().map(|s| s.genre.as_str()).collect();
    assert_eq!(names, vec!["a", "b", OTHER_GENRE]);
    assert_eq!(share(&shares, OTHER_GENRE).unwrap().count, 2);
}

#[test]
fn test_threshold_keeps_genres_strictly_above() {
    // 20 occurrences: "a" has 10 (50%), "b" 6 (30%), "c" 2 (10%), "d" and "e" 1 each (5%)
    let mut genres = vec!["a"; 10];
    genres.extend(vec!["b"; 6]);
    genres.extend(vec!["c"; 2]);
    genres.extend(["d", "e"]);

    let shares = distribution(&genres, Grouping::Threshold(5.0));
    let names: Vec<&str> = shares.iter().map(|s| s.genre.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c", OTHER_GENRE]);
    assert!((share(&shares, OTHER_GENRE).unwrap().percentage - 10.0).abs() < 1e-9);
}

#[test]
fn test_no_other_bucket_when_nothing_is_dropped() {
    let shares = distribution(["a", "b"], Grouping::TopN(6));
    assert!(share(&shares, OTHER_GENRE).is_none());

    let shares = distribution(["a", "b"], Grouping::Threshold(0.0));
    assert!(share(&shares, OTHER_GENRE).is_none());
}

#[test]
fn test_delta_directions() {
    let current = distribution(["rock", "rock", "rock", "pop"], Grouping::None);
    let all_time = distribution(["rock", "pop", "pop", "pop", "jazz"], Grouping::None);
    let deltas = delta(&current, &all_time);

    let rock = deltas.iter().find(|d| d.genre == "rock").unwrap();
    assert_eq!(rock.direction, Direction::Up);
    assert!((rock.delta - 55.0).abs() < 1e-9);

    let pop = deltas.iter().find(|d| d.genre == "pop").unwrap();
    assert_eq!(pop.direction, Direction::Down);

    // Missing on one side counts as 0%
    let jazz = deltas.iter().find(|d| d.genre == "jazz").unwrap();
    assert_eq!(jazz.current, 0.0);
    assert_eq!(jazz.direction, Direction::Down);

    // Largest change first
    assert_eq!(deltas[0].genre, "rock");
}

#[test]
fn test_delta_unchanged_when_rounding_to_zero() {
    let current = distribution(["rock", "pop"], Grouping::None);
    let all_time = distribution(["pop", "rock", "pop", "rock"], Grouping::None);
    let deltas = delta(&current, &all_time);

    assert!(deltas.iter().all(|d| d.direction == Direction::Unchanged));
    assert_eq!(Direction::Unchanged.symbol(), "→");
    assert_eq!(Direction::Up.symbol(), "↑");
    assert_eq!(Direction::Down.symbol(), "↓");
}
