//! Genre distribution of stored tracks.
//!
//! Each track carries the comma-joined genres of its artist. A distribution
//! counts every single genre occurrence (ignoring [`UNKNOWN_GENRE`]) and
//! expresses it as a share of all occurrences. [`Grouping`] optionally folds
//! the long tail into an [`OTHER_GENRE`] bucket so charts stay readable.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
};

use thiserror::Error;

use crate::stats::extract::UNKNOWN_GENRE;

pub const OTHER_GENRE: &str = "Other";

/// Number of genres a chart shows individually unless configured otherwise.
pub const DEFAULT_TOP_N: usize = 6;

/// How the long tail of a distribution is collapsed into [`OTHER_GENRE`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Grouping {
    /// Every genre is listed.
    None,
    /// Genres with a count strictly above this percentage of the total are
    /// kept.
    Threshold(f64),
    /// The n most frequent genres are kept.
    TopN(usize),
}

impl Default for Grouping {
    fn default() -> Self {
        Grouping::TopN(DEFAULT_TOP_N)
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grouping::None => f.write_str("none"),
            Grouping::Threshold(pct) => write!(f, "threshold:{}", pct),
            Grouping::TopN(n) => write!(f, "top:{}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid genre grouping {0:?}, expected none, top:N or threshold:P")]
pub struct ParseGroupingError(pub String);

impl FromStr for Grouping {
    type Err = ParseGroupingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseGroupingError(s.to_string());
        let s = s.trim();

        if s.eq_ignore_ascii_case("none") {
            return Ok(Grouping::None);
        }

        match s.split_once(':') {
            Some(("top", n)) => n.trim().parse().map(Grouping::TopN).map_err(|_| err()),
            Some(("threshold", pct)) => match pct.trim().parse::<f64>() {
                Ok(pct) if (0.0..=100.0).contains(&pct) => Ok(Grouping::Threshold(pct)),
                _ => Err(err()),
            },
            _ => Err(err()),
        }
    }
}

/// One bar of a genre chart.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreShare {
    pub genre: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Unchanged,
}

impl Direction {
    pub fn symbol(&self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
            Direction::Unchanged => "→",
        }
    }
}

/// Change of a genre's share between a listening window and all time.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreDelta {
    pub genre: String,
    pub current: f64,
    pub all_time: f64,
    /// Percentage points, `current - all_time`.
    pub delta: f64,
    pub direction: Direction,
}

/// Splits a stored genre string into its genres, dropping blanks and
/// [`UNKNOWN_GENRE`].
pub fn split_genres(genre: &str) -> impl Iterator<Item = &str> {
    genre
        .split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty() && *g != UNKNOWN_GENRE)
}

/// Counts genre occurrences over stored genre strings.
///
/// Sorted by count descending, then genre name ascending.
pub fn count_genres<I, S>(genres: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for genre in genres {
        for g in split_genres(genre.as_ref()) {
            *counts.entry(g.to_string()).or_insert(0) += 1;
        }
    }

    let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

/// Builds the genre distribution of `genres`.
///
/// Empty when there is no known genre at all; otherwise the percentages add
/// up to 100. [`OTHER_GENRE`] comes last and only when it is non-empty.
pub fn distribution<I, S>(genres: I, grouping: Grouping) -> Vec<GenreShare>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let counts = count_genres(genres);
    let total: usize = counts.iter().map(|(_, c)| c).sum();
    if total == 0 {
        return Vec::new();
    }

    let kept: Vec<(String, usize)> = match grouping {
        Grouping::None => counts,
        Grouping::TopN(n) => counts.into_iter().take(n).collect(),
        Grouping::Threshold(pct) => {
            let threshold = total as f64 * pct / 100.0;
            counts
                .into_iter()
                .filter(|(_, c)| *c as f64 > threshold)
                .collect()
        }
    };

    let other = total - kept.iter().map(|(_, c)| c).sum::<usize>();
    let share = |genre: String, count: usize| GenreShare {
        genre,
        count,
        percentage: count as f64 / total as f64 * 100.0,
    };

    let mut shares: Vec<GenreShare> = kept.into_iter().map(|(g, c)| share(g, c)).collect();
    if other > 0 {
        shares.push(share(OTHER_GENRE.to_string(), other));
    }
    shares
}

/// Compares a window's distribution against the all-time distribution.
///
/// Both inputs should be ungrouped, otherwise [`OTHER_GENRE`] is compared
/// like a genre. A genre missing on one side counts as 0%. A delta that
/// rounds to 0.0 at one decimal is [`Direction::Unchanged`]. Sorted by
/// absolute delta descending, then genre name.
pub fn delta(current: &[GenreShare], all_time: &[GenreShare]) -> Vec<GenreDelta> {
    let pct = |shares: &[GenreShare], genre: &str| {
        shares
            .iter()
            .find(|s| s.genre == genre)
            .map_or(0.0, |s| s.percentage)
    };

    let genres: BTreeSet<&str> = current
        .iter()
        .chain(all_time.iter())
        .map(|s| s.genre.as_str())
        .collect();

    let mut deltas: Vec<GenreDelta> = genres
        .into_iter()
        .map(|genre| {
            let now = pct(current, genre);
            let before = pct(all_time, genre);
            let diff = now - before;
            let direction = if (diff * 10.0).round() == 0.0 {
                Direction::Unchanged
            } else if diff > 0.0 {
                Direction::Up
            } else {
                Direction::Down
            };

            GenreDelta {
                genre: genre.to_string(),
                current: now,
                all_time: before,
                delta: diff,
                direction,
            }
        })
        .collect();

    deltas.sort_by(|a, b| {
        b.delta
            .abs()
            .partial_cmp(&a.delta.abs())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.genre.cmp(&b.genre))
    });
    deltas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_grouping() {
        assert_eq!("none".parse::<Grouping>(), Ok(Grouping::None));
        assert_eq!("top:6".parse::<Grouping>(), Ok(Grouping::TopN(6)));
        assert_eq!(
            "threshold:5".parse::<Grouping>(),
            Ok(Grouping::Threshold(5.0))
        );
        assert!("top:many".parse::<Grouping>().is_err());
        assert!("threshold:120".parse::<Grouping>().is_err());
        assert!("pie".parse::<Grouping>().is_err());
    }

    #[test]
    fn grouping_display_parses_back() {
        for grouping in [Grouping::None, Grouping::TopN(3), Grouping::Threshold(2.5)] {
            assert_eq!(grouping.to_string().parse::<Grouping>(), Ok(grouping));
        }
    }

    #[test]
    fn split_skips_unknown_and_blanks() {
        let genres: Vec<&str> = split_genres(" indie pop, ,Unknown,  shoegaze ").collect();
        assert_eq!(genres, vec!["indie pop", "shoegaze"]);
    }
}
