use std::{fmt, str::FromStr};

use crate::sorter::{SortError, TrackSnapshot};

/// Field a playlist is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    Artist,
    ReleaseDate,
    Duration,
    Popularity,
}

impl Criterion {
    pub const ALL: [Criterion; 4] = [
        Criterion::Artist,
        Criterion::ReleaseDate,
        Criterion::Duration,
        Criterion::Popularity,
    ];
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Criterion::Artist => "artist",
            Criterion::ReleaseDate => "release-date",
            Criterion::Duration => "duration",
            Criterion::Popularity => "popularity",
        };
        f.write_str(s)
    }
}

impl FromStr for Criterion {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "artist" => Ok(Criterion::Artist),
            "release-date" | "date" => Ok(Criterion::ReleaseDate),
            "duration" => Ok(Criterion::Duration),
            "popularity" => Ok(Criterion::Popularity),
            _ => Err(SortError::UnsupportedCriterion(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Ascending => f.write_str("asc"),
            Direction::Descending => f.write_str("desc"),
        }
    }
}

impl FromStr for Direction {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Direction::Ascending),
            "desc" | "descending" => Ok(Direction::Descending),
            _ => Err(SortError::UnsupportedCriterion(s.to_string())),
        }
    }
}

/// Comparable value extracted from a track.
///
/// One criterion only ever yields one variant, so values of different
/// variants are never compared against each other in practice.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Text(String),
    Date(i32, u32, u32),
    Number(u64),
}

pub type KeyFn = fn(&TrackSnapshot) -> SortKey;

/// Picks the key extractor for `criterion` and whether to reverse the order.
pub fn resolve(criterion: Criterion, direction: Direction) -> (KeyFn, bool) {
    let key_fn: KeyFn = match criterion {
        Criterion::Artist => artist_key,
        Criterion::ReleaseDate => release_date_key,
        Criterion::Duration => duration_key,
        Criterion::Popularity => popularity_key,
    };

    (key_fn, direction == Direction::Descending)
}

/// Stable sort. Tracks with equal keys keep their relative order in both
/// directions, descending included.
pub fn sort_tracks(tracks: &mut [TrackSnapshot], key_fn: KeyFn, reverse: bool) {
    if reverse {
        tracks.sort_by_cached_key(|t| std::cmp::Reverse(key_fn(t)));
    } else {
        tracks.sort_by_cached_key(key_fn);
    }
}

fn artist_key(track: &TrackSnapshot) -> SortKey {
    SortKey::Text(track.primary_artist().to_lowercase())
}

fn release_date_key(track: &TrackSnapshot) -> SortKey {
    let (year, month, day) = parse_release_date(&track.release_date);
    SortKey::Date(year, month, day)
}

fn duration_key(track: &TrackSnapshot) -> SortKey {
    SortKey::Number(track.duration_ms)
}

fn popularity_key(track: &TrackSnapshot) -> SortKey {
    SortKey::Number(u64::from(track.popularity))
}

/// Splits `YYYY[-MM[-DD]]` into `(year, month, day)`.
///
/// An unparseable year becomes 0; a missing or unparseable month or day becomes 1.
pub fn parse_release_date(date: &str) -> (i32, u32, u32) {
    let mut parts = date.trim().splitn(3, '-');
    let year = parts.next().and_then(|y| y.parse().ok()).unwrap_or(0);
    let month = parts.next().and_then(|m| m.parse().ok()).unwrap_or(1);
    let day = parts.next().and_then(|d| d.parse().ok()).unwrap_or(1);
    (year, month, day)
}
