//! # Playlist Sorting
//!
//! The re-ordering engine behind `playlistsmith sort`. One call to
//! [`sort_playlist`] runs the whole pipeline once:
//!
//! ```text
//! fetch_all_tracks  ── every page of the playlist, null tracks dropped
//!     ↓
//! resolve + sort    ── stable sort by criterion and direction
//!     ↓
//! commit            ── replace the first 100 URIs, append the rest
//! ```
//!
//! The pipeline is generic over [`CatalogClient`] and never talks to the
//! terminal: every result, including "nothing to sort", is returned to the
//! caller. Requests run strictly one after another and nothing is retried.
//!
//! Concurrent sorts of the same playlist are not guarded against and may
//! interleave their writes.

mod fetch;
mod key;
mod reorder;

use thiserror::Error;

use crate::spotify::{ApiError, CatalogClient};

pub use fetch::{PAGE_SIZE, TrackPages, TrackSnapshot, fetch_all_tracks};
pub use key::{Criterion, Direction, KeyFn, SortKey, parse_release_date, resolve, sort_tracks};
pub use reorder::commit;

#[derive(Debug, Error)]
pub enum SortError {
    #[error("failed to fetch playlist tracks at offset {offset}: {source}")]
    Fetch {
        offset: u32,
        #[source]
        source: ApiError,
    },
    #[error(
        "failed to write chunk {} of {total}; {committed} chunk(s) were committed and the playlist is partially reordered: {source}",
        .committed + 1
    )]
    Write {
        committed: usize,
        total: usize,
        #[source]
        source: ApiError,
    },
    #[error("unsupported sort criterion or direction '{0}'")]
    UnsupportedCriterion(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOutcome {
    /// The playlist now holds `tracks` tracks in the requested order,
    /// written in `chunks` requests.
    Sorted { tracks: usize, chunks: usize },
    /// The playlist has no tracks; nothing was written.
    EmptyPlaylist,
}

/// Fetches a playlist and returns its tracks in the requested order,
/// without writing anything back.
pub async fn plan_sort<C: CatalogClient>(
    client: &C,
    playlist_id: &str,
    criterion: Criterion,
    direction: Direction,
) -> Result<Vec<TrackSnapshot>, SortError> {
    let mut tracks = fetch_all_tracks(client, playlist_id).await?;
    let (key_fn, reverse) = resolve(criterion, direction);
    sort_tracks(&mut tracks, key_fn, reverse);
    Ok(tracks)
}

/// Sorts a playlist by `criterion` in `direction` and writes the new order back.
///
/// # Errors
///
/// - [`SortError::Fetch`] when any page could not be read. Nothing is written.
/// - [`SortError::Write`] when a chunk could not be written. Earlier chunks
///   stay committed.
pub async fn sort_playlist<C: CatalogClient>(
    client: &C,
    playlist_id: &str,
    criterion: Criterion,
    direction: Direction,
) -> Result<SortOutcome, SortError> {
    let tracks = plan_sort(client, playlist_id, criterion, direction).await?;
    if tracks.is_empty() {
        return Ok(SortOutcome::EmptyPlaylist);
    }

    let uris: Vec<String> = tracks.into_iter().map(|t| t.uri).collect();
    let chunks = commit(client, playlist_id, &uris).await?;

    Ok(SortOutcome::Sorted {
        tracks: uris.len(),
        chunks,
    })
}
