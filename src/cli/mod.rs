//! # CLI Module
//!
//! User-facing commands of playlistsmith. Each command builds what it needs
//! from the [`Config`], calls into [`crate::spotify`] or [`crate::sorter`]
//! and turns the result into terminal output with the `info!`, `success!`,
//! `warning!` and `error!` macros.
//!
//! ## Commands
//!
//! - [`auth`] - Log in with Spotify (OAuth 2.0 PKCE) and cache the token
//! - [`list_playlists`] - Show the user's playlists, optionally filtered by name
//! - [`show`] - Show one playlist and its tracks in their current order
//! - [`sort`] - Sort a playlist by artist, release date, duration or
//!   popularity and write the new order back, or preview it with `--dry-run`
//!
//! ## Usage Patterns
//!
//! ```bash
//! playlistsmith auth
//! playlistsmith playlists --search road
//! playlistsmith show 37i9dQZF1DXcBWIGoYBM5M
//! playlistsmith sort spotify:playlist:37i9dQZF1DXcBWIGoYBM5M --by release-date
//! playlistsmith sort 37i9dQZF1DXcBWIGoYBM5M --by popularity --order desc --dry-run
//! ```
//!
//! ## Error Reporting
//!
//! Commands that cannot continue (missing token, failed fetch, failed
//! write) end the process through `error!` with exit code 1. An empty
//! playlist is not an error and only produces an informational message.

mod auth;
mod playlists;
mod show;
mod sort;

pub use auth::auth;
pub use playlists::list_playlists;
pub use show::show;
pub use sort::sort;

use crate::{
    config::Config,
    error,
    sorter::TrackSnapshot,
    spotify::{CatalogClient, SpotifyClient},
    types::TrackTableRow,
    utils, warning,
};

async fn connect(config: &Config) -> SpotifyClient {
    match SpotifyClient::from_cache(config).await {
        Ok(client) => client,
        Err(e) => error!(
            "Failed to load token. Please run playlistsmith auth\n Error: {}",
            e
        ),
    }
}

/// Display name of a playlist. Falls back to the id, with a warning, when
/// the metadata cannot be loaded.
pub async fn playlist_name<C: CatalogClient>(client: &C, playlist_id: &str) -> String {
    match client.get_playlist_metadata(playlist_id).await {
        Ok(playlist) => playlist.name,
        Err(e) => {
            warning!("Failed to load playlist details: {}", e);
            playlist_id.to_string()
        }
    }
}

fn track_rows(tracks: &[TrackSnapshot]) -> Vec<TrackTableRow> {
    tracks
        .iter()
        .enumerate()
        .map(|(i, t)| TrackTableRow {
            position: i + 1,
            artist: t.primary_artist().to_string(),
            title: t.name.clone(),
            album: t.album_name.clone(),
            released: t.release_date.clone(),
            length: utils::format_duration(t.duration_ms),
            popularity: t.popularity,
        })
        .collect()
}
