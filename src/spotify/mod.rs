//! # Spotify Integration Module
//!
//! This module is the boundary between playlistsmith and the Spotify Web API.
//! It holds the login flow, the HTTP client and the capability trait the
//! sorting core is written against.
//!
//! ## Architecture
//!
//! ```text
//! CLI Layer
//!     ↓
//! Sorting core (crate::sorter)  ── generic over CatalogClient
//!     ↓
//! Spotify Integration Layer
//!     ├── auth    (OAuth 2.0 PKCE login)
//!     └── client  (SpotifyClient: CatalogClient over reqwest)
//!     ↓
//! Spotify Web API
//! ```
//!
//! ## API Coverage
//!
//! - `GET /playlists/{id}/tracks` - One page of playlist items
//! - `GET /playlists/{id}` - Playlist metadata
//! - `PUT /playlists/{id}/tracks` - Replace all items (max 100 URIs)
//! - `POST /playlists/{id}/tracks` - Append items (max 100 URIs)
//! - `GET /me/playlists` - The current user's playlists
//! - `POST /api/token` - Token exchange and refresh
//!
//! ## Error Handling
//!
//! Every operation returns [`ApiError`]. Nothing here retries: a failed
//! request is reported to the caller, which decides what to do with it.

pub mod auth;
pub mod client;

use std::future::Future;

use thiserror::Error;

use crate::types::{Playlist, PlaylistPage};

pub use client::SpotifyClient;

/// Maximum number of track URIs a single replace or append call accepts.
pub const MAX_BATCH: usize = 100;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Spotify answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("{0} track URIs exceed the limit of {max} per request", max = MAX_BATCH)]
    BatchTooLarge(usize),
    #[error("authentication failed: {0}")]
    Auth(String),
}

/// The playlist capabilities the sorting core needs from a remote catalog.
///
/// Implemented by [`SpotifyClient`] for the real Web API. Tests implement it
/// with an in-memory playlist.
pub trait CatalogClient {
    /// Fetches up to `limit` items of a playlist, starting at `offset`.
    ///
    /// Items whose track was removed from the catalog come back with
    /// `track: None`.
    fn get_playlist_page(
        &self,
        playlist_id: &str,
        offset: u32,
        limit: u32,
    ) -> impl Future<Output = Result<PlaylistPage, ApiError>> + Send;

    fn get_playlist_metadata(
        &self,
        playlist_id: &str,
    ) -> impl Future<Output = Result<Playlist, ApiError>> + Send;

    /// Replaces the whole content of the playlist with `uris` (at most [`MAX_BATCH`]).
    fn replace_playlist_items(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Appends `uris` (at most [`MAX_BATCH`]) to the end of the playlist.
    fn append_playlist_items(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}
