//! # API Module
//!
//! HTTP endpoints of the short-lived local server that runs during
//! `playlistsmith auth`.
//!
//! - [`callback`] - Receives Spotify's OAuth redirect, exchanges the
//!   authorization code and the PKCE verifier for a token and hands it back
//!   to the waiting login flow through shared state.
//! - [`health`] - Reports status and version, handy to check that the
//!   server is reachable at the configured address.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use playlistsmith::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
