//! playlistsmith library
//!
//! This library sorts the tracks of Spotify playlists. It fetches every track
//! of a playlist, orders them by artist, release date, duration or popularity
//! and writes the new order back through the Spotify Web API.
//!
//! # Modules
//!
//! - `api` - HTTP API endpoints for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration loading from the environment and `.env` files
//! - `management` - Token cache and refresh
//! - `server` - Local HTTP server for OAuth callbacks
//! - `sorter` - The playlist re-ordering engine
//! - `spotify` - Spotify Web API client and login flow
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use playlistsmith::{config::Config, sorter, spotify::SpotifyClient};
//!
//! #[tokio::main]
//! async fn main() -> playlistsmith::Res<()> {
//!     playlistsmith::config::load_env().await?;
//!     let config = Config::from_env()?;
//!     let client = SpotifyClient::from_cache(&config).await?;
//!     sorter::sort_playlist(
//!         &client,
//!         "37i9dQZF1DXcBWIGoYBM5M",
//!         sorter::Criterion::Duration,
//!         sorter::Direction::Ascending,
//!     )
//!     .await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod management;
pub mod server;
pub mod sorter;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern throughout the application
/// using a boxed dynamic error trait object. This allows for flexible
/// error handling while maintaining Send + Sync bounds for async contexts.
///
/// # Type Parameters
///
/// - `T` - The success type returned on successful operations
///
/// # Example
///
/// ```
/// use playlistsmith::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational line prefixed with a blue `o`.
///
/// Takes the same arguments as `println!`.
///
/// ```
/// info!("Sorting {} by {}", name, criterion);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a green `✓` line for a completed operation.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line to stderr and exits with status 1.
///
/// Only for failures the command cannot recover from. Code after the
/// invocation never runs, so it can stand in for a value in a `match` arm:
///
/// ```
/// let client = match SpotifyClient::from_cache(&config).await {
///     Ok(client) => client,
///     Err(e) => error!("Failed to load token: {}", e),
/// };
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a yellow `!` line to stderr for problems that do not stop the command.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
