//! Configuration management for playlistsmith.
//!
//! Configuration values come from environment variables, optionally seeded
//! from a `.env` file in the local data directory. They are collected once
//! into a [`Config`] value which is then handed to whatever needs it: the
//! login flow, the callback server and the Spotify client. Nothing below
//! the CLI reads the environment on its own.
//!
//! The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

use thiserror::Error;

pub const DEFAULT_SCOPE: &str =
    "playlist-read-private playlist-read-collaborative playlist-modify-public playlist-modify-private";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the `playlistsmith` directory if it doesn't exist yet and loads
/// `playlistsmith/.env` from it:
/// - Linux: `~/.local/share/playlistsmith/.env`
/// - macOS: `~/Library/Application Support/playlistsmith/.env`
/// - Windows: `%LOCALAPPDATA%/playlistsmith/.env`
///
/// A missing `.env` file is fine, variables may come from the real
/// environment instead. A file that exists but cannot be parsed is an error.
///
/// # Example
///
/// ```
/// use playlistsmith::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }

    Ok(())
}

/// Returns the application's local data directory (`<data_local_dir>/playlistsmith`).
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("playlistsmith");
    path
}

/// Everything needed to log in and talk to the Spotify Web API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Client ID obtained when registering the app with Spotify.
    pub client_id: String,
    /// OAuth callback URL. Must match the one registered with Spotify.
    pub redirect_uri: String,
    /// Space separated OAuth scopes.
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    /// Base URL of the Web API, without trailing slash.
    pub api_url: String,
    /// Address the local callback server binds to.
    pub server_addr: String,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// Call [`load_env`] first if values should also come from the `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `SPOTIFY_API_AUTH_CLIENT_ID` or
    /// `SPOTIFY_API_REDIRECT_URI` is unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated like missing ones so that a template line
    /// such as `SPOTIFY_API_AUTH_CLIENT_ID=` falls back or fails loudly.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));
        let optional = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            client_id: required("SPOTIFY_API_AUTH_CLIENT_ID")?,
            redirect_uri: required("SPOTIFY_API_REDIRECT_URI")?,
            scope: optional("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE),
            auth_url: optional("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: optional("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_url: optional("SPOTIFY_API_URL", DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            server_addr: optional("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
        })
    }
}
