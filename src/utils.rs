use std::time::Duration;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Extracts the playlist id from a bare id, a `spotify:playlist:<id>` URI or
/// an `https://open.spotify.com/playlist/<id>?si=...` share link.
pub fn parse_playlist_id(input: &str) -> Result<String, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("playlist cannot be empty".to_string());
    }

    let id = if let Some(rest) = input.strip_prefix("spotify:playlist:") {
        rest
    } else if input.contains("open.spotify.com/") {
        let path = input.split(['?', '#']).next().unwrap_or_default();
        let mut segments = path.split('/').skip_while(|s| *s != "playlist");
        match (segments.next(), segments.next()) {
            (Some(_), Some(id)) => id,
            _ => return Err(format!("no playlist id in '{}'", input)),
        }
    } else {
        input
    };

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(format!("invalid playlist id '{}'", id));
    }

    Ok(id.to_string())
}

/// Formats milliseconds as `m:ss`, or `h:mm:ss` from one hour on.
pub fn format_duration(duration_ms: u64) -> String {
    let total_secs = duration_ms / 1000;
    let (hours, mins, secs) = (total_secs / 3600, (total_secs % 3600) / 60, total_secs % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}

pub fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
