use std::path::PathBuf;

use chrono::Utc;
use reqwest::Client;

use crate::{
    config::{self, Config},
    types::{Token, TokenResponse},
};

/// Seconds before the real expiry at which a token is already treated as expired.
const EXPIRY_MARGIN_SECS: u64 = 240;

pub struct TokenManager {
    token: Token,
    token_url: String,
    client_id: String,
}

impl TokenManager {
    pub fn new(token: Token, config: &Config) -> Self {
        TokenManager {
            token,
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
        }
    }

    pub async fn load(config: &Config) -> Result<Self, String> {
        let path = Self::token_path();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self::new(token, config))
    }

    pub async fn persist(&self) -> Result<(), String> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.token).map_err(|e| e.to_string())?;
        async_fs::write(path, json).await.map_err(|e| e.to_string())
    }

    /// Returns an access token that is valid for at least a few more minutes,
    /// refreshing and persisting it first if necessary.
    pub async fn get_valid_token(&mut self) -> Result<String, String> {
        if is_expired(&self.token, Utc::now().timestamp() as u64) {
            let new_token = self.refresh_token().await?;
            self.token = new_token;
            self.persist().await?;
        }

        Ok(self.token.access_token.clone())
    }

    async fn refresh_token(&self) -> Result<Token, String> {
        let client = Client::new();
        let res = client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.token.refresh_token.as_str()),
                ("client_id", self.client_id.as_str()),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| format!("token refresh rejected: {}", e))?;

        let json: TokenResponse = res.json().await.map_err(|e| e.to_string())?;

        // Spotify may omit the refresh token, in which case the old one stays valid.
        Ok(Token {
            access_token: json.access_token,
            refresh_token: json
                .refresh_token
                .unwrap_or_else(|| self.token.refresh_token.clone()),
            scope: json.scope,
            expires_in: json.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
        })
    }

    fn token_path() -> PathBuf {
        config::data_dir().join("cache/token.json")
    }
}

/// Whether `token` should be refreshed at unix time `now`.
pub fn is_expired(token: &Token, now: u64) -> bool {
    now + EXPIRY_MARGIN_SECS >= token.obtained_at + token.expires_in
}
