use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::{Client, Url};
use tokio::sync::Mutex;

use crate::{
    config::Config,
    management::TokenManager,
    server::start_api_server,
    spotify::ApiError,
    types::{PkceToken, Token, TokenResponse},
    utils, warning,
};

/// How long the login waits for Spotify to redirect back to the callback server.
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(60);

/// Runs the complete OAuth 2.0 PKCE login and caches the resulting token.
///
/// 1. Generates the PKCE code verifier and its S256 challenge
/// 2. Starts the local callback server on `config.server_addr`
/// 3. Opens the authorization URL in the default browser
/// 4. Waits for the callback to exchange the code for a token
/// 5. Persists the token for later commands
///
/// # Arguments
///
/// * `config` - Client id, redirect URI, scopes and endpoints to use
/// * `shared_state` - Shared between this flow and the callback handler. The
///   verifier is stored before the browser opens; the handler fills in the token.
///
/// # Errors
///
/// Fails when the authorization URL cannot be built, when no token arrives
/// within 60 seconds, or when the token cannot be written to the cache.
/// A browser that cannot be opened is only a warning; the URL is printed
/// for manual navigation instead.
pub async fn auth(
    config: Arc<Config>,
    shared_state: Arc<Mutex<Option<PkceToken>>>,
) -> Result<Token, String> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);
    let auth_url = authorize_url(&config, &code_challenge)?;

    // Store verifier in shared state before redirect
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier,
            token: None,
        });
    }

    let server_state = Arc::clone(&shared_state);
    let server_config = Arc::clone(&config);
    tokio::spawn(async move {
        if let Err(e) = start_api_server(server_state, server_config).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let token = wait_for_token(shared_state, CALLBACK_TIMEOUT)
        .await
        .ok_or_else(|| "Authentication failed or timed out.".to_string())?;

    TokenManager::new(token.clone(), &config)
        .persist()
        .await
        .map_err(|e| format!("Failed to save token to cache: {}", e))?;

    Ok(token)
}

/// Builds the Spotify authorization URL for a PKCE login.
pub fn authorize_url(config: &Config, code_challenge: &str) -> Result<Url, String> {
    Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("code_challenge", code_challenge),
            ("code_challenge_method", "S256"),
            ("scope", config.scope.as_str()),
        ],
    )
    .map_err(|e| format!("Invalid authorization URL {}: {}", config.auth_url, e))
}

/// Polls the shared state once per second until the callback has stored a
/// token, giving up after `timeout` even while the lock is contended.
pub async fn wait_for_token(
    shared_state: Arc<Mutex<Option<PkceToken>>>,
    timeout: Duration,
) -> Option<Token> {
    let poll = async {
        loop {
            if let Some(token) = shared_state
                .lock()
                .await
                .as_ref()
                .and_then(|p| p.token.clone())
            {
                return token;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    };

    tokio::time::timeout(timeout, poll).await.ok()
}

/// Exchanges an authorization code and the PKCE verifier for a token.
///
/// The code is single-use and short-lived, so this runs straight from the
/// callback handler.
pub async fn exchange_code_pkce(
    config: &Config,
    code: &str,
    verifier: &str,
) -> Result<Token, ApiError> {
    let client = Client::new();
    let res = client
        .post(&config.token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", config.client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", config.redirect_uri.as_str()),
        ])
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        let message = res.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let json: TokenResponse = res.json().await?;
    let refresh_token = json
        .refresh_token
        .ok_or_else(|| ApiError::Auth("token response has no refresh token".to_string()))?;

    Ok(Token {
        access_token: json.access_token,
        refresh_token,
        scope: json.scope,
        expires_in: json.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}
