use reqwest::{Client, Response};
use tokio::sync::Mutex;

use crate::{
    config::Config,
    management::TokenManager,
    spotify::{ApiError, CatalogClient, MAX_BATCH},
    types::{
        ErrorResponse, GetUserPlaylistsResponse, Playlist, PlaylistItemsRequest, PlaylistPage,
        PlaylistTracksResponse,
    },
};

const USER_PLAYLISTS_PAGE_SIZE: u32 = 50;

/// Authenticated Spotify Web API client.
///
/// Wraps a single `reqwest::Client` and the cached OAuth token. The token is
/// refreshed transparently before a request when it is about to expire.
/// Requests are never retried.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    token_mgr: Mutex<TokenManager>,
}

impl SpotifyClient {
    pub fn new(config: &Config, token_mgr: TokenManager) -> Self {
        SpotifyClient {
            http: Client::new(),
            api_url: config.api_url.clone(),
            token_mgr: Mutex::new(token_mgr),
        }
    }

    /// Builds a client from the token cached by `playlistsmith auth`.
    pub async fn from_cache(config: &Config) -> Result<Self, ApiError> {
        let token_mgr = TokenManager::load(config).await.map_err(ApiError::Auth)?;
        Ok(Self::new(config, token_mgr))
    }

    /// Lists every playlist owned or followed by the current user.
    ///
    /// Follows the `next` link of `GET /me/playlists` until the last page.
    pub async fn list_playlists(&self) -> Result<Vec<Playlist>, ApiError> {
        let mut playlists = Vec::new();
        let mut offset = 0;

        loop {
            let token = self.bearer().await?;
            let response = self
                .http
                .get(format!("{}/me/playlists", self.api_url))
                .query(&[("limit", USER_PLAYLISTS_PAGE_SIZE), ("offset", offset)])
                .bearer_auth(token)
                .send()
                .await?;

            let page = check(response)
                .await?
                .json::<GetUserPlaylistsResponse>()
                .await?;

            let fetched = page.items.len() as u32;
            playlists.extend(page.items.into_iter().flatten());

            if page.next.is_none() || fetched == 0 {
                return Ok(playlists);
            }
            offset += fetched;
        }
    }

    async fn bearer(&self) -> Result<String, ApiError> {
        self.token_mgr
            .lock()
            .await
            .get_valid_token()
            .await
            .map_err(ApiError::Auth)
    }

    async fn write_items(
        &self,
        method: reqwest::Method,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), ApiError> {
        if uris.len() > MAX_BATCH {
            return Err(ApiError::BatchTooLarge(uris.len()));
        }

        let token = self.bearer().await?;
        let body = PlaylistItemsRequest {
            uris: uris.to_vec(),
        };
        let response = self
            .http
            .request(method, self.tracks_url(playlist_id))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        // A 2xx means the chunk is committed, whatever the body holds.
        check(response).await?;
        Ok(())
    }

    fn tracks_url(&self, playlist_id: &str) -> String {
        format!("{}/playlists/{}/tracks", self.api_url, playlist_id)
    }
}

impl CatalogClient for SpotifyClient {
    async fn get_playlist_page(
        &self,
        playlist_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<PlaylistPage, ApiError> {
        let token = self.bearer().await?;
        let response = self
            .http
            .get(self.tracks_url(playlist_id))
            .query(&[("offset", offset), ("limit", limit)])
            .bearer_auth(token)
            .send()
            .await?;

        let page = check(response)
            .await?
            .json::<PlaylistTracksResponse>()
            .await?;

        Ok(PlaylistPage {
            has_more: page.next.is_some(),
            items: page.items,
        })
    }

    async fn get_playlist_metadata(&self, playlist_id: &str) -> Result<Playlist, ApiError> {
        let token = self.bearer().await?;
        let response = self
            .http
            .get(format!("{}/playlists/{}", self.api_url, playlist_id))
            .bearer_auth(token)
            .send()
            .await?;

        Ok(check(response).await?.json::<Playlist>().await?)
    }

    async fn replace_playlist_items(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), ApiError> {
        self.write_items(reqwest::Method::PUT, playlist_id, uris)
            .await
    }

    async fn append_playlist_items(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), ApiError> {
        self.write_items(reqwest::Method::POST, playlist_id, uris)
            .await
    }
}

/// Turns a non-2xx response into [`ApiError::Status`].
///
/// Spotify wraps failures as `{"error": {"status": .., "message": ..}}`; the
/// message is used when the body has that shape, the canonical reason otherwise.
async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let fallback = status.canonical_reason().unwrap_or("unknown error").to_string();
    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.error.message,
        Err(_) => fallback,
    };

    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}
