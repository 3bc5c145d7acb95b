use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{Res, api, config::Config, types::PkceToken};

/// Routes of the login server. The shared PKCE state and the config reach
/// the handlers as extensions.
pub fn router(state: Arc<Mutex<Option<PkceToken>>>, config: Arc<Config>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .layer(Extension(state))
        .layer(Extension(config))
}

/// Serves `/callback` and `/health` on `config.server_addr` until the process ends.
pub async fn start_api_server(state: Arc<Mutex<Option<PkceToken>>>, config: Arc<Config>) -> Res<()> {
    let addr = SocketAddr::from_str(&config.server_addr)
        .map_err(|e| format!("Failed to parse server address {}: {}", config.server_addr, e))?;
    let app = router(state, config);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
