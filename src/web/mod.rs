//! HTTP front-end
//!
//! Thin plumbing around the aggregation core: routes expose the playlist,
//! the rendered guide artifacts, the channel/session JSON views, and the
//! watch redirect. Errors from the core map onto transport-level statuses
//! in `responses`.

pub mod handlers;
pub mod responses;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::Config;
use crate::jobs::GuideStore;
use crate::sources::PlutoClient;

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<PlutoClient>,
    pub guides: Arc<GuideStore>,
    pub config: Arc<Config>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/epg/{filename}", get(handlers::epg_file))
        .route("/{region}/playlist.m3u", get(handlers::playlist))
        .route("/{region}/channels.json", get(handlers::channels_json))
        .route("/{region}/session.json", get(handlers::session_json))
        .route("/{region}/watch/{id}", get(handlers::watch))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!("HTTP server listening on {}:{}", host, port);
    axum::serve(listener, app).await?;
    Ok(())
}
