//! Axum server wiring for the Beatstream API
//!
//! Routes are registered on a plain `Router` so tests can drive it in
//! process; `run_server` only adds the TCP listener and shutdown handling.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use beatstream_core::{AudioLibrary, BeatstreamConfig, Result};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::handlers::{download_audio, list_audio, stream_audio};

/// Shared state handed to every handler. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BeatstreamConfig>,
    pub library: Arc<AudioLibrary>,
}

impl AppState {
    pub fn new(config: BeatstreamConfig) -> Self {
        let library = AudioLibrary::from_config(&config.library);
        Self {
            config: Arc::new(config),
            library: Arc::new(library),
        }
    }
}

/// Build the API router.
///
/// The download route is only registered when
/// `ServerConfig::enable_downloads` is set.
pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/api/audio", get(list_audio))
        .route("/api/audio/{id}", get(stream_audio));

    if state.config.server.enable_downloads {
        app = app.route("/api/download/{filename}", get(download_audio));
    }

    app.layer(CorsLayer::permissive()).with_state(state)
}

/// Bind the configured address and serve until Ctrl+C.
///
/// # Errors
///
/// - `BeatstreamError::Configuration` - Listen address is invalid
/// - `BeatstreamError::Io` - Socket could not be bound or the server failed
pub async fn run_server(config: BeatstreamConfig) -> Result<()> {
    let addr = config.server.socket_addr()?;

    info!(
        "Serving audio from {} with metadata from {}",
        config.library.audio_dir.display(),
        config.library.metadata_dir.display()
    );
    if config.server.enable_downloads {
        info!("Download endpoint enabled at /api/download/{{filename}}");
    }

    let app = router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Beatstream audio server running on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
