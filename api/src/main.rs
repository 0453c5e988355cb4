//! Papamana Image Processor
//!
//! Normalises batches of product photos (canvas fit, background removal,
//! tonal enhancement) and returns them as a ZIP download.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

mod adapters;
mod app;
mod config;
mod domain;
mod error;
mod handlers;
mod logging;
mod render;

#[cfg(test)]
mod test_utils;


use adapters::{BorderFloodRemover, SystemClock};
use app::ImageProcessor;
use config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<ImageProcessor<BorderFloodRemover, SystemClock>>,
    pub config: Config,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let mut process_routes = Router::new().route("/process", post(handlers::process_images));

    // Processing is CPU heavy, so it is limited per client IP.
    // PeerIpKeyExtractor reads the socket address, which requires
    // `into_make_service_with_connect_info`.
    if state.config.rate_limit_enabled() {
        match GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(state.config.rate_limit_replenish_secs)
            .burst_size(state.config.rate_limit_burst)
            .finish()
        {
            Some(governor_config) => {
                process_routes = process_routes.layer(GovernorLayer {
                    config: Arc::new(governor_config),
                });
            }
            None => tracing::warn!("Invalid rate limit settings, /process is not rate limited"),
        }
    }

    Router::new()
        .route("/health", get(health))
        .route("/imageprocess", get(handlers::upload_form))
        .merge(process_routes)
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    let _log_guard = logging::init_logging(&config);

    tracing::info!(
        "Starting Papamana image processor ({})...",
        config.environment
    );

    let processor_config = config::load_processor_config(config.processor_config_path.as_deref())?;
    tracing::info!(
        "Output: {} at quality {}, canvas {}x{}",
        processor_config.output_format,
        processor_config.quality,
        processor_config.dimensions.width,
        processor_config.dimensions.height
    );

    // Create adapters
    let remover = Arc::new(BorderFloodRemover::new(
        processor_config.backgrounds.key_tolerance,
    ));
    let clock = Arc::new(SystemClock);

    // Create application services
    let processor = Arc::new(ImageProcessor::new(processor_config, remover, clock));

    let state = AppState {
        processor,
        config: config.clone(),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
