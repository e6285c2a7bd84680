//! Prediction server
//!
//! Serves the fitted pipeline through an HTML form and a JSON API. The
//! pipeline is loaded once at startup and shared read-only by all handlers.

mod api;
mod error;
mod handlers;
mod state;
mod views;

pub use api::create_router;
pub use error::{JsonError, TextError};
pub use state::AppState;

use crate::predictor::Predictor;
use crate::schema::{FeatureSchema, LabelMap};
use anyhow::Context;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Fitted pipeline artifact
    pub model_path: PathBuf,
    /// Reject integer-scale values outside their bounds
    pub enforce_bounds: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            model_path: std::env::var("MODEL_PATH")
                .unwrap_or_else(|_| "stress_model.json".to_string())
                .into(),
            enforce_bounds: std::env::var("STRICT_RANGES")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }
}

/// Load the pipeline and serve until ctrl+c
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();

    let predictor = Predictor::load(
        &config.model_path,
        FeatureSchema::stress_survey(),
        LabelMap::bilingual(),
    )
    .with_context(|| format!("Failed to load model from {}", config.model_path.display()))?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let state = Arc::new(AppState::new(predictor, config.clone()));
    let app = create_router(state);

    info!(
        host = %config.host,
        port = config.port,
        model = %config.model_path.display(),
        enforce_bounds = config.enforce_bounds,
        started_at = %start_time.to_rfc3339(),
        "Stress predictor server starting"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, pid = std::process::id(), "Server listening and ready to accept connections");

    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
        let uptime = chrono::Utc::now().signed_duration_since(start_time);
        info!(uptime_secs = uptime.num_seconds(), "Shutdown signal received, stopping server gracefully");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
