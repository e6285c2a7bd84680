//! Application state management

use crate::predictor::Predictor;

use super::ServerConfig;

/// Application state shared across handlers. Immutable after startup.
pub struct AppState {
    pub predictor: Predictor,
    pub config: ServerConfig,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(predictor: Predictor, config: ServerConfig) -> Self {
        Self {
            predictor,
            config,
            started_at: chrono::Utc::now(),
        }
    }
}
