//! HTTP request handlers

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Form, State},
    response::Html,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::features::FeatureRow;

use super::error::{JsonError, TextError};
use super::state::AppState;
use super::views;

// ============================================================================
// Form Handlers
// ============================================================================

pub async fn serve_index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(views::render_form(state.predictor.schema()))
}

/// Form submission. A body that is not form-encoded is treated as empty, so
/// the first schema field is reported missing.
pub async fn predict_form(
    State(state): State<Arc<AppState>>,
    form: Option<Form<HashMap<String, String>>>,
) -> Result<Html<String>, TextError> {
    let fields = form.map(|Form(f)| f).unwrap_or_default();

    let row = FeatureRow::from_form(&fields, state.predictor.schema(), state.config.enforce_bounds)
        .map_err(|e| TextError(e.into()))?;
    let prediction = state.predictor.predict(&row)?;

    debug!(label = prediction.label, "Form prediction");
    Ok(Html(views::render_result(&prediction)))
}

// ============================================================================
// API Handlers
// ============================================================================

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: i64,
    pub label: String,
    pub proba: Vec<f64>,
}

pub async fn predict_api(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<PredictResponse>, JsonError> {
    let payload = match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(map)) => map,
        _ => return Err(JsonError::send_json_payload()),
    };

    let row = FeatureRow::from_json(&payload, state.predictor.schema(), state.config.enforce_bounds)
        .map_err(|e| JsonError(e.into()))?;
    let prediction = state.predictor.predict(&row)?;

    debug!(label = prediction.label, "API prediction");
    Ok(Json(PredictResponse {
        prediction: prediction.label,
        proba: prediction.proba(),
        label: prediction.display,
    }))
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let uptime = chrono::Utc::now().signed_duration_since(state.started_at);
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "classes": state.predictor.classes(),
        "features": state.predictor.schema().feature_names(),
        "uptime_secs": uptime.num_seconds(),
    }))
}
