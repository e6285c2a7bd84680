//! Error responses for the server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::predictor::PredictError;

/// Message returned when the API body is not a JSON object
pub const SEND_JSON_PAYLOAD: &str = "Send JSON payload";

fn status_of(err: &PredictError) -> StatusCode {
    match err {
        PredictError::Validation(_) | PredictError::UnknownCategory { .. } => StatusCode::BAD_REQUEST,
        PredictError::InternalModel(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Plain-text error for the form route
#[derive(Debug)]
pub struct TextError(pub PredictError);

impl From<PredictError> for TextError {
    fn from(err: PredictError) -> Self {
        Self(err)
    }
}

impl IntoResponse for TextError {
    fn into_response(self) -> Response {
        (status_of(&self.0), self.0.to_string()).into_response()
    }
}

/// `{"error": <message>}` for the JSON API
#[derive(Debug)]
pub struct JsonError(pub PredictError);

impl JsonError {
    pub fn send_json_payload() -> Self {
        Self(PredictError::Validation(SEND_JSON_PAYLOAD.to_string()))
    }
}

impl From<PredictError> for JsonError {
    fn from(err: PredictError) -> Self {
        Self(err)
    }
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.0.to_string() }));
        (status_of(&self.0), body).into_response()
    }
}
