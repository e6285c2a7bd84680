//! Read-only prediction service shared by every request

use crate::error::{StressError, Result};
use crate::features::{FeatureRow, FieldError};
use crate::pipeline::StressPipeline;
use crate::schema::{FeatureSchema, LabelMap};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};

/// Closed set of request failure kinds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    /// Malformed, missing or out-of-range input
    #[error("{0}")]
    Validation(String),

    /// A category the pipeline refuses to absorb
    #[error("Unknown category '{value}' for feature {feature}")]
    UnknownCategory { feature: String, value: String },

    /// Anything that went wrong inside the model; detail is for logs only
    #[error("Internal model error")]
    InternalModel(String),
}

impl From<FieldError> for PredictError {
    fn from(err: FieldError) -> Self {
        PredictError::Validation(err.to_string())
    }
}

impl From<StressError> for PredictError {
    fn from(err: StressError) -> Self {
        match err {
            StressError::UnknownCategory { feature, value } => {
                PredictError::UnknownCategory { feature, value }
            }
            StressError::ValidationError(msg) => PredictError::Validation(msg),
            StressError::FeatureNotFound(name) => {
                PredictError::Validation(FieldError::Missing(name).to_string())
            }
            other => PredictError::InternalModel(other.to_string()),
        }
    }
}

/// Probability of one class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassProbability {
    pub class: i64,
    pub probability: f64,
}

/// Outcome of a single-row prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Predicted stress level
    pub label: i64,
    /// Display text for `label`
    pub display: String,
    /// One entry per known class, in model class order
    pub probabilities: Vec<ClassProbability>,
}

impl Prediction {
    /// Probabilities without their class labels
    pub fn proba(&self) -> Vec<f64> {
        self.probabilities.iter().map(|p| p.probability).collect()
    }
}

/// Fitted pipeline plus the schema and label table it is served with
#[derive(Debug, Clone)]
pub struct Predictor {
    pipeline: StressPipeline,
    schema: FeatureSchema,
    labels: LabelMap,
}

impl Predictor {
    /// Wrap a fitted pipeline, refusing one whose columns differ from the schema
    pub fn new(pipeline: StressPipeline, schema: FeatureSchema, labels: LabelMap) -> Result<Self> {
        if !pipeline.is_fitted() {
            return Err(StressError::ModelNotFitted);
        }
        pipeline.check_schema(&schema)?;
        Ok(Self { pipeline, schema, labels })
    }

    /// Load the artifact from disk
    pub fn load(path: impl AsRef<Path>, schema: FeatureSchema, labels: LabelMap) -> Result<Self> {
        let path = path.as_ref();
        let pipeline = StressPipeline::load(path)?;
        info!(
            path = %path.display(),
            classes = ?pipeline.classes(),
            features = pipeline.preprocessor().n_features(),
            "Loaded pipeline"
        );
        Self::new(pipeline, schema, labels)
    }

    /// Predict one row
    pub fn predict(&self, row: &FeatureRow) -> std::result::Result<Prediction, PredictError> {
        self.predict_inner(row).map_err(|err| {
            let err = PredictError::from(err);
            if let PredictError::InternalModel(detail) = &err {
                error!(detail = %detail, "Prediction failed");
            }
            err
        })
    }

    fn predict_inner(&self, row: &FeatureRow) -> Result<Prediction> {
        let frame = row.to_frame()?;
        let proba = self.pipeline.predict_proba(&frame)?;
        let classes = self.pipeline.classes();

        let probs = proba.row(0);
        if probs.len() != classes.len() {
            return Err(StressError::ShapeError {
                expected: format!("{} probabilities", classes.len()),
                actual: format!("{} probabilities", probs.len()),
            });
        }

        let label = self
            .pipeline
            .predict(&frame)?
            .first()
            .copied()
            .ok_or_else(|| StressError::DataError("Empty prediction".to_string()))?;

        Ok(Prediction {
            label,
            display: self.labels.display(label),
            probabilities: classes
                .iter()
                .zip(probs.iter())
                .map(|(&class, &probability)| ClassProbability { class, probability })
                .collect(),
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    pub fn classes(&self) -> &[i64] {
        self.pipeline.classes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let err: PredictError = StressError::UnknownCategory {
            feature: "bad_habbits".to_string(),
            value: "x".to_string(),
        }
        .into();
        assert!(matches!(err, PredictError::UnknownCategory { .. }));

        let err: PredictError = StressError::FeatureNotFound("Peer pressure".to_string()).into();
        assert_eq!(err, PredictError::Validation("Missing field: Peer pressure".to_string()));

        let err: PredictError = StressError::ModelNotFitted.into();
        assert_eq!(err.to_string(), "Internal model error");
    }

    #[test]
    fn test_field_error_is_validation() {
        let err: PredictError = FieldError::Missing("acadmic_stage".to_string()).into();
        assert_eq!(err.to_string(), "Missing field: acadmic_stage");
    }

    #[test]
    fn test_unfitted_pipeline_rejected() {
        let pipeline = StressPipeline::new(
            crate::preprocessing::PreprocessingConfig::default(),
            crate::training::LogisticRegression::new(),
        );
        let result = Predictor::new(pipeline, FeatureSchema::stress_survey(), LabelMap::bilingual());
        assert!(matches!(result, Err(StressError::ModelNotFitted)));
    }
}
