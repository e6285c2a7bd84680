//! Training configuration

use crate::preprocessing::UnknownPolicy;
use crate::schema::FeatureSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Labeled survey CSV
    pub data_path: PathBuf,

    /// Where the fitted pipeline is written (overwritten if present)
    pub output_path: PathBuf,

    /// Inverse L2 regularization strength
    pub c: f64,

    /// Maximum L-BFGS iterations
    pub max_iter: usize,

    /// Gradient tolerance for convergence
    pub tol: f64,

    /// Column layout and renames
    pub schema: FeatureSchema,

    /// How the fitted encoder treats categories it never saw
    pub unknown_categories: UnknownPolicy,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            data_path: std::env::var("DATA_PATH")
                .unwrap_or_else(|_| "cleaned.csv".to_string())
                .into(),
            output_path: std::env::var("MODEL_PATH")
                .unwrap_or_else(|_| "stress_model.json".to_string())
                .into(),
            c: 10.0,
            max_iter: 1000,
            tol: 1e-4,
            schema: FeatureSchema::stress_survey(),
            unknown_categories: UnknownPolicy::Ignore,
        }
    }
}

impl TrainingConfig {
    /// Create a configuration for the given input and output files
    pub fn new(data_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            output_path: output_path.into(),
            ..Self::default()
        }
    }

    /// Builder method to set C
    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    /// Builder method to set the iteration budget
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Builder method to set the unknown-category policy
    pub fn with_unknown_categories(mut self, policy: UnknownPolicy) -> Self {
        self.unknown_categories = policy;
        self
    }

    /// Builder method to substitute the schema
    pub fn with_schema(mut self, schema: FeatureSchema) -> Self {
        self.schema = schema;
        self
    }
}
