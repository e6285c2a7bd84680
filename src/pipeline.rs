//! Fitted preprocessing + classifier pipeline and its on-disk artifact

use crate::error::{StressError, Result};
use crate::preprocessing::{ColumnTransformer, PreprocessingConfig};
use crate::schema::FeatureSchema;
use crate::training::LogisticRegression;
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Column transformer followed by a multinomial logistic regression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressPipeline {
    preprocessor: ColumnTransformer,
    classifier: LogisticRegression,
}

impl StressPipeline {
    /// Create an unfitted pipeline
    pub fn new(preprocessing: PreprocessingConfig, classifier: LogisticRegression) -> Self {
        Self {
            preprocessor: ColumnTransformer::new(preprocessing),
            classifier,
        }
    }

    /// Fit the transformer, then the classifier on its output
    pub fn fit(&mut self, features: &DataFrame, target: &[i64]) -> Result<&mut Self> {
        if features.height() != target.len() {
            return Err(StressError::ShapeError {
                expected: format!("{} target values", features.height()),
                actual: format!("{} target values", target.len()),
            });
        }

        let x = self.preprocessor.fit_transform(features)?;
        self.classifier.fit(&x, target)?;
        Ok(self)
    }

    /// Predicted class label per row
    pub fn predict(&self, features: &DataFrame) -> Result<Vec<i64>> {
        let x = self.preprocessor.transform(features)?;
        self.classifier.predict(&x)
    }

    /// Class probabilities per row, columns ordered like [`classes`](Self::classes)
    pub fn predict_proba(&self, features: &DataFrame) -> Result<Array2<f64>> {
        let x = self.preprocessor.transform(features)?;
        self.classifier.predict_proba(&x)
    }

    /// Accuracy on a labeled frame
    pub fn score(&self, features: &DataFrame, target: &[i64]) -> Result<f64> {
        let x = self.preprocessor.transform(features)?;
        self.classifier.score(&x, target)
    }

    /// Labels the classifier can emit
    pub fn classes(&self) -> &[i64] {
        &self.classifier.classes
    }

    pub fn preprocessor(&self) -> &ColumnTransformer {
        &self.preprocessor
    }

    pub fn classifier(&self) -> &LogisticRegression {
        &self.classifier
    }

    pub fn is_fitted(&self) -> bool {
        self.preprocessor.is_fitted() && self.classifier.is_fitted
    }

    /// Check that the fitted columns are exactly the schema's
    pub fn check_schema(&self, schema: &FeatureSchema) -> Result<()> {
        let expected_numeric = schema.numeric_columns();
        let expected_categorical = schema.categorical_columns();

        if self.preprocessor.numeric_columns() != expected_numeric.as_slice()
            || self.preprocessor.categorical_columns() != expected_categorical.as_slice()
        {
            return Err(StressError::ValidationError(format!(
                "Pipeline columns {:?} + {:?} do not match schema {:?} + {:?}",
                self.preprocessor.numeric_columns(),
                self.preprocessor.categorical_columns(),
                expected_numeric,
                expected_categorical,
            )));
        }

        Ok(())
    }

    /// Write the pipeline as JSON, replacing any existing file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        if !self.is_fitted() {
            return Err(StressError::ModelNotFitted);
        }

        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "Saved pipeline");
        Ok(())
    }

    /// Read a pipeline written by [`save`](Self::save)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let pipeline: Self = serde_json::from_str(&json)?;
        if !pipeline.is_fitted() {
            return Err(StressError::ModelNotFitted);
        }
        Ok(pipeline)
    }
}
