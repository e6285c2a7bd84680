//! Column transformer: scaled numeric block followed by one-hot blocks

use crate::error::{StressError, Result};
use super::{OneHotEncoder, PreprocessingConfig, StandardScaler};
use ndarray::{concatenate, Array2, Axis};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// Fitted preprocessing stage of the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnTransformer {
    config: PreprocessingConfig,
    scaler: StandardScaler,
    encoder: OneHotEncoder,
    is_fitted: bool,
}

impl ColumnTransformer {
    /// Create a new transformer
    pub fn new(config: PreprocessingConfig) -> Self {
        let encoder = OneHotEncoder::new(config.drop, config.unknown_categories);
        Self {
            config,
            scaler: StandardScaler::new(),
            encoder,
            is_fitted: false,
        }
    }

    /// Fit the scaler and the encoder on their columns
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        let start = Instant::now();

        if df.height() == 0 {
            return Err(StressError::DataError("Cannot fit on an empty dataset".to_string()));
        }

        self.scaler.fit(df, &self.config.numeric_columns)?;
        self.encoder.fit(df, &self.config.categorical_columns)?;
        self.is_fitted = true;

        debug!(
            rows = df.height(),
            output_features = self.n_features(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Column transformer fitted"
        );
        Ok(self)
    }

    /// Build the design matrix for the classifier
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(StressError::ModelNotFitted);
        }

        let numeric = self.scaler.transform(df)?;
        let categorical = self.encoder.transform(df)?;
        Ok(concatenate(Axis(1), &[numeric.view(), categorical.view()])?)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<Array2<f64>> {
        self.fit(df)?;
        self.transform(df)
    }

    /// Width of the design matrix
    pub fn n_features(&self) -> usize {
        self.config.numeric_columns.len() + self.encoder.n_output_features()
    }

    /// Output column names, numeric first
    pub fn feature_names(&self) -> Vec<String> {
        self.config
            .numeric_columns
            .iter()
            .cloned()
            .chain(self.encoder.feature_names())
            .collect()
    }

    pub fn numeric_columns(&self) -> &[String] {
        &self.config.numeric_columns
    }

    pub fn categorical_columns(&self) -> &[String] {
        &self.config.categorical_columns
    }

    pub fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }
}
