//! Standard scaling of numeric columns

use crate::error::{StressError, Result};
use super::numeric_values;
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Parameters for one fitted column
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScalerParams {
    column: String,
    mean: f64,
    scale: f64,
}

/// Z-score scaler: (x - mean) / std, with population variance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    params: Vec<ScalerParams>,
    is_fitted: bool,
}

impl StandardScaler {
    /// Create a new scaler
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn mean and scale for each column
    pub fn fit(&mut self, df: &DataFrame, columns: &[String]) -> Result<&mut Self> {
        let mut params = Vec::with_capacity(columns.len());

        for col_name in columns {
            let values = numeric_values(df, col_name)?;
            if values.is_empty() {
                return Err(StressError::DataError(format!(
                    "Cannot fit scaler on empty column '{}'",
                    col_name
                )));
            }

            let n = values.len() as f64;
            let mean = values.iter().sum::<f64>() / n;
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            let std = variance.sqrt();

            params.push(ScalerParams {
                column: col_name.clone(),
                mean,
                // Constant columns pass through centered
                scale: if std == 0.0 { 1.0 } else { std },
            });
        }

        self.params = params;
        self.is_fitted = true;
        Ok(self)
    }

    /// Scale the fitted columns into an (n_rows, n_columns) matrix
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(StressError::ModelNotFitted);
        }

        let n_rows = df.height();
        let mut out = Array2::zeros((n_rows, self.params.len()));

        for (j, params) in self.params.iter().enumerate() {
            let values = numeric_values(df, &params.column)?;
            for (i, v) in values.into_iter().enumerate() {
                out[[i, j]] = (v - params.mean) / params.scale;
            }
        }

        Ok(out)
    }

    /// Fitted column names, in output order
    pub fn columns(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.column.as_str()).collect()
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }
}
