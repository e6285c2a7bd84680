//! Data preprocessing module
//!
//! Column-wise feature preparation for the classifier:
//! - Standard scaling of integer-scale columns
//! - One-hot encoding of categorical columns (first category dropped,
//!   unseen categories encoded as all zeros)
//! - A column transformer that stitches both into one design matrix

mod config;
mod scaler;
mod encoder;
mod transformer;

pub use config::{PreprocessingConfig, DropPolicy};
pub use scaler::StandardScaler;
pub use encoder::{OneHotEncoder, UnknownPolicy};
pub use transformer::ColumnTransformer;

use crate::error::{StressError, Result};
use polars::prelude::*;

/// Read a column as `f64` values, rejecting nulls and non-numeric cells.
pub(crate) fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| StressError::FeatureNotFound(name.to_string()))?;
    let series = column.as_materialized_series().cast(&DataType::Float64)?;
    let ca = series.f64()?;

    ca.into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| {
                StressError::DataError(format!(
                    "Column '{}' has a missing or non-numeric value at row {}",
                    name, row
                ))
            })
        })
        .collect()
}

/// Read a column as strings, rejecting nulls.
pub(crate) fn categorical_values(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let column = df
        .column(name)
        .map_err(|_| StressError::FeatureNotFound(name.to_string()))?;
    let series = column.as_materialized_series().cast(&DataType::String)?;
    let ca = series.str()?;

    ca.into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.map(str::to_string).ok_or_else(|| {
                StressError::DataError(format!(
                    "Column '{}' has a missing value at row {}",
                    name, row
                ))
            })
        })
        .collect()
}
