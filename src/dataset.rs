//! Survey dataset loading
//!
//! Reads the labeled CSV, normalizes its headers to the schema's internal
//! names and splits it into a feature frame and an integer target.

use crate::error::{StressError, Result};
use crate::schema::FeatureSchema;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Features and labels ready for fitting
#[derive(Debug, Clone)]
pub struct TrainingSet {
    /// The seven feature columns, in schema order
    pub features: DataFrame,
    /// Stress level per row
    pub target: Vec<i64>,
}

impl TrainingSet {
    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }
}

/// Load a CSV file with a header row
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)
        .map_err(|e| StressError::DataError(format!("{}: {}", path.display(), e)))?;

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .into_reader_with_file_handle(file)
        .finish()
        .map_err(|e| StressError::DataError(e.to_string()))
}

/// Trim header whitespace, then apply the schema's renames.
///
/// Renames whose source column is absent are skipped; the missing internal
/// name surfaces later when features are selected.
pub fn normalize_columns(df: &mut DataFrame, schema: &FeatureSchema) -> Result<()> {
    let trimmed: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.trim().to_string())
        .collect();
    df.set_column_names(trimmed)?;

    for (raw, internal) in &schema.renames {
        if df.get_column_index(raw).is_some() {
            df.rename(raw, internal.as_str().into())?;
            debug!(from = %raw, to = %internal, "Renamed column");
        }
    }

    Ok(())
}

/// Split a normalized frame into features and target
pub fn training_set(df: &DataFrame, schema: &FeatureSchema) -> Result<TrainingSet> {
    if df.height() == 0 {
        return Err(StressError::DataError("Dataset has no rows".to_string()));
    }

    for name in schema.feature_names().into_iter().chain([schema.target.as_str()]) {
        if df.get_column_index(name).is_none() {
            return Err(StressError::FeatureNotFound(name.to_string()));
        }
    }

    let features = df.select(schema.feature_names())?;

    let target_series = df
        .column(&schema.target)
        .map_err(|_| StressError::FeatureNotFound(schema.target.clone()))?
        .as_materialized_series()
        .cast(&DataType::Int64)?;
    let target = target_series
        .i64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| {
                StressError::DataError(format!(
                    "Target '{}' has a missing or non-integer value at row {}",
                    schema.target, row
                ))
            })
        })
        .collect::<Result<Vec<i64>>>()?;

    Ok(TrainingSet { features, target })
}

/// Load, normalize and split a survey CSV
pub fn load_training_set(path: &Path, schema: &FeatureSchema) -> Result<TrainingSet> {
    let mut df = load_csv(path)?;
    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Loaded dataset"
    );

    normalize_columns(&mut df, schema)?;
    training_set(&df, schema)
}
