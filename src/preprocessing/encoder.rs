//! One-hot encoding of categorical columns

use crate::error::{StressError, Result};
use super::{categorical_values, DropPolicy};
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What to do with a category that was not seen during fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnknownPolicy {
    /// Encode as all-zero indicators
    Ignore,
    /// Fail the transform
    Error,
}

/// Learned vocabulary for one column
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CategoryVocabulary {
    column: String,
    /// Sorted, deduplicated categories
    categories: Vec<String>,
    /// Number of leading categories without an indicator column
    dropped: usize,
}

impl CategoryVocabulary {
    fn encoded(&self) -> &[String] {
        &self.categories[self.dropped.min(self.categories.len())..]
    }

    /// Indicator index for a value. `Ok(None)` means the value encodes as
    /// all zeros (dropped or ignored unknown).
    fn indicator(&self, value: &str, unknown: UnknownPolicy) -> Result<Option<usize>> {
        match self.categories.binary_search_by(|c| c.as_str().cmp(value)) {
            Ok(idx) if idx < self.dropped => Ok(None),
            Ok(idx) => Ok(Some(idx - self.dropped)),
            Err(_) => match unknown {
                UnknownPolicy::Ignore => Ok(None),
                UnknownPolicy::Error => Err(StressError::UnknownCategory {
                    feature: self.column.clone(),
                    value: value.to_string(),
                }),
            },
        }
    }
}

/// One-hot encoder with a configurable drop rule and unknown handling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    vocabularies: Vec<CategoryVocabulary>,
    drop: DropPolicy,
    unknown: UnknownPolicy,
    is_fitted: bool,
}

impl Default for OneHotEncoder {
    fn default() -> Self {
        Self::new(DropPolicy::First, UnknownPolicy::Ignore)
    }
}

impl OneHotEncoder {
    /// Create a new encoder
    pub fn new(drop: DropPolicy, unknown: UnknownPolicy) -> Self {
        Self {
            vocabularies: Vec::new(),
            drop,
            unknown,
            is_fitted: false,
        }
    }

    /// Learn the vocabulary of each column
    pub fn fit(&mut self, df: &DataFrame, columns: &[String]) -> Result<&mut Self> {
        let mut vocabularies = Vec::with_capacity(columns.len());

        for col_name in columns {
            let values = categorical_values(df, col_name)?;
            let categories: Vec<String> = values
                .into_iter()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();

            if categories.is_empty() {
                return Err(StressError::DataError(format!(
                    "Cannot fit encoder on empty column '{}'",
                    col_name
                )));
            }

            let dropped = match self.drop {
                DropPolicy::First => 1,
                DropPolicy::None => 0,
            };

            vocabularies.push(CategoryVocabulary {
                column: col_name.clone(),
                categories,
                dropped,
            });
        }

        self.vocabularies = vocabularies;
        self.is_fitted = true;
        Ok(self)
    }

    /// Encode the fitted columns into an (n_rows, n_output_features) matrix
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(StressError::ModelNotFitted);
        }

        let mut out = Array2::zeros((df.height(), self.n_output_features()));
        let mut offset = 0;

        for vocab in &self.vocabularies {
            let values = categorical_values(df, &vocab.column)?;
            for (i, value) in values.iter().enumerate() {
                if let Some(idx) = vocab.indicator(value, self.unknown)? {
                    out[[i, offset + idx]] = 1.0;
                }
            }
            offset += vocab.encoded().len();
        }

        Ok(out)
    }

    /// Total number of indicator columns
    pub fn n_output_features(&self) -> usize {
        self.vocabularies.iter().map(|v| v.encoded().len()).sum()
    }

    /// Indicator column names as `<column>_<category>`
    pub fn feature_names(&self) -> Vec<String> {
        self.vocabularies
            .iter()
            .flat_map(|v| v.encoded().iter().map(move |c| format!("{}_{}", v.column, c)))
            .collect()
    }

    /// Fitted categories of a column, including the dropped one
    pub fn categories(&self, column: &str) -> Option<&[String]> {
        self.vocabularies
            .iter()
            .find(|v| v.column == column)
            .map(|v| v.categories.as_slice())
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }
}
