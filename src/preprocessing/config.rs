//! Preprocessing configuration

use serde::{Deserialize, Serialize};
use super::UnknownPolicy;
use crate::schema::FeatureSchema;

/// Which one-hot indicator to drop per categorical column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropPolicy {
    /// Drop the first category of the sorted vocabulary
    First,
    /// Keep one indicator per category
    None,
}

/// Configuration for the column transformer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    /// Columns to standardize, in output order
    pub numeric_columns: Vec<String>,

    /// Columns to one-hot encode, in output order
    pub categorical_columns: Vec<String>,

    /// How to treat categories not seen during fit
    pub unknown_categories: UnknownPolicy,

    /// Indicator dropping rule
    pub drop: DropPolicy,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self::from_schema(&FeatureSchema::stress_survey())
    }
}

impl PreprocessingConfig {
    /// Numeric and categorical columns taken from a schema
    pub fn from_schema(schema: &FeatureSchema) -> Self {
        Self {
            numeric_columns: schema.numeric_columns(),
            categorical_columns: schema.categorical_columns(),
            unknown_categories: UnknownPolicy::Ignore,
            drop: DropPolicy::First,
        }
    }

    /// Builder method to set the unknown-category policy
    pub fn with_unknown_categories(mut self, policy: UnknownPolicy) -> Self {
        self.unknown_categories = policy;
        self
    }
}
