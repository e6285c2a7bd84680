//! Single-row feature assembly for prediction requests

use crate::error::Result;
use crate::schema::{FeatureKind, FeatureSchema, FeatureSpec};
use polars::prelude::*;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Why a request could not be turned into a row
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("Missing field: {0}")]
    Missing(String),

    #[error("Invalid integer for field {field}: {value}")]
    InvalidInteger { field: String, value: String },

    #[error("Field {field} must be a {expected}")]
    InvalidType { field: String, expected: &'static str },

    #[error("Field {field} is {value}, expected {min} to {max}")]
    OutOfRange { field: String, value: i64, min: i64, max: i64 },
}

/// A single validated value
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Integer(i64),
    Category(String),
}

/// One prediction row in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    values: Vec<(String, FeatureValue)>,
}

impl FeatureRow {
    /// Build a row from form fields. Integer-scale fields are parsed from text.
    pub fn from_form(
        form: &HashMap<String, String>,
        schema: &FeatureSchema,
        enforce_bounds: bool,
    ) -> std::result::Result<Self, FieldError> {
        let mut values = Vec::with_capacity(schema.features.len());

        for spec in &schema.features {
            let raw = form
                .get(&spec.name)
                .ok_or_else(|| FieldError::Missing(spec.name.clone()))?;

            let value = match spec.kind {
                FeatureKind::Numeric => {
                    FeatureValue::Integer(check_bounds(spec, parse_integer(spec, raw)?, enforce_bounds)?)
                }
                FeatureKind::Categorical => FeatureValue::Category(raw.clone()),
            };
            values.push((spec.name.clone(), value));
        }

        Ok(Self { values })
    }

    /// Build a row from a JSON object. Integer-scale fields accept integral
    /// numbers or integer strings; categorical fields accept strings.
    pub fn from_json(
        payload: &serde_json::Map<String, Value>,
        schema: &FeatureSchema,
        enforce_bounds: bool,
    ) -> std::result::Result<Self, FieldError> {
        let mut values = Vec::with_capacity(schema.features.len());

        for spec in &schema.features {
            let raw = match payload.get(&spec.name) {
                None | Some(Value::Null) => return Err(FieldError::Missing(spec.name.clone())),
                Some(v) => v,
            };

            let value = match (spec.kind, raw) {
                (FeatureKind::Numeric, Value::Number(n)) => {
                    let int = n
                        .as_i64()
                        .or_else(|| n.as_f64().and_then(integral_f64))
                        .ok_or_else(|| FieldError::InvalidInteger {
                            field: spec.name.clone(),
                            value: n.to_string(),
                        })?;
                    FeatureValue::Integer(check_bounds(spec, int, enforce_bounds)?)
                }
                (FeatureKind::Numeric, Value::String(s)) => {
                    FeatureValue::Integer(check_bounds(spec, parse_integer(spec, s)?, enforce_bounds)?)
                }
                (FeatureKind::Numeric, _) => {
                    return Err(FieldError::InvalidType {
                        field: spec.name.clone(),
                        expected: "integer",
                    })
                }
                (FeatureKind::Categorical, Value::String(s)) => FeatureValue::Category(s.clone()),
                (FeatureKind::Categorical, _) => {
                    return Err(FieldError::InvalidType {
                        field: spec.name.clone(),
                        expected: "string",
                    })
                }
            };
            values.push((spec.name.clone(), value));
        }

        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Column names in row order
    pub fn columns(&self) -> Vec<&str> {
        self.values.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// One-row frame with integer-scale features as `f64`
    pub fn to_frame(&self) -> Result<DataFrame> {
        let columns: Vec<Column> = self
            .values
            .iter()
            .map(|(name, value)| match value {
                FeatureValue::Integer(v) => Column::new(name.as_str().into(), vec![*v as f64]),
                FeatureValue::Category(s) => Column::new(name.as_str().into(), vec![s.as_str()]),
            })
            .collect();

        Ok(DataFrame::new(columns)?)
    }
}

fn parse_integer(spec: &FeatureSpec, raw: &str) -> std::result::Result<i64, FieldError> {
    raw.trim().parse::<i64>().map_err(|_| FieldError::InvalidInteger {
        field: spec.name.clone(),
        value: raw.to_string(),
    })
}

/// Whole floats inside the `i64` range; `as` would saturate anything larger
fn integral_f64(f: f64) -> Option<i64> {
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}

fn check_bounds(spec: &FeatureSpec, value: i64, enforce: bool) -> std::result::Result<i64, FieldError> {
    match spec.bounds {
        Some(bounds) if enforce && !bounds.contains(value) => Err(FieldError::OutOfRange {
            field: spec.name.clone(),
            value,
            min: bounds.min,
            max: bounds.max,
        }),
        _ => Ok(value),
    }
}
