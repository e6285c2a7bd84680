//! Stress predictor - academic stress level classifier
//!
//! This crate provides:
//! - Survey loading and column normalization
//! - Scaling and one-hot encoding of the survey features
//! - Multinomial logistic regression fitted with L-BFGS
//! - A persisted pipeline artifact
//! - Web server and CLI interfaces
//!
//! # Modules
//!
//! ## Data
//! - [`schema`] - Feature layout, column renames and label text
//! - [`dataset`] - CSV loading and training set extraction
//!
//! ## Model
//! - [`preprocessing`] - Standard scaling and one-hot encoding
//! - [`training`] - Logistic regression and the training engine
//! - [`pipeline`] - Fitted transformer + classifier and its artifact
//!
//! ## Serving
//! - [`features`] - Request validation into a single feature row
//! - [`predictor`] - Read-only prediction service
//! - [`server`] - HTTP server with form and JSON routes
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Data
pub mod schema;
pub mod dataset;

// Model
pub mod preprocessing;
pub mod training;
pub mod pipeline;

// Serving
pub mod features;
pub mod predictor;
pub mod server;
pub mod cli;

pub use error::{StressError, Result};
pub use pipeline::StressPipeline;
pub use predictor::{Prediction, PredictError, Predictor};
pub use schema::{FeatureSchema, LabelMap};
