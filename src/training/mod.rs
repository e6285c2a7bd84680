//! Model training module
//!
//! Provides:
//! - Multinomial logistic regression with L2 regularization
//! - An L-BFGS minimizer used to fit it
//! - A training engine that turns the survey CSV into a pipeline artifact

mod config;
mod engine;
pub mod lbfgs;
pub mod linear_models;

pub use config::TrainingConfig;
pub use engine::{TrainEngine, TrainingReport};
pub use lbfgs::{ConvergenceStatus, Lbfgs, OptimizationResult};
pub use linear_models::LogisticRegression;
