//! Training engine: dataset in, fitted pipeline artifact out

use crate::dataset::{self, TrainingSet};
use crate::error::Result;
use crate::pipeline::StressPipeline;
use crate::preprocessing::PreprocessingConfig;
use super::{LogisticRegression, TrainingConfig};
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

/// Summary of a finished training run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub n_samples: usize,
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub iterations: usize,
    pub converged: bool,
    pub final_loss: f64,
    /// Accuracy on the training rows
    pub accuracy: f64,
    pub training_time_secs: f64,
}

/// Builds and fits the stress pipeline
pub struct TrainEngine {
    config: TrainingConfig,
}

impl TrainEngine {
    /// Create a new training engine
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Unfitted pipeline with the configured hyperparameters
    pub fn build_pipeline(&self) -> StressPipeline {
        let classifier = LogisticRegression::new()
            .with_c(self.config.c)
            .with_max_iter(self.config.max_iter)
            .with_tol(self.config.tol);
        let preprocessing = PreprocessingConfig::from_schema(&self.config.schema)
            .with_unknown_categories(self.config.unknown_categories);
        StressPipeline::new(preprocessing, classifier)
    }

    /// Fit a pipeline on an already loaded training set
    pub fn fit(&self, data: &TrainingSet) -> Result<(StressPipeline, TrainingReport)> {
        let start = Instant::now();
        let mut pipeline = self.build_pipeline();
        pipeline.fit(&data.features, &data.target)?;

        let accuracy = pipeline.score(&data.features, &data.target)?;
        let classifier = pipeline.classifier();
        let report = TrainingReport {
            n_samples: data.len(),
            n_features: pipeline.preprocessor().n_features(),
            classes: pipeline.classes().to_vec(),
            iterations: classifier.n_iter,
            converged: classifier.converged,
            final_loss: classifier.final_loss.unwrap_or(f64::NAN),
            accuracy,
            training_time_secs: start.elapsed().as_secs_f64(),
        };

        if !report.converged {
            warn!(
                iterations = report.iterations,
                max_iter = self.config.max_iter,
                "Optimizer did not reach tolerance; consider raising max_iter"
            );
        }
        info!(
            samples = report.n_samples,
            features = report.n_features,
            classes = ?report.classes,
            iterations = report.iterations,
            accuracy = report.accuracy,
            "Pipeline fitted"
        );

        Ok((pipeline, report))
    }

    /// Read the configured CSV into a training set
    pub fn load(&self) -> Result<TrainingSet> {
        dataset::load_training_set(&self.config.data_path, &self.config.schema)
    }

    /// Write a fitted pipeline to the configured output path
    pub fn save(&self, pipeline: &StressPipeline) -> Result<()> {
        pipeline.save(&self.config.output_path)
    }

    /// Load, fit, and write the artifact. The output file is only touched
    /// after fitting succeeds.
    pub fn run(&self) -> Result<TrainingReport> {
        let data = self.load()?;
        let (pipeline, report) = self.fit(&data)?;
        self.save(&pipeline)?;
        Ok(report)
    }
}
