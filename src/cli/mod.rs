//! Stress predictor CLI
//!
//! Command-line interface for training the pipeline, serving it, and
//! scoring a single row from a JSON file.

use clap::{builder::BoolishValueParser, Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::features::FeatureRow;
use crate::predictor::Predictor;
use crate::preprocessing::UnknownPolicy;
use crate::schema::{FeatureSchema, LabelMap};
use crate::training::{TrainEngine, TrainingConfig};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn field(key: &str, val: impl std::fmt::Display) {
    println!("  {:<16} {}", muted(key), val);
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "stress-predictor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Academic stress classifier: training pipeline and prediction server")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fit the pipeline on a labeled survey CSV and write the artifact
    Train {
        /// Cleaned survey CSV
        #[arg(short, long, env = "DATA_PATH", default_value = "cleaned.csv")]
        data: PathBuf,

        /// Output artifact (overwritten if present)
        #[arg(short, long, env = "MODEL_PATH", default_value = "stress_model.json")]
        output: PathBuf,

        /// Inverse regularization strength
        #[arg(short = 'C', long = "c", default_value = "10.0")]
        c: f64,

        /// Maximum optimizer iterations
        #[arg(long, default_value = "1000")]
        max_iter: usize,

        /// Unseen categories at prediction time: encode as zeros or reject
        #[arg(long, default_value = "ignore", value_parser = ["ignore", "error"])]
        unknown_categories: String,
    },

    /// Serve the HTML form and JSON API
    Serve {
        /// Host to bind to
        #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "API_PORT", default_value = "5000")]
        port: u16,

        /// Fitted pipeline artifact
        #[arg(short, long, env = "MODEL_PATH", default_value = "stress_model.json")]
        model: PathBuf,

        /// Reject 1-5 ratings outside their range
        #[arg(long, env = "STRICT_RANGES", value_parser = BoolishValueParser::new())]
        strict_ranges: bool,
    },

    /// Score one row from a JSON object file
    Predict {
        /// Fitted pipeline artifact
        #[arg(short, long, env = "MODEL_PATH", default_value = "stress_model.json")]
        model: PathBuf,

        /// JSON file holding one object keyed by feature name
        #[arg(short, long)]
        input: PathBuf,

        /// Reject 1-5 ratings outside their range
        #[arg(long)]
        strict_ranges: bool,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(
    data_path: &Path,
    output: &Path,
    c: f64,
    max_iter: usize,
    unknown_categories: &str,
) -> anyhow::Result<()> {
    section("Train");

    let policy = match unknown_categories {
        "ignore" => UnknownPolicy::Ignore,
        "error" => UnknownPolicy::Error,
        _ => anyhow::bail!("Invalid unknown-category policy: {}", unknown_categories),
    };

    let engine = TrainEngine::new(
        TrainingConfig::new(data_path, output)
            .with_c(c)
            .with_max_iter(max_iter)
            .with_unknown_categories(policy),
    );

    step_run("Loading data");
    let start = Instant::now();
    let data = engine.load()?;
    step_done(&format!("{} rows in {:?}", data.len(), start.elapsed()));

    step_run(&format!("Fitting logistic regression (C={})", c));
    let (pipeline, report) = engine.fit(&data)?;
    step_done(&format!("{} iterations", report.iterations));

    step_run("Writing artifact");
    engine.save(&pipeline)?;
    step_done(&output.display().to_string());

    let classes: Vec<String> = report.classes.iter().map(|c| c.to_string()).collect();

    println!();
    field("Accuracy", format!("{:.4}", report.accuracy).white().bold());
    field("Classes", classes.join(", ").white());
    field("Features", report.n_features.to_string().white());
    field("Converged", if report.converged { ok("yes") } else { "no".yellow() });
    field("Time", format!("{:.3}s", report.training_time_secs).white());
    println!();

    Ok(())
}

pub fn cmd_predict(model_path: &Path, input: &Path, strict_ranges: bool) -> anyhow::Result<()> {
    let predictor = Predictor::load(model_path, FeatureSchema::stress_survey(), LabelMap::bilingual())?;

    let raw = std::fs::read_to_string(input)?;
    let payload = match serde_json::from_str::<serde_json::Value>(&raw)? {
        serde_json::Value::Object(map) => map,
        _ => anyhow::bail!("{} does not contain a JSON object", input.display()),
    };

    let row = FeatureRow::from_json(&payload, predictor.schema(), strict_ranges)?;
    let prediction = predictor.predict(&row)?;

    println!("{}", serde_json::to_string_pretty(&prediction)?);
    Ok(())
}

pub async fn cmd_serve(host: &str, port: u16, model: &Path, strict_ranges: bool) -> anyhow::Result<()> {
    use crate::server::{run_server, ServerConfig};

    section(&format!("Stress Predictor v{}", env!("CARGO_PKG_VERSION")));
    field("Form", format!("http://{}:{}/", host, port).white());
    field("API", format!("http://{}:{}/api/predict", host, port).white());
    field("Health", format!("http://{}:{}/api/health", host, port).white());
    field("Model", model.display().to_string().white());
    field("Strict ranges", if strict_ranges { ok("on") } else { dim("off") });
    println!();
    println!("  {}", dim("ctrl+c to stop"));
    println!();

    let config = ServerConfig {
        host: host.to_string(),
        port,
        model_path: model.to_path_buf(),
        enforce_bounds: strict_ranges,
    };

    run_server(config).await
}
