//! Stress predictor - Main Entry Point

use clap::Parser;
use stress_predictor::cli::{Cli, Commands, cmd_predict, cmd_serve, cmd_train};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stress_predictor=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train { data, output, c, max_iter, unknown_categories } => {
            cmd_train(&data, &output, c, max_iter, &unknown_categories)?;
        }
        Commands::Serve { host, port, model, strict_ranges } => {
            cmd_serve(&host, port, &model, strict_ranges).await?;
        }
        Commands::Predict { model, input, strict_ranges } => {
            cmd_predict(&model, &input, strict_ranges)?;
        }
    }

    Ok(())
}
