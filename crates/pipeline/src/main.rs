//! Transportation-mode feature pipeline - Main Entry Point

use clap::Parser;
use pipeline::{commands, init_logging, Cli, Commands, PipelineConfig};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = PipelineConfig::load(cli.config.as_deref())?;
    init_logging(&config.logging);

    info!("=== trajmode v{} ===", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Segment(args) => {
            commands::segment(&args)?;
        }
        Commands::Features(args) => {
            commands::features(&args, &config)?;
        }
        Commands::Version => {
            println!("trajmode {}", env!("CARGO_PKG_VERSION"));
            println!("feature dimension: {}", feature_engine::FEATURE_DIMENSION);
        }
    }

    Ok(())
}
