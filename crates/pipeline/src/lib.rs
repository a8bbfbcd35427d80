//! Transportation-Mode Feature Pipeline
//!
//! Thin driver over the segmenter, the dataset filter and the feature
//! engine.
//!
//! ```bash
//! # Segment GeoLife subjects into stored trajectories
//! trajmode segment --data Data/ --out trajectories/
//!
//! # Select trajectories and write their feature vectors
//! trajmode features --catalog trajectories/metadata.json --out features.csv
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod commands;
mod config;

pub use config::{LoggingConfig, PipelineConfig};

/// Transportation-mode trajectory pipeline
#[derive(Parser, Debug)]
#[command(name = "trajmode")]
#[command(author, version, about = "Segment labeled GPS logs and extract kinematic feature vectors")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split raw subject logs into labeled trajectories
    Segment(SegmentArgs),

    /// Select stored trajectories and write feature vectors as CSV
    Features(FeaturesArgs),

    /// Display version information
    Version,
}

/// Arguments for the segment command
#[derive(Args, Debug)]
pub struct SegmentArgs {
    /// Dataset root holding one directory per subject
    #[arg(short, long)]
    pub data: PathBuf,

    /// Output directory for trajectory tables and the catalog
    #[arg(short, long, default_value = "trajectories")]
    pub out: PathBuf,
}

/// Arguments for the features command
#[derive(Args, Debug)]
pub struct FeaturesArgs {
    /// Catalog written by the segment command
    #[arg(short, long, default_value = "trajectories/metadata.json")]
    pub catalog: PathBuf,

    /// Output CSV file
    #[arg(short, long, default_value = "features.csv")]
    pub out: PathBuf,

    /// Override the configured velocity threshold
    #[arg(short, long)]
    pub threshold: Option<f64>,
}

/// Initialize tracing. `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}
