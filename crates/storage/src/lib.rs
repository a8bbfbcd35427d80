//! Storage Layer
//!
//! Persists trajectories as numeric tables referenced by a JSON catalog,
//! and parses raw GeoLife-style point logs and label files.

mod catalog;
pub mod geolife;
mod repository;
mod table;

pub use catalog::{Catalog, CatalogEntry};
pub use repository::{load_entry, TrajectoryRepository, CATALOG_FILE};
pub use table::{read_table, write_table};

use std::path::PathBuf;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error in {path} line {line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("Empty trajectory table: {0}")]
    EmptyTable(PathBuf),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}
