//! Trajectory metadata catalog

use crate::StorageError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use trajectory_model::Trajectory;

/// Catalog entry describing one stored trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    /// Location of the `x y t` table
    pub file_path: PathBuf,
    /// Transportation mode label
    pub class: String,
    /// Number of points
    pub length: usize,
    /// Mean seconds between samples, absent for single-point trajectories
    pub mean_dt: Option<f64>,
}

impl CatalogEntry {
    /// Describe `traj` stored at `file_path`
    pub fn describe(traj: &Trajectory, file_path: impl Into<PathBuf>) -> Self {
        Self {
            id: traj.id.clone(),
            file_path: file_path.into(),
            class: traj.mode.clone(),
            length: traj.len(),
            mean_dt: traj.mean_interval(),
        }
    }
}

/// Ordered list of catalog entries, stored as a JSON array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: CatalogEntry) {
        self.entries.push(entry);
    }

    pub fn load(path: &Path) -> Result<Self, StorageError> {
        let file = File::open(path).map_err(|e| StorageError::io(path, e))?;
        let catalog: Catalog = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| StorageError::SerializationError(format!("{}: {}", path.display(), e)))?;
        info!("Loaded catalog {} with {} entries", path.display(), catalog.len());
        Ok(catalog)
    }

    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        let file = File::create(path).map_err(|e| StorageError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        writer.flush().map_err(|e| StorageError::io(path, e))?;
        info!("Saved catalog {} with {} entries", path.display(), self.len());
        Ok(())
    }
}
