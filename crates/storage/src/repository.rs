//! Filesystem-backed trajectory repository

use crate::catalog::{Catalog, CatalogEntry};
use crate::table::{read_table, write_table};
use crate::StorageError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use trajectory_model::Trajectory;

/// File name of the catalog inside a repository root
pub const CATALOG_FILE: &str = "metadata.json";

/// Stores each trajectory as `<root>/<id>.txt` plus a catalog at
/// `<root>/metadata.json`
pub struct TrajectoryRepository {
    root: PathBuf,
}

impl TrajectoryRepository {
    /// Open a repository, creating the root directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| StorageError::io(&root, e))?;
        info!("Opened trajectory repository at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.root.join(CATALOG_FILE)
    }

    /// Write the table of one trajectory and describe it
    pub fn persist(&self, traj: &Trajectory) -> Result<CatalogEntry, StorageError> {
        let path = self.root.join(format!("{}.txt", traj.id));
        write_table(&path, &traj.points)?;
        debug!("Stored {} ({} points) at {}", traj.id, traj.len(), path.display());
        Ok(CatalogEntry::describe(traj, path))
    }

    /// Store every trajectory and write the catalog, in input order
    pub fn persist_all(&self, trajs: &[Trajectory]) -> Result<Catalog, StorageError> {
        let entries = trajs
            .iter()
            .map(|t| self.persist(t))
            .collect::<Result<Vec<_>, _>>()?;
        let catalog = Catalog::new(entries);
        catalog.save(&self.catalog_path())?;
        Ok(catalog)
    }

    /// Read the repository catalog
    pub fn catalog(&self) -> Result<Catalog, StorageError> {
        Catalog::load(&self.catalog_path())
    }

    /// Load the trajectory an entry points at
    pub fn load(&self, entry: &CatalogEntry) -> Result<Trajectory, StorageError> {
        load_entry(entry)
    }
}

/// Load a trajectory from its catalog entry
pub fn load_entry(entry: &CatalogEntry) -> Result<Trajectory, StorageError> {
    let points = read_table(&entry.file_path)?;
    if points.is_empty() {
        return Err(StorageError::EmptyTable(entry.file_path.clone()));
    }
    Ok(Trajectory::new(entry.id.clone(), entry.class.clone(), points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use trajectory_model::TrajectoryPoint;

    fn traj(id: &str, mode: &str) -> Trajectory {
        Trajectory::new(
            id,
            mode,
            (0..5)
                .map(|i| TrajectoryPoint::new(39.9 + i as f64 * 1e-4, 116.3, i as f64 * 2.0))
                .collect(),
        )
    }

    #[test]
    fn test_persist_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = TrajectoryRepository::open(dir.path().join("trajectories")).unwrap();
        let trajs = vec![traj("010_0", "walk"), traj("010_2", "bus")];

        let catalog = repo.persist_all(&trajs).unwrap();
        assert_eq!(catalog.len(), 2);

        let reloaded = repo.catalog().unwrap();
        assert_eq!(reloaded, catalog);

        let loaded: Vec<_> = reloaded
            .entries
            .iter()
            .map(|e| repo.load(e).unwrap())
            .collect();
        assert_eq!(loaded, trajs);
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "").unwrap();
        let entry = CatalogEntry {
            id: "x_0".to_string(),
            file_path: path,
            class: "walk".to_string(),
            length: 0,
            mean_dt: None,
        };

        assert!(matches!(load_entry(&entry), Err(StorageError::EmptyTable(_))));
    }
}
