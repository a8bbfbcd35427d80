//! Dataset selection rules

use crate::candidate::Candidate;
use crate::error::FilterError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};
use trajectory_model::ClassSet;

/// Selection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Longest accepted mean sampling interval (seconds)
    pub max_mean_interval_secs: f64,
    /// Fewest accepted points
    pub min_points: usize,
    /// Accepted classes, after aliasing
    pub classes: ClassSet,
    /// Raw label -> accepted class
    pub aliases: BTreeMap<String, String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        let aliases = [("taxi", "car"), ("subway", "train")]
            .into_iter()
            .map(|(a, c)| (a.to_string(), c.to_string()))
            .collect();
        Self {
            max_mean_interval_secs: 3.0,
            min_points: 100,
            classes: ClassSet::default(),
            aliases,
        }
    }
}

/// Why a candidate was left out
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// Label neither accepted nor aliased
    UnknownClass(String),
    /// Fewer points than `min_points`
    TooShort { length: usize, min: usize },
    /// Mean sampling interval above the ceiling
    SparseSampling { mean_dt: f64, max: f64 },
    /// Fewer than two samples, so no sampling interval
    Unsampled,
}

/// Counts of one selection pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionReport {
    pub kept: usize,
    pub unknown_class: usize,
    pub too_short: usize,
    pub sparse: usize,
}

impl SelectionReport {
    fn record(&mut self, rejection: &Rejection) {
        match rejection {
            Rejection::UnknownClass(_) => self.unknown_class += 1,
            Rejection::TooShort { .. } => self.too_short += 1,
            Rejection::SparseSampling { .. } | Rejection::Unsampled => self.sparse += 1,
        }
    }

    pub fn rejected(&self) -> usize {
        self.unknown_class + self.too_short + self.sparse
    }
}

/// Applies a [`FilterConfig`] to catalog entries or trajectories
#[derive(Debug, Clone)]
pub struct DatasetFilter {
    config: FilterConfig,
}

impl DatasetFilter {
    /// Create a filter, rejecting inconsistent configurations
    pub fn new(config: FilterConfig) -> Result<Self, FilterError> {
        if !(config.max_mean_interval_secs > 0.0) {
            return Err(FilterError::NonPositive {
                field: "max_mean_interval_secs",
                value: config.max_mean_interval_secs,
            });
        }
        if config.classes.is_empty() {
            return Err(FilterError::NoClasses);
        }
        if let Some((alias, target)) = config
            .aliases
            .iter()
            .find(|(_, target)| !config.classes.contains(target))
        {
            return Err(FilterError::AliasTarget {
                alias: alias.clone(),
                target: target.clone(),
            });
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Accepted class name for a raw label, if any
    pub fn canonical_class<'a>(&'a self, class: &'a str) -> Option<&'a str> {
        let class = self
            .config
            .aliases
            .get(class)
            .map(String::as_str)
            .unwrap_or(class);
        self.config.classes.contains(class).then_some(class)
    }

    /// Judge a candidate as-is, without aliasing its class
    pub fn check<C: Candidate>(&self, candidate: &C) -> Result<(), Rejection> {
        if !self.config.classes.contains(candidate.class()) {
            return Err(Rejection::UnknownClass(candidate.class().to_string()));
        }
        if candidate.length() < self.config.min_points {
            return Err(Rejection::TooShort {
                length: candidate.length(),
                min: self.config.min_points,
            });
        }
        match candidate.mean_dt() {
            None => Err(Rejection::Unsampled),
            Some(mean_dt) if mean_dt > self.config.max_mean_interval_secs => {
                Err(Rejection::SparseSampling {
                    mean_dt,
                    max: self.config.max_mean_interval_secs,
                })
            }
            Some(_) => Ok(()),
        }
    }

    /// Alias class labels, then keep the eligible candidates in order
    pub fn select<C: Candidate>(&self, candidates: Vec<C>) -> (Vec<C>, SelectionReport) {
        let mut report = SelectionReport::default();
        let mut kept = Vec::with_capacity(candidates.len());

        for mut candidate in candidates {
            let canonical = self.canonical_class(candidate.class()).map(str::to_string);
            if let Some(class) = canonical {
                if class != candidate.class() {
                    candidate.set_class(class);
                }
            }

            match self.check(&candidate) {
                Ok(()) => kept.push(candidate),
                Err(rejection) => {
                    debug!("Rejected candidate: {:?}", rejection);
                    report.record(&rejection);
                }
            }
        }

        report.kept = kept.len();
        info!(
            "Selected {} candidates, rejected {} (class {}, length {}, sampling {})",
            report.kept,
            report.rejected(),
            report.unknown_class,
            report.too_short,
            report.sparse
        );
        (kept, report)
    }
}

impl Default for DatasetFilter {
    fn default() -> Self {
        Self {
            config: FilterConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::path::PathBuf;
    use storage::CatalogEntry;
    use trajectory_model::{Trajectory, TrajectoryPoint};

    fn entry(id: &str, class: &str, length: usize, mean_dt: Option<f64>) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            file_path: PathBuf::from(format!("{}.txt", id)),
            class: class.to_string(),
            length,
            mean_dt,
        }
    }

    #[test]
    fn test_aliases_are_applied() {
        let filter = DatasetFilter::default();
        let (kept, report) = filter.select(vec![
            entry("a", "taxi", 150, Some(1.0)),
            entry("b", "subway", 150, Some(2.0)),
            entry("c", "walk", 150, Some(3.0)),
        ]);

        let classes: Vec<_> = kept.iter().map(|e| e.class.as_str()).collect();
        assert_eq!(classes, vec!["car", "train", "walk"]);
        assert_eq!(report.kept, 3);
        assert_eq!(report.rejected(), 0);
    }

    #[test]
    fn test_unknown_classes_are_dropped() {
        let filter = DatasetFilter::default();
        let (kept, report) = filter.select(vec![
            entry("a", "run", 500, Some(1.0)),
            entry("b", "airplane", 500, Some(1.0)),
            entry("c", "bike", 500, Some(1.0)),
        ]);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "c");
        assert_eq!(report.unknown_class, 2);
    }

    #[test]
    fn test_length_and_sampling_bounds() {
        let filter = DatasetFilter::default();
        assert!(filter.check(&entry("a", "bus", 100, Some(3.0))).is_ok());
        assert_eq!(
            filter.check(&entry("b", "bus", 99, Some(1.0))),
            Err(Rejection::TooShort { length: 99, min: 100 })
        );
        assert_eq!(
            filter.check(&entry("c", "bus", 200, Some(3.5))),
            Err(Rejection::SparseSampling { mean_dt: 3.5, max: 3.0 })
        );
        assert_eq!(
            filter.check(&entry("d", "bus", 200, None)),
            Err(Rejection::Unsampled)
        );
    }

    #[test]
    fn test_check_does_not_alias() {
        let filter = DatasetFilter::default();
        assert_eq!(
            filter.check(&entry("a", "taxi", 200, Some(1.0))),
            Err(Rejection::UnknownClass("taxi".to_string()))
        );
        assert_eq!(filter.canonical_class("taxi"), Some("car"));
        assert_eq!(filter.canonical_class("run"), None);
    }

    #[test]
    fn test_filters_trajectories() {
        let config = FilterConfig {
            min_points: 3,
            ..Default::default()
        };
        let filter = DatasetFilter::new(config).unwrap();
        let traj = |id: &str, dt: f64| {
            Trajectory::new(
                id,
                "taxi",
                (0..4).map(|i| TrajectoryPoint::new(0.0, i as f64, i as f64 * dt)).collect(),
            )
        };

        let (kept, _) = filter.select(vec![traj("dense", 1.0), traj("sparse", 10.0)]);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "dense");
        assert_eq!(kept[0].mode, "car");
    }

    #[test]
    fn test_invalid_configs() {
        let bad_interval = FilterConfig {
            max_mean_interval_secs: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            DatasetFilter::new(bad_interval),
            Err(FilterError::NonPositive { .. })
        ));

        let mut bad_alias = FilterConfig::default();
        bad_alias.aliases.insert("motorcycle".to_string(), "scooter".to_string());
        assert_eq!(
            DatasetFilter::new(bad_alias).unwrap_err(),
            FilterError::AliasTarget {
                alias: "motorcycle".to_string(),
                target: "scooter".to_string()
            }
        );
    }

    #[test]
    fn test_config_from_json() {
        let config: FilterConfig =
            serde_json::from_str(r#"{"min_points": 50, "classes": ["walk", "car"]}"#).unwrap();
        assert_eq!(config.min_points, 50);
        assert_eq!(config.max_mean_interval_secs, 3.0);
        assert_eq!(config.classes.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_selection_partitions_input(
            specs in prop::collection::vec((0usize..4, 0usize..300, 0.1f64..6.0), 0..40)
        ) {
            let labels = ["walk", "taxi", "run", "bus"];
            let entries: Vec<_> = specs
                .iter()
                .enumerate()
                .map(|(i, (c, len, dt))| entry(&i.to_string(), labels[*c], *len, Some(*dt)))
                .collect();
            let filter = DatasetFilter::default();

            let (kept, report) = filter.select(entries.clone());

            prop_assert_eq!(report.kept + report.rejected(), entries.len());
            for e in &kept {
                prop_assert!(filter.check(e).is_ok());
            }
        }
    }
}
