//! Feature Vector Assembly

use crate::error::{AssemblyError, FeatureError};
use crate::kinematics::KinematicSeries;
use crate::statistics::{StatisticalFeatures, STATISTIC_NAMES};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use trajectory_model::{ClassSet, Trajectory};

/// Number of features in the vector
pub const FEATURE_DIMENSION: usize = 51;

/// Derived series summarised by an 8-statistic block, in vector order.
/// The velocity block is followed by the change and stop rates.
pub const SUMMARISED_SERIES: [&str; 6] = [
    "velocity",
    "acceleration",
    "acceleration_change_rate",
    "angle",
    "turning_angle",
    "heading_change_rate",
];

/// Positional names of the feature vector entries
pub fn feature_names() -> Vec<String> {
    let mut names = Vec::with_capacity(FEATURE_DIMENSION);
    names.push("distance".to_string());
    for (i, series) in SUMMARISED_SERIES.iter().enumerate() {
        for stat in STATISTIC_NAMES {
            names.push(format!("{}_{}", series, stat));
        }
        if i == 0 {
            names.push("velocity_change_rate".to_string());
            names.push("stop_rate".to_string());
        }
    }
    names
}

/// Fixed-length kinematic summary of one trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Source trajectory
    pub trajectory_id: String,
    /// Raw feature values (51 dimensions, see [`feature_names`])
    pub values: Vec<f64>,
    /// Class label as carried by the trajectory
    pub label: String,
    /// Position of the label in the class set
    pub class_index: usize,
    /// One-hot indicator over the class set
    pub one_hot: Vec<f64>,
}

impl FeatureVector {
    pub fn distance(&self) -> f64 {
        self.values[0]
    }

    pub fn velocity_mean(&self) -> f64 {
        self.values[1]
    }
}

/// Assembler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerConfig {
    /// Threshold for both the velocity change rate and the stop rate
    pub velocity_threshold: f64,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            velocity_threshold: 1.0,
        }
    }
}

/// Turns trajectories into feature vectors
#[derive(Debug, Clone)]
pub struct FeatureAssembler {
    config: AssemblerConfig,
    classes: ClassSet,
}

fn summarise(series: &'static str, values: &[f64]) -> Result<StatisticalFeatures, FeatureError> {
    StatisticalFeatures::compute(values).map_err(|source| FeatureError::Statistic { series, source })
}

impl FeatureAssembler {
    /// Create a new assembler
    pub fn new(config: AssemblerConfig, classes: ClassSet) -> Self {
        Self { config, classes }
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    pub fn classes(&self) -> &ClassSet {
        &self.classes
    }

    fn build(&self, traj: &Trajectory) -> Result<FeatureVector, FeatureError> {
        let class_index = self.classes.index_of(&traj.mode)?;
        let one_hot = self.classes.one_hot(&traj.mode)?;

        let series = KinematicSeries::derive(traj)?;
        let threshold = self.config.velocity_threshold;

        let blocks = [
            summarise("velocity", &series.velocity)?,
            summarise("acceleration", &series.acceleration)?,
            summarise("acceleration_change_rate", &series.acceleration_change_rate)?,
            summarise("angle", &series.angle)?,
            summarise("turning_angle", &series.turning_angle)?,
            summarise("heading_change_rate", &series.heading_change_rate)?,
        ];

        let mut values = Vec::with_capacity(FEATURE_DIMENSION);
        values.push(series.distance);
        for (i, block) in blocks.iter().enumerate() {
            values.extend_from_slice(&block.to_array());
            if i == 0 {
                values.push(series.vel_change_rate(threshold));
                values.push(series.stop_rate(threshold));
            }
        }
        debug_assert_eq!(values.len(), FEATURE_DIMENSION);

        Ok(FeatureVector {
            trajectory_id: traj.id.clone(),
            values,
            label: traj.mode.clone(),
            class_index,
            one_hot,
        })
    }

    /// Assemble the feature vector of one trajectory
    pub fn assemble(&self, traj: &Trajectory) -> Result<FeatureVector, AssemblyError> {
        debug!("Assembling features for {} ({} points)", traj.id, traj.len());
        self.build(traj).map_err(|source| AssemblyError {
            trajectory_id: traj.id.clone(),
            source,
        })
    }

    /// Assemble many trajectories in parallel. Results keep the input order;
    /// a failing trajectory only fails its own slot.
    pub fn assemble_batch(&self, trajs: &[Trajectory]) -> Vec<Result<FeatureVector, AssemblyError>> {
        let results: Vec<_> = trajs.par_iter().map(|t| self.assemble(t)).collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            warn!("{} of {} trajectories could not be featurized", failed, trajs.len());
        }
        info!("Assembled {} feature vectors", trajs.len() - failed);

        results
    }
}

impl Default for FeatureAssembler {
    fn default() -> Self {
        Self::new(AssemblerConfig::default(), ClassSet::default())
    }
}
