//! Feature Engineering Engine
//!
//! Kinematic series estimation, statistical aggregation and fixed-length
//! feature vectors for transportation-mode trajectories.

mod error;
mod features;
pub mod kinematics;
pub mod statistics;

pub use error::{AssemblyError, FeatureError, StatsError};
pub use features::{
    feature_names, AssemblerConfig, FeatureAssembler, FeatureVector, FEATURE_DIMENSION,
    SUMMARISED_SERIES,
};
pub use kinematics::KinematicSeries;
pub use statistics::StatisticalFeatures;
