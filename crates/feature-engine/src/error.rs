//! Feature Engine Error Types

use thiserror::Error;
use trajectory_model::{ClassError, ErrorKind};

/// Errors from the statistical aggregator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// Statistic requested over an empty series
    #[error("{statistic} of an empty series")]
    EmptySeries { statistic: &'static str },

    /// Coefficient of variation with a zero mean
    #[error("coef_var undefined: mean is zero")]
    ZeroMean,

    /// Percentile argument outside [0, 100]
    #[error("percentile {0} is outside [0, 100]")]
    PercentileOutOfRange(f64),
}

impl StatsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StatsError::EmptySeries { .. } => ErrorKind::MalformedInput,
            StatsError::ZeroMean => ErrorKind::DegenerateDenominator,
            StatsError::PercentileOutOfRange(_) => ErrorKind::DomainViolation,
        }
    }
}

/// Errors from kinematic estimation and feature assembly
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Trajectory too short for the requested derivation
    #[error("{quantity} needs at least {required} points, got {actual}")]
    InsufficientPoints {
        quantity: &'static str,
        required: usize,
        actual: usize,
    },

    /// Coordinate or time is NaN or infinite
    #[error("point {index} has a non-finite coordinate or time")]
    NonFinite { index: usize },

    /// Elapsed time decreases between two points
    #[error("time goes backwards at point {index}")]
    NonChronological { index: usize },

    /// Two consecutive points share a timestamp
    #[error("zero time gap between points {index} and {}", .index + 1)]
    ZeroTimeGap { index: usize },

    /// Total path length is zero
    #[error("{quantity} undefined: total distance is zero")]
    ZeroDistance { quantity: &'static str },

    /// Relative velocity change out of a standstill
    #[error("velocity rate undefined: velocity {index} is zero")]
    ZeroVelocity { index: usize },

    /// Step with no displacement has no heading
    #[error("angle undefined: no displacement between points {index} and {}", .index + 1)]
    UndefinedHeading { index: usize },

    /// Aggregation over a derived series failed
    #[error("{series}: {source}")]
    Statistic {
        series: &'static str,
        #[source]
        source: StatsError,
    },

    /// Trajectory class not in the configured class set
    #[error(transparent)]
    Class(#[from] ClassError),
}

impl FeatureError {
    /// Category of the failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            FeatureError::InsufficientPoints { .. }
            | FeatureError::NonFinite { .. }
            | FeatureError::NonChronological { .. } => ErrorKind::MalformedInput,
            FeatureError::ZeroTimeGap { .. }
            | FeatureError::ZeroDistance { .. }
            | FeatureError::ZeroVelocity { .. }
            | FeatureError::UndefinedHeading { .. } => ErrorKind::DegenerateDenominator,
            FeatureError::Statistic { source, .. } => source.kind(),
            FeatureError::Class(_) => ErrorKind::DomainViolation,
        }
    }
}

/// A feature error tagged with the trajectory it came from
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Trajectory {trajectory_id}: {source}")]
pub struct AssemblyError {
    pub trajectory_id: String,
    #[source]
    pub source: FeatureError,
}

impl AssemblyError {
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}
