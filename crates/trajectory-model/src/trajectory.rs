//! Labeled trajectory segments

use serde::{Deserialize, Serialize};

/// One row of a trajectory: position plus seconds since the label start
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// Latitude
    pub x: f64,
    /// Longitude
    pub y: f64,
    /// Seconds elapsed since the owning interval's start
    pub t: f64,
}

impl TrajectoryPoint {
    pub fn new(x: f64, y: f64, t: f64) -> Self {
        Self { x, y, t }
    }
}

impl From<(f64, f64, f64)> for TrajectoryPoint {
    fn from((x, y, t): (f64, f64, f64)) -> Self {
        Self { x, y, t }
    }
}

/// A bounded, single-mode sequence of points produced by the segmenter.
///
/// Always holds at least one point. The segmenter only emits non-empty
/// buffers and the storage layer rejects empty tables before building one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    /// `<subject>_<interval index>`
    pub id: String,
    /// Transportation mode of the matching label interval
    pub mode: String,
    pub points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    pub fn new(id: impl Into<String>, mode: impl Into<String>, points: Vec<TrajectoryPoint>) -> Self {
        let id = id.into();
        debug_assert!(!points.is_empty(), "trajectory {} has no points", id);
        Self {
            id,
            mode: mode.into(),
            points,
        }
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total covered time in seconds
    pub fn duration(&self) -> f64 {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => last.t - first.t,
            _ => 0.0,
        }
    }

    /// Mean time between consecutive samples, `None` below two points
    pub fn mean_interval(&self) -> Option<f64> {
        if self.points.len() < 2 {
            return None;
        }
        Some(self.duration() / (self.points.len() - 1) as f64)
    }
}
