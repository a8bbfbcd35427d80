//! Raw device samples and ground-truth label intervals

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single GPS fix as logged by the device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

impl RawPoint {
    pub fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            timestamp,
        }
    }
}

/// Ground-truth activity label covering `[start, end]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Transportation mode, e.g. "walk" or "bus"
    pub mode: String,
}

impl LabelInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, mode: impl Into<String>) -> Self {
        Self {
            start,
            end,
            mode: mode.into(),
        }
    }

    /// Whether `timestamp` falls inside the interval (both ends inclusive)
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }

    /// Seconds elapsed between the interval start and `timestamp`
    pub fn elapsed_secs(&self, timestamp: DateTime<Utc>) -> f64 {
        (timestamp - self.start).num_milliseconds() as f64 / 1000.0
    }
}

/// Everything recorded for one subject: the point stream and its labels
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectLog {
    pub subject_id: String,
    /// Chronologically ordered fixes
    pub points: Vec<RawPoint>,
    /// Intervals ordered ascending by start
    pub labels: Vec<LabelInterval>,
}

impl SubjectLog {
    pub fn new(
        subject_id: impl Into<String>,
        points: Vec<RawPoint>,
        labels: Vec<LabelInterval>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            points,
            labels,
        }
    }
}
