//! Two-cursor segmentation of a point stream against label intervals

use crate::error::SegmentError;
use rayon::prelude::*;
use tracing::{debug, info, warn};
use trajectory_model::{LabelInterval, RawPoint, SubjectLog, Trajectory, TrajectoryPoint};

/// Bookkeeping for a single segmentation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentStats {
    /// Points in the input stream
    pub points_total: usize,
    /// Points that ended up in some trajectory
    pub points_assigned: usize,
    /// Points outside every interval
    pub points_dropped: usize,
    /// Intervals that matched no point
    pub empty_intervals: usize,
}

/// Output of segmenting one subject
#[derive(Debug, Clone, Default)]
pub struct Segmentation {
    pub subject_id: String,
    /// Trajectories in label-interval order
    pub trajectories: Vec<Trajectory>,
    pub stats: SegmentStats,
}

impl Segmentation {
    pub fn into_trajectories(self) -> Vec<Trajectory> {
        self.trajectories
    }
}

fn validate(
    subject_id: &str,
    points: &[RawPoint],
    labels: &[LabelInterval],
) -> Result<(), SegmentError> {
    if let Some(index) = points
        .windows(2)
        .position(|w| w[1].timestamp < w[0].timestamp)
    {
        return Err(SegmentError::NonChronologicalPoints {
            subject: subject_id.to_string(),
            index: index + 1,
        });
    }

    if let Some(index) = labels.iter().position(|l| l.end < l.start) {
        return Err(SegmentError::InvertedInterval {
            subject: subject_id.to_string(),
            index,
        });
    }

    if let Some(index) = labels.windows(2).position(|w| w[1].start < w[0].start) {
        return Err(SegmentError::UnorderedIntervals {
            subject: subject_id.to_string(),
            index: index + 1,
        });
    }

    Ok(())
}

/// Moves the buffered points into a trajectory for interval `k`.
/// An empty buffer emits nothing.
fn flush(
    subject_id: &str,
    k: usize,
    interval: &LabelInterval,
    buffer: &mut Vec<TrajectoryPoint>,
    out: &mut Vec<Trajectory>,
) {
    if buffer.is_empty() {
        debug!("Subject {}: interval {} ({}) matched no points", subject_id, k, interval.mode);
        return;
    }

    let points = std::mem::take(buffer);
    debug!(
        "Subject {}: interval {} ({}) -> {} points",
        subject_id,
        k,
        interval.mode,
        points.len()
    );
    out.push(Trajectory::new(
        format!("{}_{}", subject_id, k),
        interval.mode.clone(),
        points,
    ));
}

/// Segment one subject's chronologically ordered points into trajectories.
///
/// Each point is assigned to the current interval when it lies inside it,
/// dropped when it precedes it, and otherwise closes the current interval
/// and is re-tested against the next one. Points after the last interval
/// are dropped. Timestamps are stored as seconds since the interval start.
pub fn segment(
    subject_id: &str,
    points: &[RawPoint],
    labels: &[LabelInterval],
) -> Result<Segmentation, SegmentError> {
    validate(subject_id, points, labels)?;

    let mut trajectories = Vec::new();
    let mut buffer: Vec<TrajectoryPoint> = Vec::new();
    let mut k = 0;

    'points: for point in points {
        loop {
            let Some(interval) = labels.get(k) else {
                break 'points;
            };

            if point.timestamp < interval.start {
                continue 'points;
            }

            if point.timestamp <= interval.end {
                buffer.push(TrajectoryPoint::new(
                    point.latitude,
                    point.longitude,
                    interval.elapsed_secs(point.timestamp),
                ));
                continue 'points;
            }

            flush(subject_id, k, interval, &mut buffer, &mut trajectories);
            k += 1;
        }
    }

    if let Some(interval) = labels.get(k) {
        flush(subject_id, k, interval, &mut buffer, &mut trajectories);
    }

    let points_assigned: usize = trajectories.iter().map(|t| t.len()).sum();
    let stats = SegmentStats {
        points_total: points.len(),
        points_assigned,
        points_dropped: points.len() - points_assigned,
        empty_intervals: labels.len() - trajectories.len(),
    };

    debug!(
        "Subject {}: {} trajectories, {} of {} points dropped",
        subject_id,
        trajectories.len(),
        stats.points_dropped,
        stats.points_total
    );

    Ok(Segmentation {
        subject_id: subject_id.to_string(),
        trajectories,
        stats,
    })
}

/// Segment many subjects in parallel. Results keep the input order and a
/// failing subject does not affect the others.
pub fn segment_subjects(subjects: &[SubjectLog]) -> Vec<Result<Segmentation, SegmentError>> {
    let results: Vec<_> = subjects
        .par_iter()
        .map(|log| segment(&log.subject_id, &log.points, &log.labels))
        .collect();

    let mut trajectories = 0;
    for result in &results {
        match result {
            Ok(seg) => trajectories += seg.trajectories.len(),
            Err(e) => warn!("Skipping subject {}: {}", e.subject(), e),
        }
    }
    info!(
        "Segmented {} subjects into {} trajectories",
        subjects.len(),
        trajectories
    );

    results
}
