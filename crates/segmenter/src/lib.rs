//! Trajectory Segmentation
//!
//! Reconciles a subject's raw point stream with its label intervals and
//! emits one trajectory per interval that matched at least one point.

mod error;
mod segment;

pub use error::SegmentError;
pub use segment::{segment, segment_subjects, SegmentStats, Segmentation};
