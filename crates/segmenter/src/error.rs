//! Segmentation Error Types

use thiserror::Error;
use trajectory_model::ErrorKind;

/// Errors raised while segmenting a subject's log
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentError {
    /// A point is timestamped before its predecessor
    #[error("Subject {subject}: point {index} is earlier than the point before it")]
    NonChronologicalPoints { subject: String, index: usize },

    /// A label interval starts before the previous one
    #[error("Subject {subject}: label interval {index} starts before the interval before it")]
    UnorderedIntervals { subject: String, index: usize },

    /// A label interval ends before it starts
    #[error("Subject {subject}: label interval {index} ends before it starts")]
    InvertedInterval { subject: String, index: usize },
}

impl SegmentError {
    /// Subject whose log was rejected
    pub fn subject(&self) -> &str {
        match self {
            SegmentError::NonChronologicalPoints { subject, .. }
            | SegmentError::UnorderedIntervals { subject, .. }
            | SegmentError::InvertedInterval { subject, .. } => subject,
        }
    }

    /// Every segmentation failure is a malformed log
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::MalformedInput
    }
}
