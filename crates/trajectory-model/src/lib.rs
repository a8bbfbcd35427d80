//! Trajectory Data Model
//!
//! Types shared by the segmenter, the feature engine and the storage layer.

mod class;
mod kind;
mod point;
mod trajectory;

pub use class::{ClassError, ClassSet, DEFAULT_CLASSES};
pub use kind::ErrorKind;
pub use point::{LabelInterval, RawPoint, SubjectLog};
pub use trajectory::{Trajectory, TrajectoryPoint};
