//! Dataset Selection
//!
//! Decides which trajectories enter the dataset: class names are aliased
//! onto a fixed class set, then short or sparsely sampled trajectories are
//! rejected.

mod candidate;
mod error;
mod selection;

pub use candidate::Candidate;
pub use error::FilterError;
pub use selection::{DatasetFilter, FilterConfig, Rejection, SelectionReport};
