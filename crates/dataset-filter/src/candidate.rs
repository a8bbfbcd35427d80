//! Items the filter can judge without loading point data

use storage::CatalogEntry;
use trajectory_model::Trajectory;

/// Summary of a trajectory as seen by the filter
pub trait Candidate {
    fn class(&self) -> &str;
    fn length(&self) -> usize;
    /// Mean seconds between samples
    fn mean_dt(&self) -> Option<f64>;
    /// Replace the class label with its canonical name
    fn set_class(&mut self, class: String);
}

impl Candidate for CatalogEntry {
    fn class(&self) -> &str {
        &self.class
    }

    fn length(&self) -> usize {
        self.length
    }

    fn mean_dt(&self) -> Option<f64> {
        self.mean_dt
    }

    fn set_class(&mut self, class: String) {
        self.class = class;
    }
}

impl Candidate for Trajectory {
    fn class(&self) -> &str {
        &self.mode
    }

    fn length(&self) -> usize {
        self.len()
    }

    fn mean_dt(&self) -> Option<f64> {
        self.mean_interval()
    }

    fn set_class(&mut self, class: String) {
        self.mode = class;
    }
}
