//! Filter Error Types

use thiserror::Error;

/// Errors in a filter configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// Numeric bound outside its allowed range
    #[error("{field} value {value} must be positive")]
    NonPositive { field: &'static str, value: f64 },

    /// Alias pointing at a class that is not accepted
    #[error("Alias '{alias}' maps to '{target}', which is not an accepted class")]
    AliasTarget { alias: String, target: String },

    /// No accepted classes
    #[error("Class set is empty")]
    NoClasses,
}
