//! Error taxonomy shared across the pipeline crates

use serde::{Deserialize, Serialize};

/// Broad category of a per-item failure, used by batch callers to decide
/// how to report a skipped item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Out-of-order samples or too few points for a derivation
    MalformedInput,
    /// Division by a zero distance, time gap or displacement
    DegenerateDenominator,
    /// Argument outside its contract (percentile range, unknown class)
    DomainViolation,
}
