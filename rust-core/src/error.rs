use thiserror::Error;

/// Errors raised by unit cell construction and reduction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReductionError {
    /// Lengths/angles that do not describe a positive-definite metric
    #[error("Corrupt unit cell parameters {parameters:?}: {reason}")]
    CorruptUnitCell { parameters: [f64; 6], reason: String },

    /// Metrical matrix entries that are not positive definite
    #[error("Corrupt metrical matrix {entries:?}: {reason}")]
    CorruptMetricalMatrix { entries: [f64; 6], reason: String },

    /// An elementary action broke the state invariants
    #[error("Internal inconsistency after {action}: {detail}")]
    InternalInconsistency { action: &'static str, detail: String },

    #[error("Iteration limit exceeded ({limit})")]
    IterationLimitExceeded { limit: usize },
}
