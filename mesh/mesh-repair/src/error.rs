//! Error types for repair operations.

use thiserror::Error;

/// Result type for repair operations.
pub type RepairResult<T> = Result<T, RepairError>;

/// Errors raised by repair operations.
///
/// The pipeline itself never aborts on these; they surface through the
/// standalone entry points and as downgraded report rows.
#[derive(Debug, Error)]
pub enum RepairError {
    /// A hole could not be triangulated.
    #[error("failed to fill hole: {reason}")]
    HoleFillFailed {
        /// Why triangulation gave up.
        reason: String,
    },

    /// Post-repair validation found structural errors.
    #[error("topology validation failed with {error_count} errors")]
    ValidationFailed {
        /// Number of structural errors found.
        error_count: usize,
    },
}
