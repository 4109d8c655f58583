//! Error types for the spatial accelerators.

use thiserror::Error;

/// Result type for spatial accelerator operations.
pub type SpatialResult<T> = Result<T, SpatialError>;

/// Errors raised by accelerator construction.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// Grid cell size must be positive and finite.
    #[error("invalid cell size {0} (must be positive and finite)")]
    InvalidCellSize(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_carries_value() {
        let err = SpatialError::InvalidCellSize(-1.0);
        assert!(format!("{err}").contains("-1"));
    }
}
