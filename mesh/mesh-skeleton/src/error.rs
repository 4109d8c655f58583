//! Error types for skeleton queries.

use thiserror::Error;

/// Result type for skeleton operations.
pub type SkeletonResult<T> = Result<T, SkeletonError>;

/// Errors raised by skeleton queries.
#[derive(Debug, Error)]
pub enum SkeletonError {
    /// A segment index beyond the extracted segment list.
    #[error("segment index {index} out of range ({count} segments)")]
    SegmentOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of extracted segments.
        count: usize,
    },

    /// A projection was requested against a segment with no geometry.
    #[error("segment {index} has no edges to project onto")]
    EmptySegment {
        /// The segment in question.
        index: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_carries_counts() {
        let err = SkeletonError::SegmentOutOfRange { index: 4, count: 2 };
        assert!(format!("{err}").contains('4'));
        assert!(format!("{err}").contains('2'));
    }
}
