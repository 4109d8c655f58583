//! Error types for the remeshing loop.

use mesh_topology::TopologyError;
use thiserror::Error;

/// Result type for remeshing operations.
pub type RemeshResult<T> = std::result::Result<T, RemeshError>;

/// Errors that abort remeshing before the loop starts.
///
/// Individual operator rejections inside the loop are never errors; the
/// loop records them in the report and continues.
#[derive(Debug, Error)]
pub enum RemeshError {
    /// The input mesh has no vertices.
    #[error("mesh has no vertices")]
    EmptyMesh,

    /// The input mesh has no faces.
    #[error("mesh has no faces")]
    NoFaces,

    /// Target edge length not positive and finite.
    #[error("invalid target edge length {0} (must be positive and finite)")]
    InvalidEdgeLength(f64),

    /// Iteration cap of zero.
    #[error("invalid iteration count {0} (must be >= 1)")]
    InvalidIterations(u32),

    /// Length ratios out of order.
    #[error("invalid edge length ratios: min {min} must be positive and below max {max}")]
    InvalidRatios {
        /// Collapse threshold as a fraction of the target.
        min: f64,
        /// Split threshold as a fraction of the target.
        max: f64,
    },

    /// Damping outside [0, 1].
    #[error("invalid smoothing damping {0} (must be within [0, 1])")]
    InvalidDamping(f64),

    /// Connectivity import failed.
    #[error(transparent)]
    Topology(#[from] TopologyError),
}
