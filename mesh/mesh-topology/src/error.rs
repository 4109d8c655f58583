//! Error types for connectivity construction and the local operators.

use thiserror::Error;

use crate::id::{EdgeId, HalfedgeId, VertexId};

/// Result type for topology operations.
pub type TopologyResult<T> = Result<T, TopologyError>;

/// Errors raised by connectivity construction and the local operators.
///
/// Operator rejections are expected outcomes, not fatal conditions; the
/// remeshing loop and the repair pipeline record them and move on.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// Import validation failed: bad index buffer or non-finite position.
    #[error("malformed input: {reason}")]
    MalformedInput {
        /// What was wrong with the input.
        reason: String,
    },

    /// Edge collapse rejected: the neighborhoods of the endpoints overlap
    /// in more vertices than the shared faces account for, so collapsing
    /// would fold the surface.
    #[error("collapse of edge {edge:?} violates the link condition")]
    LinkConditionViolated {
        /// The edge whose collapse was rejected.
        edge: EdgeId,
    },

    /// Edge collapse rejected: both endpoints are position-fixed.
    #[error("collapse of edge {edge:?} rejected: both endpoints are position-fixed")]
    PinnedCollapse {
        /// The edge whose collapse was rejected.
        edge: EdgeId,
    },

    /// Edge flip rejected (wrong classification, non-convex quad,
    /// existing diagonal, or a degenerate configuration).
    #[error("edge {edge:?} cannot be flipped: {reason}")]
    NotFlippable {
        /// The edge whose flip was rejected.
        edge: EdgeId,
        /// Why the flip was rejected.
        reason: &'static str,
    },

    /// Vertex relocation rejected: an incident face would collapse below
    /// the minimum area.
    #[error("relocating vertex {vertex:?} would create a degenerate face")]
    RelocationInvalid {
        /// The vertex whose relocation was rejected.
        vertex: VertexId,
    },

    /// An operator could not find an expected next/prev/twin relation;
    /// the surrounding connectivity is corrupted and the operator
    /// declines.
    #[error("halfedge {halfedge:?} is missing a required neighbor")]
    MissingNeighbor {
        /// The halfedge with the broken relation.
        halfedge: HalfedgeId,
    },

    /// A vertex removal was requested while faces still reference the
    /// vertex.
    #[error("vertex {vertex:?} still has incident edges")]
    VertexInUse {
        /// The vertex that is still referenced.
        vertex: VertexId,
    },
}
