//! Element records stored in the arenas.

use nalgebra::Point3;
use smallvec::SmallVec;

use crate::id::{EdgeId, FaceId, HalfedgeId, VertexId};

/// Classification of an undirected edge by its face incidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Exactly two incident faces.
    Manifold,
    /// More than two incident faces.
    NonManifold,
    /// Two incident faces, marked by the user as a feature to preserve.
    Feature,
    /// Exactly one incident face.
    Boundary,
}

impl EdgeKind {
    /// Whether the edge belongs to the skeleton (boundary, feature or
    /// non-manifold).
    #[inline]
    #[must_use]
    pub const fn is_skeleton(self) -> bool {
        matches!(self, Self::NonManifold | Self::Feature | Self::Boundary)
    }
}

/// Classification of a vertex by the skeleton edges incident to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexKind {
    /// No incident skeleton edges; free to move on the surface.
    Manifold,
    /// Exactly two incident skeleton edges; may slide along its skeleton
    /// segment.
    OpenBook,
    /// One, or more than two, incident skeleton edges; position-fixed.
    SkeletonBranching,
    /// Reserved tag for externally-marked irregular vertices;
    /// position-fixed. The classifier never produces it.
    NonManifoldOther,
}

impl VertexKind {
    /// Whether operators must not move this vertex.
    #[inline]
    #[must_use]
    pub const fn is_position_fixed(self) -> bool {
        matches!(self, Self::SkeletonBranching | Self::NonManifoldOther)
    }
}

/// A vertex: position, one outgoing halfedge, classification, mark flag.
#[derive(Debug, Clone)]
pub struct Vertex {
    /// 3D position.
    pub position: Point3<f64>,
    /// One outgoing halfedge (source is this vertex), or `None` when
    /// isolated.
    pub halfedge: Option<HalfedgeId>,
    /// Classification tag; kept current by the classifier.
    pub kind: VertexKind,
    /// Scratch mark for traversals.
    pub marked: bool,
}

impl Vertex {
    pub(crate) fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            halfedge: None,
            kind: VertexKind::Manifold,
            marked: false,
        }
    }
}

/// A directed halfedge.
///
/// The source vertex is implicit: it is `prev`'s target.
#[derive(Debug, Clone, Copy)]
pub struct Halfedge {
    /// Vertex this halfedge points at.
    pub target: VertexId,
    /// The undirected edge this halfedge belongs to.
    pub edge: EdgeId,
    /// The face this halfedge bounds, or `None` while dangling.
    pub face: Option<FaceId>,
    /// Next halfedge in the face loop.
    pub next: HalfedgeId,
    /// Previous halfedge in the face loop.
    pub prev: HalfedgeId,
    /// Opposite-direction partner on the same edge, when one exists.
    /// Always `None` for boundary halfedges and for the unpaired leftovers
    /// of non-manifold edges.
    pub twin: Option<HalfedgeId>,
}

/// An undirected edge owning all halfedges associated with it.
///
/// Two entries is the manifold case; one means boundary, three or more
/// means non-manifold. The inline capacity matches the common case.
#[derive(Debug, Clone)]
pub struct Edge {
    /// One endpoint.
    pub v0: VertexId,
    /// The other endpoint.
    pub v1: VertexId,
    /// Every halfedge lying on this edge, in insertion order.
    pub halfedges: SmallVec<[HalfedgeId; 2]>,
    /// Cached intrinsic length.
    pub length: f64,
    /// Classification tag; kept current by the classifier.
    pub kind: EdgeKind,
    /// Representative halfedge for traversal (always a member of
    /// `halfedges`).
    pub halfedge: HalfedgeId,
    /// User feature mark. Survives splits; drives the `Feature`
    /// classification when the edge is otherwise manifold.
    pub feature: bool,
}

impl Edge {
    /// Number of incident faces (one per halfedge).
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.halfedges.len()
    }
}

/// A triangular face, represented by one of its halfedges.
///
/// The remaining two halfedges are reachable via `next`.
#[derive(Debug, Clone, Copy)]
pub struct Face {
    /// Representative halfedge.
    pub halfedge: HalfedgeId,
}
