//! Structural validation of the connectivity store.

use thiserror::Error;

use crate::elements::EdgeKind;
use crate::id::{EdgeId, FaceId, HalfedgeId, VertexId};
use crate::mesh::TriMesh;
use crate::MIN_FACE_AREA;

/// An element-scoped finding from the validator.
///
/// All variants except [`TopologyIssue::DegenerateFace`] are errors that
/// make the mesh invalid; degenerate faces only warn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyIssue {
    /// A vertex's outgoing halfedge is stale or starts elsewhere.
    #[error("vertex {vertex:?}: outgoing halfedge {halfedge:?} is stale or starts elsewhere")]
    BadVertexHalfedge {
        /// The vertex with the broken reference.
        vertex: VertexId,
        /// The referenced halfedge.
        halfedge: HalfedgeId,
    },

    /// A vertex position is NaN or infinite.
    #[error("vertex {vertex:?}: position is not finite")]
    NonFinitePosition {
        /// The offending vertex.
        vertex: VertexId,
    },

    /// An edge owns no halfedges.
    #[error("edge {edge:?}: halfedge list is empty")]
    EmptyEdge {
        /// The offending edge.
        edge: EdgeId,
    },

    /// A halfedge in an edge's list does not point back at that edge.
    #[error("edge {edge:?}: member halfedge {halfedge:?} references a different edge")]
    EdgeMembershipBroken {
        /// The edge owning the list.
        edge: EdgeId,
        /// The member with the wrong back-reference.
        halfedge: HalfedgeId,
    },

    /// An edge's representative halfedge is not in its own list.
    #[error("edge {edge:?}: representative halfedge is not a member")]
    BadRepresentative {
        /// The offending edge.
        edge: EdgeId,
    },

    /// An edge's cached length is NaN, infinite or negative.
    #[error("edge {edge:?}: cached length is not a finite non-negative number")]
    BadEdgeLength {
        /// The offending edge.
        edge: EdgeId,
    },

    /// An edge's classification does not match its face count.
    #[error("edge {edge:?}: classification does not match its face count")]
    MisclassifiedEdge {
        /// The offending edge.
        edge: EdgeId,
    },

    /// A face's halfedge loop does not close after three steps, or a
    /// loop member references another face.
    #[error("face {face:?}: halfedge loop is broken")]
    BrokenFaceLoop {
        /// The offending face.
        face: FaceId,
    },

    /// `next`/`prev` are not mutually inverse at a halfedge.
    #[error("halfedge {halfedge:?}: next/prev are not mutually inverse")]
    NextPrevMismatch {
        /// The offending halfedge.
        halfedge: HalfedgeId,
    },

    /// A twin link is not reciprocal.
    #[error("halfedge {halfedge:?}: twin link is not reciprocal")]
    TwinMismatch {
        /// The offending halfedge.
        halfedge: HalfedgeId,
    },

    /// A halfedge references a dead vertex or edge.
    #[error("halfedge {halfedge:?}: references a dead element")]
    DanglingHalfedge {
        /// The offending halfedge.
        halfedge: HalfedgeId,
    },

    /// A face's area is below the degenerate threshold (warning only).
    #[error("face {face:?}: area is below the degenerate threshold")]
    DegenerateFace {
        /// The offending face.
        face: FaceId,
    },
}

/// Validation findings split into errors and warnings.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Findings that make the mesh invalid.
    pub errors: Vec<TopologyIssue>,
    /// Findings that are tolerable (degenerate faces).
    pub warnings: Vec<TopologyIssue>,
}

impl ValidationReport {
    /// Whether no errors were found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of findings.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Topology: {} ({} errors, {} warnings)",
            if self.is_valid() { "valid" } else { "INVALID" },
            self.errors.len(),
            self.warnings.len()
        )?;
        for issue in &self.errors {
            writeln!(f, "  error: {issue}")?;
        }
        for issue in &self.warnings {
            writeln!(f, "  warning: {issue}")?;
        }
        Ok(())
    }
}

/// Traverse every arena and check the store's invariants.
///
/// Checked per element:
/// - vertices: finite position; the outgoing halfedge, when present, is
///   live and starts at the vertex;
/// - edges: non-empty halfedge list whose members point back at the
///   edge, a representative inside the list, a finite non-negative
///   cached length, and a classification matching the face count;
/// - faces: the representative's three-step `next` cycle closes and
///   every loop member references the face; near-zero area warns;
/// - halfedges: `next`/`prev` mutually inverse, reciprocal twins, live
///   vertex and edge references.
#[must_use]
pub fn validate(mesh: &TriMesh) -> ValidationReport {
    let mut report = ValidationReport::default();

    for v in mesh.vertex_ids() {
        let vertex = mesh.vertex(v);
        let p = vertex.position;
        if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
            report.errors.push(TopologyIssue::NonFinitePosition { vertex: v });
        }
        if let Some(h) = vertex.halfedge {
            if !mesh.contains_halfedge(h) || mesh.source(h) != v {
                report
                    .errors
                    .push(TopologyIssue::BadVertexHalfedge { vertex: v, halfedge: h });
            }
        }
    }

    for e in mesh.edge_ids() {
        let edge = mesh.edge(e);
        if edge.halfedges.is_empty() {
            report.errors.push(TopologyIssue::EmptyEdge { edge: e });
            continue;
        }
        for &h in &edge.halfedges {
            if !mesh.contains_halfedge(h) || mesh.halfedge(h).edge != e {
                report
                    .errors
                    .push(TopologyIssue::EdgeMembershipBroken { edge: e, halfedge: h });
            }
        }
        if !edge.halfedges.contains(&edge.halfedge) {
            report.errors.push(TopologyIssue::BadRepresentative { edge: e });
        }
        if !edge.length.is_finite() || edge.length < 0.0 {
            report.errors.push(TopologyIssue::BadEdgeLength { edge: e });
        }

        let expected = match edge.halfedges.len() {
            1 => EdgeKind::Boundary,
            2 => {
                if edge.feature {
                    EdgeKind::Feature
                } else {
                    EdgeKind::Manifold
                }
            }
            _ => EdgeKind::NonManifold,
        };
        if edge.kind != expected {
            report.errors.push(TopologyIssue::MisclassifiedEdge { edge: e });
        }
    }

    for f in mesh.face_ids() {
        let h0 = mesh.face(f).halfedge;
        if !mesh.contains_halfedge(h0) {
            report.errors.push(TopologyIssue::BrokenFaceLoop { face: f });
            continue;
        }
        let h1 = mesh.next(h0);
        let h2 = mesh.next(h1);
        if mesh.next(h2) != h0 {
            report.errors.push(TopologyIssue::BrokenFaceLoop { face: f });
            continue;
        }
        if [h0, h1, h2]
            .iter()
            .any(|&h| mesh.halfedge(h).face != Some(f))
        {
            report.errors.push(TopologyIssue::BrokenFaceLoop { face: f });
            continue;
        }
        if mesh.face_area(f) < MIN_FACE_AREA {
            report.warnings.push(TopologyIssue::DegenerateFace { face: f });
        }
    }

    for h in mesh.halfedge_ids() {
        let halfedge = mesh.halfedge(h);
        if !mesh.contains_vertex(halfedge.target) || !mesh.contains_edge(halfedge.edge) {
            report.errors.push(TopologyIssue::DanglingHalfedge { halfedge: h });
            continue;
        }
        if mesh.prev(mesh.next(h)) != h || mesh.next(mesh.prev(h)) != h {
            report.errors.push(TopologyIssue::NextPrevMismatch { halfedge: h });
        }
        if let Some(t) = halfedge.twin {
            if !mesh.contains_halfedge(t) || mesh.twin(t) != Some(h) {
                report.errors.push(TopologyIssue::TwinMismatch { halfedge: h });
            }
        }
    }

    report
}
