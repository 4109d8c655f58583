//! Halfedge connectivity for triangle surfaces that may be non-manifold.
//!
//! Classical halfedge structures assume every edge bounds at most two
//! faces. Real scan and CAD data breaks that assumption: edges shared by
//! three or more triangles, edges bounding a single triangle, and
//! user-marked feature edges all occur. This crate generalizes the
//! halfedge representation past the two-face limit:
//!
//! - every [`Edge`] owns the full list of its halfedges instead of a pair;
//! - twins are partial: halfedges are paired by direction, and leftovers
//!   on over-populated edges simply have no twin;
//! - edges and vertices carry classification tags ([`EdgeKind`],
//!   [`VertexKind`]) derived from the incidence structure.
//!
//! On top of the store, this crate provides the local topological
//! operators that repair and remeshing are built from: edge split, edge
//! collapse (guarded by the link condition), edge flip (guarded by a
//! convex-quad test), tangential vertex relocation, and a Delaunay flip
//! pass. A structural validator checks the store's invariants.
//!
//! # Example
//!
//! ```
//! use mesh_types::IndexedMesh;
//! use mesh_topology::TriMesh;
//!
//! let container = IndexedMesh::from_raw(
//!     &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0, 0.0],
//!     &[0, 1, 2],
//! );
//! let mesh = TriMesh::from_indexed_mesh(&container)?;
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!(mesh.is_manifold());
//! assert!(mesh.has_boundary());
//! # Ok::<(), mesh_topology::TopologyError>(())
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod arena;
mod elements;
mod error;
mod export;
mod id;
mod import;
mod mesh;
mod ops;
mod stats;
mod validate;

pub use elements::{Edge, EdgeKind, Face, Halfedge, Vertex, VertexKind};
pub use error::{TopologyError, TopologyResult};
pub use export::ColorMode;
pub use id::{EdgeId, FaceId, HalfedgeId, VertexId};
pub use mesh::TriMesh;
pub use stats::MeshStatistics;
pub use validate::{validate, TopologyIssue, ValidationReport};

/// Area below which a face counts as degenerate for operator guards.
pub const MIN_FACE_AREA: f64 = 1e-10;
