//! Repair and adaptive remeshing for triangle surfaces that may be
//! non-manifold.
//!
//! This umbrella crate re-exports the workspace's crates behind one
//! name, plus a [`prelude`] with the types most code needs.
//!
//! # Module organization
//!
//! ## Foundation
//! - [`types`] - host container and geometric kernel: `IndexedMesh`,
//!   `Vertex`, `Triangle`, `Aabb`
//! - [`topology`] - the non-manifold halfedge store `TriMesh`, its
//!   classifier, local operators and validator
//!
//! ## Structure
//! - [`skeleton`] - boundary/feature/non-manifold skeleton segments with
//!   arc-length parameterization
//!
//! ## Algorithms
//! - [`remesh`] - adaptive remeshing toward a target edge length
//! - [`repair`] - defect detection and repair pipeline
//!
//! ## Acceleration
//! - [`spatial`] - uniform hash grid and triangle BVH
//!
//! # Quick start
//!
//! ```
//! use mesh::prelude::*;
//!
//! // Host container in, connectivity out.
//! let container = IndexedMesh::from_raw(
//!     &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0, 0.0],
//!     &[0, 1, 2],
//! );
//! let mut tri_mesh = TriMesh::from_indexed_mesh(&container)?;
//!
//! // Repair, validate, export.
//! let report = repair_all(&mut tri_mesh, &RepairOptions::default());
//! assert!(report.success);
//! assert!(validate(&tri_mesh).is_valid());
//! let round_tripped = tri_mesh.to_indexed_mesh();
//! assert_eq!(round_tripped.faces.len(), 1);
//! # Ok::<(), mesh::topology::TopologyError>(())
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

/// Host container and geometric kernel.
pub use mesh_types as types;

/// Non-manifold halfedge connectivity, operators and validator.
pub use mesh_topology as topology;

/// Skeleton segments and parameterization.
pub use mesh_skeleton as skeleton;

/// Adaptive remeshing loop.
pub use mesh_remesh as remesh;

/// Repair operations and pipeline.
pub use mesh_repair as repair;

/// Spatial accelerators.
pub use mesh_spatial as spatial;

/// Common imports.
pub mod prelude {
    pub use mesh_remesh::{remesh, RemeshParams};
    pub use mesh_repair::{repair_all, RepairOperation, RepairOptions};
    pub use mesh_skeleton::Skeleton;
    pub use mesh_spatial::{Bvh, SpatialHashGrid};
    pub use mesh_topology::{validate, EdgeKind, TriMesh, VertexKind};
    pub use mesh_types::{Aabb, IndexedMesh, MeshBounds, MeshTopology, Triangle, Vertex};
}
