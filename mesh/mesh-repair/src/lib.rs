//! Repair operations for triangle surfaces that may be non-manifold.
//!
//! Each repair is a [`RepairOperation`]: `detect` counts defects,
//! `repair` fixes them, and `execute` does both while collecting timed
//! statistics. The operations:
//!
//! - [`IsolatedVertexRemoval`] - vertices no face references
//! - [`DegenerateFaceRemoval`] - near-zero area or repeated-vertex faces
//! - [`DuplicateFaceRemoval`] - faces sharing the same vertex triple
//! - [`NonManifoldEdgeRepair`] - edges bounded by more than two faces,
//!   fixed by splitting off extra fans or deleting them
//! - [`HoleFiller`] - boundary loops closed by ear clipping
//! - [`NormalUnifier`] - face orientations unified by a flood fill
//!
//! [`repair_all`] composes them in a fixed order and aggregates a
//! [`RepairReport`]; a single failing step downgrades the report instead
//! of aborting the pipeline.
//!
//! # Example
//!
//! ```
//! use mesh_topology::TriMesh;
//! use mesh_repair::{repair_all, RepairOptions};
//!
//! // A triangle plus a vertex nothing references.
//! let mut mesh = TriMesh::from_raw(
//!     &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0, 0.0, 9.0, 9.0, 9.0],
//!     &[0, 1, 2],
//! )?;
//!
//! let report = repair_all(&mut mesh, &RepairOptions::default());
//! assert!(report.success);
//! assert_eq!(mesh.vertex_count(), 3);
//! # Ok::<(), mesh_topology::TopologyError>(())
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod degenerate;
mod duplicate;
mod error;
mod holes;
mod isolated;
mod nonmanifold;
mod normals;
mod operation;
mod pipeline;

pub use degenerate::DegenerateFaceRemoval;
pub use duplicate::DuplicateFaceRemoval;
pub use error::{RepairError, RepairResult};
pub use holes::{detect_boundary_loops, fill_holes, BoundaryLoop, HoleFiller};
pub use isolated::IsolatedVertexRemoval;
pub use nonmanifold::{NonManifoldEdgeRepair, NonManifoldStrategy};
pub use normals::NormalUnifier;
pub use operation::{RepairOperation, RepairStats};
pub use pipeline::{repair_all, RepairOptions, RepairReport};
