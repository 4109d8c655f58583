//! Adaptive remeshing for triangle surfaces that may be non-manifold.
//!
//! The loop drives triangle edge lengths toward a target by composing
//! the local operators of `mesh-topology`:
//!
//! - **Split** edges longer than `target x max_ratio` at their midpoint
//! - **Collapse** edges shorter than `target x min_ratio` that pass the
//!   link condition
//! - **Flip** edges that violate the local Delaunay condition
//! - **Smooth** vertices tangentially, with open-book vertices sliding
//!   along their skeleton segments and branching vertices pinned
//!
//! Skeleton geometry (boundary, feature and non-manifold edges) survives
//! remeshing: splits inherit feature marks, collapses prefer skeleton
//! vertices as survivors, and smoothing projects skeleton vertices back
//! onto their segments. The loop stops when the mean triangle quality
//! settles or the iteration cap is reached.
//!
//! # Example
//!
//! ```
//! use mesh_types::IndexedMesh;
//! use mesh_remesh::{remesh, RemeshParams};
//!
//! let container = IndexedMesh::from_raw(
//!     &[0.0, 0.0, 0.0, 4.0, 0.0, 0.0, 2.0, 3.0, 0.0],
//!     &[0, 1, 2],
//! );
//!
//! let params = RemeshParams::with_edge_length(1.0).with_iterations(3);
//! let output = remesh(&container, &params)?;
//!
//! assert!(output.mesh.faces.len() > 1);
//! assert!(output.report.splits > 0);
//! # Ok::<(), mesh_remesh::RemeshError>(())
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod params;
mod remesh;
mod result;

pub use error::{RemeshError, RemeshResult};
pub use params::RemeshParams;
pub use remesh::{remesh, remesh_mesh};
pub use result::{EdgeStatistics, RemeshOutput, RemeshReport};
