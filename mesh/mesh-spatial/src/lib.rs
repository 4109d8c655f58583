//! Spatial accelerators for mesh processing.
//!
//! Two structures with deliberately small contracts:
//!
//! - [`SpatialHashGrid`] - a uniform grid over hashed cells for dynamic
//!   point sets: insert, remove, move, then query by radius or k-nearest.
//!   Items are identified by a caller-chosen key type.
//! - [`Bvh`] - a static bounding-volume hierarchy over triangles for
//!   closest-point-on-mesh and radius queries. Built once; any
//!   topological change to the source mesh invalidates it (rebuild).
//!
//! # Example
//!
//! ```
//! use mesh_spatial::SpatialHashGrid;
//! use nalgebra::Point3;
//!
//! let mut grid = SpatialHashGrid::new(1.0)?;
//! grid.insert(7u32, Point3::new(0.1, 0.0, 0.0));
//! grid.insert(8u32, Point3::new(5.0, 0.0, 0.0));
//!
//! let near = grid.query_radius(&Point3::origin(), 1.0);
//! assert_eq!(near, vec![7]);
//! # Ok::<(), mesh_spatial::SpatialError>(())
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod bvh;
mod error;
mod grid;

pub use bvh::{Bvh, BvhStats, ClosestHit};
pub use error::{SpatialError, SpatialResult};
pub use grid::SpatialHashGrid;
