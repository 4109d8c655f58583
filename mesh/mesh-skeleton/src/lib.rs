//! Skeleton extraction for non-manifold triangle surfaces.
//!
//! The *skeleton* of a surface is the union of its boundary, feature and
//! non-manifold edges, together with the vertices they touch. This crate
//! partitions the skeleton edge set into [`SkeletonSegment`]s: maximal
//! paths running between branching vertices, plus closed loops that
//! contain no branching vertex at all. Each segment is parameterized by
//! cumulative arc length, so points can be projected onto it and
//! open-book vertices can slide along it during remeshing.
//!
//! Segments are derived data. They reference mesh entities by id but own
//! nothing, and they are rebuilt on demand after the topology changes.
//!
//! # Example
//!
//! ```
//! use mesh_types::IndexedMesh;
//! use mesh_topology::TriMesh;
//! use mesh_skeleton::Skeleton;
//!
//! // A lone triangle: its three boundary edges form one closed loop.
//! let container = IndexedMesh::from_raw(
//!     &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0, 0.0],
//!     &[0, 1, 2],
//! );
//! let mesh = TriMesh::from_indexed_mesh(&container)?;
//! let skeleton = Skeleton::extract(&mesh);
//!
//! assert_eq!(skeleton.segment_count(), 1);
//! assert!(skeleton.segments[0].closed);
//! # Ok::<(), mesh_topology::TopologyError>(())
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod segment;
mod skeleton;

pub use error::{SkeletonError, SkeletonResult};
pub use segment::{SegmentProjection, SkeletonSegment};
pub use skeleton::{Skeleton, SkeletonProjection};
