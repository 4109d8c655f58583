//! Core geometry types for the mesh workspace.
//!
//! This crate provides the foundation the rest of the workspace builds on:
//!
//! - [`IndexedMesh`] - the host geometry container: a position buffer plus
//!   a triangle index buffer
//! - [`Vertex`] - a point in 3D space with optional attributes
//! - [`Triangle`] - a concrete triangle with the geometric predicates used
//!   by repair and remeshing (area, normal, quality, circumradius,
//!   inradius, closest point)
//! - [`Aabb`] - axis-aligned bounding box
//!
//! The container is the only exchange format at the workspace boundary:
//! callers hand in positions and triangle indices, and get the same shape
//! back, optionally with normals and per-vertex colors attached.
//!
//! # Units and coordinates
//!
//! All coordinates are `f64` and unit-agnostic. The coordinate system is
//! right-handed; faces wind counter-clockwise when viewed from outside,
//! so normals point outward by the right-hand rule.
//!
//! # Example
//!
//! ```
//! use mesh_types::{IndexedMesh, Vertex, MeshTopology};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(0.5, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!(!mesh.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod mesh;
mod traits;
mod triangle;
mod vertex;

pub use bounds::Aabb;
pub use mesh::{unit_cube, IndexedMesh};
pub use traits::{MeshBounds, MeshTopology};
pub use triangle::Triangle;
pub use vertex::{Vertex, VertexAttributes, VertexColor};

// Re-export nalgebra types so downstream crates share one math vocabulary.
pub use nalgebra::{Point3, Vector3};
