//! Traits shared by mesh representations.

use crate::{Aabb, Triangle, Vertex};
use nalgebra::Point3;

/// Minimal read access to a triangle mesh.
///
/// Algorithms that only need vertices and faces are written against this
/// trait so they work with any container that can produce them.
pub trait MeshTopology {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Number of triangle faces.
    fn face_count(&self) -> usize;

    /// Whether the mesh holds no usable geometry.
    fn is_empty(&self) -> bool {
        self.vertex_count() == 0 || self.face_count() == 0
    }

    /// Vertex by index, `None` when out of bounds.
    fn vertex(&self, index: usize) -> Option<&Vertex>;

    /// Face by index as a vertex index triple, `None` when out of bounds.
    fn face(&self, index: usize) -> Option<[u32; 3]>;

    /// Face by index with resolved vertex positions.
    fn triangle(&self, face_index: usize) -> Option<Triangle>;

    /// Iterate over all vertices.
    fn vertices(&self) -> impl Iterator<Item = &Vertex>;

    /// Iterate over all faces as index triples.
    fn faces(&self) -> impl Iterator<Item = [u32; 3]>;

    /// Iterate over all faces with resolved positions.
    fn triangles(&self) -> impl Iterator<Item = Triangle>;
}

/// Bounding-box access.
pub trait MeshBounds {
    /// Axis-aligned bounding box; empty when there are no vertices.
    fn bounds(&self) -> Aabb;

    /// Bounding box, or `None` when empty.
    fn bounds_opt(&self) -> Option<Aabb> {
        let b = self.bounds();
        if b.is_empty() {
            None
        } else {
            Some(b)
        }
    }

    /// Center of the bounding box.
    fn center(&self) -> Point3<f64> {
        self.bounds().center()
    }
}
