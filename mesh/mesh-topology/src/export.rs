//! Export back to the host container, with visualization variants.

use hashbrown::HashMap;
use mesh_types::{IndexedMesh, Vertex as ContainerVertex, VertexColor};

use crate::elements::VertexKind;
use crate::id::VertexId;
use crate::mesh::TriMesh;

/// Per-vertex coloring applied by [`TriMesh::to_indexed_mesh_colored`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Color by vertex classification: manifold green, open-book blue,
    /// branching red, externally-marked magenta.
    Classification,
    /// Color by the worst quality among the vertex's incident triangles,
    /// ramping red (0) to green (1).
    Quality,
}

impl TriMesh {
    /// Export live geometry to the host container.
    ///
    /// Vertices are compacted and renumbered; adjacency is preserved.
    #[must_use]
    pub fn to_indexed_mesh(&self) -> IndexedMesh {
        self.export_with(|_, _| None)
    }

    /// Export with per-vertex area-weighted normals attached.
    #[must_use]
    pub fn to_indexed_mesh_with_normals(&self) -> IndexedMesh {
        let mut container = self.export_with(|_, _| None);
        let mapping = self.vertex_mapping();
        for (v, &slot) in &mapping {
            if let Some(normal) = self.vertex_normal(*v) {
                container.vertices[slot as usize].attributes.normal = Some(normal);
            }
        }
        container
    }

    /// Export with per-vertex colors for visualization.
    #[must_use]
    pub fn to_indexed_mesh_colored(&self, mode: ColorMode) -> IndexedMesh {
        self.export_with(|mesh, v| Some(mesh.vertex_color(v, mode)))
    }

    /// Positions of every skeleton edge as line segments, six floats per
    /// edge (both endpoints), for line-set visualization.
    #[must_use]
    pub fn skeleton_positions(&self) -> Vec<f64> {
        let mut positions = Vec::new();
        for e in self.edge_ids() {
            if !self.edge(e).kind.is_skeleton() {
                continue;
            }
            let (v0, v1) = self.edge_endpoints(e);
            let p0 = self.position(v0);
            let p1 = self.position(v1);
            positions.extend_from_slice(&[p0.x, p0.y, p0.z, p1.x, p1.y, p1.z]);
        }
        positions
    }

    /// Live vertex ids mapped to their compacted export indexes.
    fn vertex_mapping(&self) -> HashMap<VertexId, u32> {
        let mut mapping = HashMap::with_capacity(self.vertex_count());
        for (slot, v) in self.vertex_ids().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            // Vertex counts are bounded by u32 by design.
            mapping.insert(v, slot as u32);
        }
        mapping
    }

    fn export_with(
        &self,
        color: impl Fn(&Self, VertexId) -> Option<VertexColor>,
    ) -> IndexedMesh {
        let mapping = self.vertex_mapping();

        let mut container = IndexedMesh::with_capacity(self.vertex_count(), self.face_count());
        for v in self.vertex_ids() {
            let mut vertex = ContainerVertex::new(self.position(v));
            vertex.attributes.color = color(self, v);
            container.vertices.push(vertex);
        }
        for f in self.face_ids() {
            let [a, b, c] = self.face_vertices(f);
            container
                .faces
                .push([mapping[&a], mapping[&b], mapping[&c]]);
        }
        container
    }

    fn vertex_color(&self, v: VertexId, mode: ColorMode) -> VertexColor {
        match mode {
            ColorMode::Classification => match self.vertex(v).kind {
                VertexKind::Manifold => VertexColor::GREEN,
                VertexKind::OpenBook => VertexColor::BLUE,
                VertexKind::SkeletonBranching => VertexColor::RED,
                VertexKind::NonManifoldOther => VertexColor::MAGENTA,
            },
            ColorMode::Quality => {
                let worst = self
                    .vertex_faces(v)
                    .into_iter()
                    .map(|f| self.face_triangle(f).quality())
                    .fold(1.0_f64, f64::min);
                #[allow(clippy::cast_possible_truncation)]
                let q = worst as f32;
                VertexColor::from_float(1.0 - q, q, 0.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashSet;
    use mesh_types::MeshTopology;

    fn quad_container() -> IndexedMesh {
        IndexedMesh::from_raw(
            &[
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                1.0, 1.0, 0.0, //
                0.0, 1.0, 0.0,
            ],
            &[0, 1, 2, 0, 2, 3],
        )
    }

    fn canonical_triangles(container: &IndexedMesh) -> HashSet<Vec<(i64, i64, i64)>> {
        // Faces as position triples (quantized), rotation-normalized, so
        // the comparison survives renumbering.
        let quantize = |x: f64| (x * 1_000_000.0).round() as i64;
        container
            .faces()
            .map(|face| {
                let mut corners: Vec<(i64, i64, i64)> = face
                    .iter()
                    .map(|&i| {
                        let p = container.vertices[i as usize].position;
                        (quantize(p.x), quantize(p.y), quantize(p.z))
                    })
                    .collect();
                let min_index = corners
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, c)| **c)
                    .map_or(0, |(i, _)| i);
                corners.rotate_left(min_index);
                corners
            })
            .collect()
    }

    #[test]
    fn round_trip_preserves_triangles() {
        let original = quad_container();
        let mesh = TriMesh::from_indexed_mesh(&original).unwrap();
        let exported = mesh.to_indexed_mesh();

        assert_eq!(exported.vertex_count(), original.vertex_count());
        assert_eq!(exported.face_count(), original.face_count());
        assert_eq!(
            canonical_triangles(&original),
            canonical_triangles(&exported)
        );
    }

    #[test]
    fn export_after_deletion_compacts_indices() {
        let mut mesh = TriMesh::from_indexed_mesh(&quad_container()).unwrap();
        let f = mesh.face_ids().next().unwrap();
        mesh.remove_face(f);

        let exported = mesh.to_indexed_mesh();
        assert_eq!(exported.face_count(), 1);
        for face in exported.faces() {
            for corner in face {
                assert!((corner as usize) < exported.vertex_count());
            }
        }
    }

    #[test]
    fn normals_point_up_for_planar_quad() {
        let mesh = TriMesh::from_indexed_mesh(&quad_container()).unwrap();
        let exported = mesh.to_indexed_mesh_with_normals();
        for vertex in &exported.vertices {
            let n = vertex.attributes.normal.unwrap();
            assert!((n.z - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn classification_colors() {
        let container = IndexedMesh::from_raw(
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0, 0.0],
            &[0, 1, 2],
        );
        let mesh = TriMesh::from_indexed_mesh(&container).unwrap();
        let exported = mesh.to_indexed_mesh_colored(ColorMode::Classification);
        // A lone triangle is all open-book vertices.
        for vertex in &exported.vertices {
            assert_eq!(vertex.attributes.color, Some(VertexColor::BLUE));
        }
    }

    #[test]
    fn quality_colors_are_green_for_good_triangles() {
        let sqrt3 = 3.0_f64.sqrt();
        let container = IndexedMesh::from_raw(
            &[0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 1.0, sqrt3, 0.0],
            &[0, 1, 2],
        );
        let mesh = TriMesh::from_indexed_mesh(&container).unwrap();
        let exported = mesh.to_indexed_mesh_colored(ColorMode::Quality);
        for vertex in &exported.vertices {
            let color = vertex.attributes.color.unwrap();
            assert!(color.g > 250);
            assert!(color.r < 5);
        }
    }

    #[test]
    fn skeleton_positions_cover_boundary() {
        let mesh = TriMesh::from_indexed_mesh(&quad_container()).unwrap();
        let positions = mesh.skeleton_positions();
        // Four boundary edges, six floats each; the diagonal is manifold
        // and excluded.
        assert_eq!(positions.len(), 24);
    }
}
