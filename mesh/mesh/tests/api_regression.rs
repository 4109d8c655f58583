//! End-to-end scenarios over the public API.
//!
//! These pin the behaviors the workspace promises: classification of
//! canonical inputs, repair outcomes, and an adaptive remesh that
//! preserves surface area while keeping marked features.

use mesh::prelude::*;
use mesh::repair::{DegenerateFaceRemoval, DuplicateFaceRemoval, IsolatedVertexRemoval};

fn import(positions: &[f64], indices: &[u32]) -> TriMesh {
    TriMesh::from_indexed_mesh(&IndexedMesh::from_raw(positions, indices)).unwrap()
}

#[test]
fn single_triangle_classification() {
    let mesh = import(
        &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0, 0.0],
        &[0, 1, 2],
    );

    assert!(mesh.is_manifold());
    assert!(mesh.has_boundary());
    assert_eq!(mesh.euler_characteristic(), 1);

    let stats = mesh.statistics();
    assert_eq!(stats.boundary_edges, 3);
    assert_eq!(stats.non_manifold_edges, 0);
    assert_eq!(stats.open_book_vertices, 3);
}

#[test]
fn two_triangle_quad_classification() {
    let mesh = import(
        &[
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            1.0, 1.0, 0.0, //
            0.0, 1.0, 0.0,
        ],
        &[0, 1, 2, 0, 2, 3],
    );

    assert!(mesh.is_manifold());
    let stats = mesh.statistics();
    assert_eq!(stats.boundary_edges, 4);
    assert_eq!(stats.manifold_edges, 1);
    assert_eq!(stats.non_manifold_edges, 0);
}

#[test]
fn non_manifold_seam_classification() {
    let mesh = import(
        &[
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.5, 1.0, 0.0, //
            0.5, -1.0, 0.0, //
            0.5, 0.5, 1.0,
        ],
        &[0, 1, 2, 0, 1, 3, 0, 1, 4],
    );

    assert!(!mesh.is_manifold());
    let shared = mesh
        .edge_between(
            mesh.vertex_ids().next().unwrap(),
            mesh.vertex_ids().nth(1).unwrap(),
        )
        .unwrap();
    assert_eq!(mesh.edge(shared).face_count(), 3);
    assert_eq!(mesh.edge(shared).kind, EdgeKind::NonManifold);
}

#[test]
fn isolated_vertex_repair_scenario() {
    let mut mesh = import(
        &[
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.5, 1.0, 0.0, //
            5.0, 5.0, 5.0, // unreferenced
        ],
        &[0, 1, 2],
    );
    let before = mesh.vertex_count();

    let stats = IsolatedVertexRemoval.execute(&mut mesh);
    assert_eq!(stats.found, 1);
    assert_eq!(stats.fixed, 1);
    assert_eq!(mesh.vertex_count(), before - 1);
}

#[test]
fn degenerate_face_repair_scenario() {
    let mut mesh = import(
        &[
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.5, 1.0, 0.0, //
            2.0, 2.0, 2.0, //
            2.0, 2.0, 2.0, //
            2.0, 2.0, 2.0, // a fully collapsed triangle
        ],
        &[0, 1, 2, 3, 4, 5],
    );

    let stats = DegenerateFaceRemoval::default().execute(&mut mesh);
    assert_eq!(stats.found, 1);
    assert_eq!(stats.fixed, 1);
    assert_eq!(mesh.face_count(), 1);
}

#[test]
fn duplicate_face_repair_scenario() {
    let mut mesh = import(
        &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0, 0.0],
        &[0, 1, 2, 0, 1, 2, 0, 1, 2],
    );

    let stats = DuplicateFaceRemoval.execute(&mut mesh);
    assert_eq!(stats.found, 2);
    assert_eq!(stats.fixed, 2);
    assert_eq!(mesh.face_count(), 1);
}

#[test]
fn import_export_round_trip_preserves_triangles() {
    let container = mesh::types::unit_cube();
    let mesh = TriMesh::from_indexed_mesh(&container).unwrap();
    let exported = mesh.to_indexed_mesh();

    assert_eq!(exported.vertices.len(), container.vertices.len());
    assert_eq!(exported.faces.len(), container.faces.len());
    assert!((exported.signed_volume() - container.signed_volume()).abs() < 1e-12);
    assert!((exported.surface_area() - container.surface_area()).abs() < 1e-12);
}

#[test]
fn repair_all_is_idempotent() {
    let mut container = mesh::types::unit_cube();
    container.faces.retain(|f| *f != [4, 5, 6] && *f != [4, 6, 7]);
    container.faces.push([0, 2, 1]);
    let mut mesh = TriMesh::from_indexed_mesh(&container).unwrap();

    let first = repair_all(&mut mesh, &RepairOptions::default());
    assert!(first.total_fixed() > 0);

    let second = repair_all(&mut mesh, &RepairOptions::default());
    assert_eq!(second.total_found(), 0);
    assert!(second.success);
}

#[test]
fn classification_is_idempotent() {
    let mut mesh = import(
        &[
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.5, 1.0, 0.0, //
            0.5, -1.0, 0.0, //
            0.5, 0.5, 1.0,
        ],
        &[0, 1, 2, 0, 1, 3, 0, 1, 4],
    );

    let before: Vec<_> = mesh.vertex_ids().map(|v| mesh.vertex(v).kind).collect();
    mesh.classify_all();
    let after: Vec<_> = mesh.vertex_ids().map(|v| mesh.vertex(v).kind).collect();
    assert_eq!(before, after);
}

/// An elongated box with its twelve creases marked as features: the
/// adaptive loop must refine it to the target length without moving the
/// surface, so total area is preserved and the creases survive.
#[test]
fn adaptive_remesh_preserves_area_and_features() {
    let positions = [
        0.0, 0.0, 0.0, //
        8.0, 0.0, 0.0, //
        8.0, 1.0, 0.0, //
        0.0, 1.0, 0.0, //
        0.0, 0.0, 1.0, //
        8.0, 0.0, 1.0, //
        8.0, 1.0, 1.0, //
        0.0, 1.0, 1.0,
    ];
    let indices = [
        0, 2, 1, 0, 3, 2, // bottom
        4, 5, 6, 4, 6, 7, // top
        0, 1, 5, 0, 5, 4, // front
        3, 7, 6, 3, 6, 2, // back
        0, 4, 7, 0, 7, 3, // left
        1, 2, 6, 1, 6, 5, // right
    ];
    let creases = vec![
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 0),
        (4, 5),
        (5, 6),
        (6, 7),
        (7, 4),
        (0, 4),
        (1, 5),
        (2, 6),
        (3, 7),
    ];

    let container = IndexedMesh::from_raw(&positions, &indices);
    let area_before = container.surface_area();

    let params = RemeshParams::with_edge_length(1.0)
        .with_iterations(3)
        .with_feature_edges(creases);
    let output = remesh(&container, &params).unwrap();

    // Area preserved to within 1 percent.
    let area_after = output.mesh.surface_area();
    assert!(
        (area_after - area_before).abs() / area_before < 0.01,
        "area drifted: {area_before} -> {area_after}"
    );

    // The loop actually refined the box.
    assert!(output.report.splits > 0);
    assert!(output.report.final_faces > output.report.original_faces);

    // The result is structurally sound.
    let tri_mesh = TriMesh::from_indexed_mesh(&output.mesh).unwrap();
    assert!(validate(&tri_mesh).is_valid());
    assert!(tri_mesh.is_manifold());
    assert!(!tri_mesh.has_boundary());
}

#[test]
fn skeleton_of_marked_box_runs_between_corners() {
    let positions = [
        0.0, 0.0, 0.0, //
        4.0, 0.0, 0.0, //
        4.0, 1.0, 0.0, //
        0.0, 1.0, 0.0, //
        0.0, 0.0, 1.0, //
        4.0, 0.0, 1.0, //
        4.0, 1.0, 1.0, //
        0.0, 1.0, 1.0,
    ];
    let indices = [
        0, 2, 1, 0, 3, 2, 4, 5, 6, 4, 6, 7, 0, 1, 5, 0, 5, 4, 3, 7, 6, 3, 6, 2, 0, 4, 7, 0, 7,
        3, 1, 2, 6, 1, 6, 5,
    ];
    let creases: Vec<(u32, u32)> = vec![
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 0),
        (4, 5),
        (5, 6),
        (6, 7),
        (7, 4),
        (0, 4),
        (1, 5),
        (2, 6),
        (3, 7),
    ];

    let mesh = TriMesh::from_indexed_mesh_with_features(
        &IndexedMesh::from_raw(&positions, &indices),
        &creases,
    )
    .unwrap();

    // All eight corners carry three feature edges each: branching.
    let stats = mesh.statistics();
    assert_eq!(stats.feature_edges, 12);
    assert_eq!(stats.branching_vertices, 8);

    // Twelve one-edge segments, one per crease.
    let skeleton = Skeleton::extract(&mesh);
    assert_eq!(skeleton.segment_count(), 12);
    assert!(skeleton.segments.iter().all(|s| !s.closed));
}

#[test]
fn spatial_queries_agree_with_geometry() {
    let container = mesh::types::unit_cube();
    let triangles: Vec<Triangle> = container.triangles().collect();
    let bvh = Bvh::build(&triangles);

    let hit = bvh
        .closest_point(&mesh::types::Point3::new(0.5, 0.5, 3.0))
        .unwrap();
    assert!((hit.distance - 2.0).abs() < 1e-12);

    let mut grid = SpatialHashGrid::new(0.5).unwrap();
    for (i, vertex) in container.vertices.iter().enumerate() {
        grid.insert(i as u32, vertex.position);
    }
    let near_origin = grid.query_radius(&mesh::types::Point3::new(0.0, 0.0, 0.0), 0.1);
    assert_eq!(near_origin, vec![0]);
}
