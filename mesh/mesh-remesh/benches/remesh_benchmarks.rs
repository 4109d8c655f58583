//! Benchmarks for the adaptive remeshing loop.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mesh_remesh::{remesh, RemeshParams};
use mesh_types::{IndexedMesh, Vertex};

/// A coarse rectangular plate the loop has to refine substantially.
fn coarse_plate() -> IndexedMesh {
    let mut mesh = IndexedMesh::new();
    mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
    mesh.vertices.push(Vertex::from_coords(16.0, 0.0, 0.0));
    mesh.vertices.push(Vertex::from_coords(16.0, 4.0, 0.0));
    mesh.vertices.push(Vertex::from_coords(0.0, 4.0, 0.0));
    mesh.faces.push([0, 1, 2]);
    mesh.faces.push([0, 2, 3]);
    mesh
}

fn bench_remesh_refinement(c: &mut Criterion) {
    let container = coarse_plate();

    c.bench_function("remesh_plate_to_unit_length", |b| {
        let params = RemeshParams::with_edge_length(1.0).with_iterations(4);
        b.iter(|| {
            let output = remesh(black_box(&container), &params).unwrap();
            black_box(output.report.final_faces)
        });
    });
}

fn bench_remesh_quick(c: &mut Criterion) {
    let container = coarse_plate();

    c.bench_function("remesh_plate_quick", |b| {
        let params = RemeshParams::quick().with_target_length(2.0);
        b.iter(|| {
            let output = remesh(black_box(&container), &params).unwrap();
            black_box(output.report.total_operations())
        });
    });
}

criterion_group!(benches, bench_remesh_refinement, bench_remesh_quick);
criterion_main!(benches);
