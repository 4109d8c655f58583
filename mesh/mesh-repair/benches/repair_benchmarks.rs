//! Benchmarks for the repair pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mesh_repair::{repair_all, RepairOptions};
use mesh_topology::TriMesh;
use mesh_types::{IndexedMesh, Vertex};

/// An n x n grid of quads split into triangles, with defects injected:
/// a duplicated face, a degenerate face and a few unreferenced vertices.
fn defective_grid(n: u32) -> IndexedMesh {
    let mut mesh = IndexedMesh::new();
    for y in 0..=n {
        for x in 0..=n {
            mesh.vertices
                .push(Vertex::from_coords(f64::from(x), f64::from(y), 0.0));
        }
    }
    let stride = n + 1;
    for y in 0..n {
        for x in 0..n {
            let a = y * stride + x;
            let b = a + 1;
            let c = a + stride + 1;
            let d = a + stride;
            mesh.faces.push([a, b, c]);
            mesh.faces.push([a, c, d]);
        }
    }

    // Defects.
    mesh.faces.push([0, 1, stride + 1]); // duplicate of the first face
    mesh.faces.push([0, 1, 1]); // repeated-corner degenerate
    for i in 0..4 {
        mesh.vertices
            .push(Vertex::from_coords(-10.0 - f64::from(i), -10.0, 0.0));
    }
    mesh
}

fn bench_repair_all(c: &mut Criterion) {
    let container = defective_grid(32);

    c.bench_function("repair_all_grid_32", |b| {
        b.iter(|| {
            let mut mesh = TriMesh::from_indexed_mesh(black_box(&container)).unwrap();
            let report = repair_all(&mut mesh, &RepairOptions::default());
            black_box(report.total_fixed())
        });
    });
}

fn bench_import(c: &mut Criterion) {
    let container = defective_grid(64);

    c.bench_function("connectivity_import_grid_64", |b| {
        b.iter(|| {
            let mesh = TriMesh::from_indexed_mesh(black_box(&container)).unwrap();
            black_box(mesh.edge_count())
        });
    });
}

criterion_group!(benches, bench_repair_all, bench_import);
criterion_main!(benches);
