//! End-to-end integration tests for mesh-field.
//!
//! These tests exercise the full pipeline from load -> smooth -> report -> save
//! to ensure all components work together correctly.

use mesh_field::{
    FieldParams, FieldReport, InstantField, Mesh, SurfaceModel, Vertex, compute_field,
};
use std::io::Write;
use tempfile::NamedTempFile;

/// Unit icosahedron: 12 vertices, 20 faces.
fn create_icosahedron() -> Mesh {
    let mut mesh = Mesh::new();

    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let coords = [
        [-1.0, phi, 0.0],
        [1.0, phi, 0.0],
        [-1.0, -phi, 0.0],
        [1.0, -phi, 0.0],
        [0.0, -1.0, phi],
        [0.0, 1.0, phi],
        [0.0, -1.0, -phi],
        [0.0, 1.0, -phi],
        [phi, 0.0, -1.0],
        [phi, 0.0, 1.0],
        [-phi, 0.0, -1.0],
        [-phi, 0.0, 1.0],
    ];
    for [x, y, z] in coords {
        let len = (x * x + y * y + z * z).sqrt();
        mesh.vertices.push(Vertex::from_coords(x / len, y / len, z / len));
    }

    // CCW winding when viewed from outside
    mesh.faces.extend_from_slice(&[
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ]);

    mesh
}

/// Flat `n x n` grid of unit squares in the z = 0 plane.
fn create_grid(n: u32) -> Mesh {
    let mut mesh = Mesh::new();
    for y in 0..=n {
        for x in 0..=n {
            mesh.vertices.push(Vertex::from_coords(x as f64, y as f64, 0.0));
        }
    }
    let stride = n + 1;
    for y in 0..n {
        for x in 0..n {
            let a = y * stride + x;
            mesh.faces.push([a, a + 1, a + stride + 1]);
            mesh.faces.push([a, a + stride + 1, a + stride]);
        }
    }
    mesh
}

/// Write `content` to a temporary OFF file.
fn write_off_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".off").unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_icosahedron_normals_point_outward() {
    let surface = SurfaceModel::from_mesh(&create_icosahedron()).unwrap();
    assert_eq!(surface.vertex_count(), 12);
    assert_eq!(surface.edge_count(), 30);
    for (p, n) in surface.positions().iter().zip(surface.normals()) {
        assert!(p.coords.dot(n) > 0.99);
    }
    for i in 0..12 {
        assert_eq!(surface.neighbors(i).len(), 5);
    }
}

#[test]
fn test_icosahedron_end_to_end() {
    let mesh = create_icosahedron();
    let params = FieldParams::with_scale(0.5).iterations(20, 20).seed(3);
    let solution = compute_field(&mesh, &params).unwrap();

    assert_eq!(solution.report.vertex_count, 12);
    assert_eq!(solution.report.edge_count, 30);
    assert!(solution.report.is_consistent(1e-9), "{}", solution.report);
    assert!(solution.report.distinct_positions <= 12);
}

#[test]
fn test_one_sweep_is_bit_reproducible() {
    let run = || {
        let surface = SurfaceModel::from_mesh(&create_icosahedron()).unwrap();
        let mut field = InstantField::new(surface, 42);
        field.smooth_orientations(1);
        field.smooth_positions(0.3, 1);
        (field.orientations().to_vec(), field.positions().to_vec())
    };

    let (o_a, p_a) = run();
    let (o_b, p_b) = run();
    assert_eq!(o_a, o_b);
    assert_eq!(p_a, p_b);
}

#[test]
fn test_pipeline_is_reproducible() {
    let mesh = create_grid(4);
    let params = FieldParams::with_scale(0.7).iterations(5, 5).seed(9);
    let a = compute_field(&mesh, &params).unwrap();
    let b = compute_field(&mesh, &params).unwrap();
    assert_eq!(a.field.orientations(), b.field.orientations());
    assert_eq!(a.field.positions(), b.field.positions());
}

#[test]
fn test_smoothing_lowers_orientation_energy() {
    let surface = SurfaceModel::from_mesh(&create_grid(4)).unwrap();
    let mut field = InstantField::new(surface, 5);
    let before = FieldReport::analyze(&field, 1.0).orientation_energy;
    field.smooth_orientations(200);
    let after = FieldReport::analyze(&field, 1.0).orientation_energy;
    assert!(after < before, "energy {} -> {}", before, after);
    assert!(after < 1e-3);
}

#[test]
fn test_large_scale_collapses_positions() {
    let mesh = create_grid(4);
    let surface = SurfaceModel::from_mesh(&mesh).unwrap();
    let scale = 2.0 * surface.diagonal();

    let mut field = InstantField::new(surface, 1);
    field.smooth_orientations(200);
    field.smooth_positions(scale, 100);

    let report = FieldReport::analyze(&field, scale);
    assert!(report.is_consistent(1e-6), "{}", report);
    assert!(
        report.distinct_positions <= mesh.vertex_count() / 4,
        "{} distinct positions for {} vertices",
        report.distinct_positions,
        mesh.vertex_count()
    );
}

#[test]
fn test_load_solve_save_round_trip() {
    let input = write_off_file(
        "OFF\n# unit square\n4 1 0\n0 0 0\n1 0 0\n1 1 0\n0 1 0\n4 0 1 2 3\n",
    );
    let mesh = Mesh::load(input.path()).unwrap();
    assert_eq!(mesh.face_count(), 2);

    let solution = compute_field(&mesh, &FieldParams::with_scale(0.25).iterations(5, 5)).unwrap();

    let output = NamedTempFile::with_suffix(".off").unwrap();
    solution.save(output.path()).unwrap();

    let text = std::fs::read_to_string(output.path()).unwrap();
    assert!(text.starts_with("OFF\n4 0 0\n"));

    let reloaded = Mesh::load(output.path()).unwrap();
    assert_eq!(reloaded.face_count(), 0);
    assert_eq!(reloaded, solution.field.position_mesh());
}

#[test]
fn test_config_file_drives_pipeline() {
    let mut config = NamedTempFile::with_suffix(".toml").unwrap();
    writeln!(config, "orientation_iterations = 3\nposition_iterations = 2\nseed = 11\n\n[scale]\nabsolute = 0.4").unwrap();
    config.flush().unwrap();

    let params = FieldParams::from_file(config.path()).unwrap();
    assert_eq!(params.seed, 11);

    let solution = compute_field(&create_grid(2), &params).unwrap();
    assert_eq!(solution.scale, 0.4);
    assert_eq!(solution.field.seed(), 11);
}

#[test]
fn test_malformed_input_reports_line() {
    let input = write_off_file("OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 9\n");
    let err = Mesh::load(input.path()).unwrap_err();
    let location = err.location().expect("parse errors carry a location");
    assert!(location.to_string().ends_with(":6"));
}
