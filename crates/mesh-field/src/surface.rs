//! Read-only surface model consumed by the field smoothers.
//!
//! The surface model holds, per vertex, the original position, a unit normal
//! and the sorted set of edge-adjacent neighbors. It is built once from a
//! [`Mesh`] and never mutated afterwards; faces are only used during
//! construction.

use std::collections::BTreeSet;

use nalgebra::{Point3, Vector3};
use tracing::{debug, warn};

use crate::error::{FieldError, FieldResult};
use crate::types::{Mesh, Triangle};

/// Normal assigned to vertices that have no non-degenerate incident face.
const FALLBACK_NORMAL: Vector3<f64> = Vector3::new(0.0, 0.0, 1.0);

/// Vertices, unit normals and symmetric adjacency of a triangle mesh.
#[derive(Debug, Clone)]
pub struct SurfaceModel {
    positions: Vec<Point3<f64>>,
    normals: Vec<Vector3<f64>>,
    adjacency: Vec<Vec<u32>>,
    face_count: usize,
    surface_area: f64,
}

impl SurfaceModel {
    /// Build the surface model from raw mesh data.
    ///
    /// Validates the mesh, computes per-vertex normals as the normalized sum
    /// of incident unit face normals and derives adjacency from face edges.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::EmptyMesh`] when the mesh has no vertices or no
    /// faces, [`FieldError::InvalidVertexIndex`] for out-of-range face
    /// indices and [`FieldError::InvalidCoordinate`] for NaN or infinite
    /// coordinates.
    pub fn from_mesh(mesh: &Mesh) -> FieldResult<Self> {
        if mesh.vertices.is_empty() {
            return Err(FieldError::empty_mesh("mesh has no vertices"));
        }
        if mesh.faces.is_empty() {
            return Err(FieldError::empty_mesh("mesh has no faces"));
        }
        validate(mesh)?;

        let vertex_count = mesh.vertex_count();
        let mut normal_accum = vec![Vector3::zeros(); vertex_count];
        let mut neighbor_sets: Vec<BTreeSet<u32>> = vec![BTreeSet::new(); vertex_count];
        let mut degenerate_faces = 0usize;

        for (tri, face) in mesh.triangles().zip(&mesh.faces) {
            match tri.normal() {
                Some(n) => {
                    for &vi in face {
                        normal_accum[vi as usize] += n;
                    }
                }
                None => degenerate_faces += 1,
            }

            for j in 0..3 {
                let (a, b) = (face[j], face[(j + 1) % 3]);
                if a == b {
                    continue;
                }
                neighbor_sets[a as usize].insert(b);
                neighbor_sets[b as usize].insert(a);
            }
        }

        let mut fallback_count = 0usize;
        let normals: Vec<Vector3<f64>> = normal_accum
            .into_iter()
            .map(|accum| {
                let len = accum.norm();
                if len > 1e-12 {
                    accum / len
                } else {
                    fallback_count += 1;
                    FALLBACK_NORMAL
                }
            })
            .collect();

        if degenerate_faces > 0 {
            debug!(
                degenerate_faces,
                "Skipped degenerate faces while accumulating normals"
            );
        }
        if fallback_count > 0 {
            warn!(
                vertices = fallback_count,
                "Vertices without a usable incident face received a fallback normal"
            );
        }

        let adjacency: Vec<Vec<u32>> = neighbor_sets
            .into_iter()
            .map(|set| set.into_iter().collect())
            .collect();

        Ok(Self {
            positions: mesh.vertices.iter().map(|v| v.position).collect(),
            normals,
            adjacency,
            face_count: mesh.face_count(),
            surface_area: mesh.triangles().map(|t: Triangle| t.area()).sum(),
        })
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of faces the model was built from.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.face_count
    }

    /// Number of undirected edges in the adjacency relation.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Original vertex positions.
    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Unit vertex normals.
    #[inline]
    pub fn normals(&self) -> &[Vector3<f64>] {
        &self.normals
    }

    /// Sorted neighbor indices of vertex `i`.
    #[inline]
    pub fn neighbors(&self, i: usize) -> &[u32] {
        &self.adjacency[i]
    }

    /// Total area of the faces the model was built from.
    #[inline]
    pub fn surface_area(&self) -> f64 {
        self.surface_area
    }

    /// Axis-aligned bounding box of the vertex positions.
    pub fn bounds(&self) -> (Point3<f64>, Point3<f64>) {
        let first = self.positions[0];
        self.positions[1..]
            .iter()
            .fold((first, first), |(min, max), p| (min.inf(p), max.sup(p)))
    }

    /// Length of the bounding box diagonal.
    pub fn diagonal(&self) -> f64 {
        let (min, max) = self.bounds();
        (max - min).norm()
    }
}

fn validate(mesh: &Mesh) -> FieldResult<()> {
    for (i, v) in mesh.vertices.iter().enumerate() {
        for (name, value) in [("x", v.position.x), ("y", v.position.y), ("z", v.position.z)] {
            if !value.is_finite() {
                return Err(FieldError::invalid_coordinate(i, name, value));
            }
        }
    }

    let vertex_count = mesh.vertex_count();
    for (fi, face) in mesh.faces.iter().enumerate() {
        if let Some(&bad) = face.iter().find(|&&vi| vi as usize >= vertex_count) {
            return Err(FieldError::invalid_vertex_index(fi, bad, vertex_count));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vertex;
    use approx::assert_relative_eq;

    fn tetrahedron() -> Mesh {
        Mesh {
            vertices: vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(1.0, 0.0, 0.0),
                Vertex::from_coords(0.0, 1.0, 0.0),
                Vertex::from_coords(0.0, 0.0, 1.0),
            ],
            faces: vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]],
        }
    }

    #[test]
    fn test_normals_are_unit() {
        let surface = SurfaceModel::from_mesh(&tetrahedron()).unwrap();
        for n in surface.normals() {
            assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_normals_point_outward() {
        let surface = SurfaceModel::from_mesh(&tetrahedron()).unwrap();
        // Vertex 0 sits at the corner opposite the slanted face.
        let n0 = surface.normals()[0];
        assert!(n0.x < 0.0 && n0.y < 0.0 && n0.z < 0.0);
        let n3 = surface.normals()[3];
        assert!(n3.z > 0.0);
    }

    #[test]
    fn test_normals_survive_tiny_meshes() {
        let reference = SurfaceModel::from_mesh(&tetrahedron()).unwrap();
        for scale in [1e-9, 1e-12] {
            let mut mesh = tetrahedron();
            for v in &mut mesh.vertices {
                v.position.coords *= scale;
            }
            let surface = SurfaceModel::from_mesh(&mesh).unwrap();
            for (n, expected) in surface.normals().iter().zip(reference.normals()) {
                assert_relative_eq!(*n, *expected, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_adjacency_is_symmetric_and_sorted() {
        let surface = SurfaceModel::from_mesh(&tetrahedron()).unwrap();
        assert_eq!(surface.edge_count(), 6);
        for i in 0..surface.vertex_count() {
            let neighbors = surface.neighbors(i);
            assert!(neighbors.windows(2).all(|w| w[0] < w[1]));
            for &j in neighbors {
                assert!(surface.neighbors(j as usize).contains(&(i as u32)));
            }
        }
    }

    #[test]
    fn test_isolated_vertex_gets_fallback_normal() {
        let mut mesh = tetrahedron();
        mesh.vertices.push(Vertex::from_coords(5.0, 5.0, 5.0));
        let surface = SurfaceModel::from_mesh(&mesh).unwrap();
        assert_eq!(surface.normals()[4], FALLBACK_NORMAL);
        assert!(surface.neighbors(4).is_empty());
    }

    #[test]
    fn test_rejects_empty_mesh() {
        let err = SurfaceModel::from_mesh(&Mesh::new()).unwrap_err();
        assert!(matches!(err, FieldError::EmptyMesh { .. }));

        let points = Mesh::from_points(&[Point3::origin()]);
        let err = SurfaceModel::from_mesh(&points).unwrap_err();
        assert!(matches!(err, FieldError::EmptyMesh { .. }));
    }

    #[test]
    fn test_rejects_invalid_index() {
        let mut mesh = tetrahedron();
        mesh.faces.push([0, 1, 9]);
        let err = SurfaceModel::from_mesh(&mesh).unwrap_err();
        assert!(matches!(
            err,
            FieldError::InvalidVertexIndex {
                face_index: 4,
                vertex_index: 9,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_nan_coordinate() {
        let mut mesh = tetrahedron();
        mesh.vertices[2].position.y = f64::NAN;
        let err = SurfaceModel::from_mesh(&mesh).unwrap_err();
        assert!(matches!(
            err,
            FieldError::InvalidCoordinate {
                vertex_index: 2,
                coordinate: "y",
                ..
            }
        ));
    }

    #[test]
    fn test_surface_area_and_diagonal() {
        let surface = SurfaceModel::from_mesh(&tetrahedron()).unwrap();
        let expected = 1.5 + 3.0_f64.sqrt() / 2.0;
        assert_relative_eq!(surface.surface_area(), expected, epsilon = 1e-12);
        assert_relative_eq!(surface.diagonal(), 3.0_f64.sqrt(), epsilon = 1e-12);
    }
}
