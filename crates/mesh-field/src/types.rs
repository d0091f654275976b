//! Raw mesh data as read from and written to disk.

use std::path::Path;

use nalgebra::{Point3, Vector3};

use crate::error::FieldResult;

/// A mesh vertex. Only the position is carried; normals are derived by the
/// surface model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f64>,
}

impl Vertex {
    #[inline]
    pub fn new(position: Point3<f64>) -> Self {
        Self { position }
    }

    #[inline]
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }
}

/// Indexed triangle mesh. Faces index into `vertices` and are wound
/// counter-clockwise seen from outside.
///
/// A mesh without faces is a point set, which is how position fields are
/// exported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty mesh with room for the given number of elements.
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Point set with one vertex per point and no faces.
    pub fn from_points(points: &[Point3<f64>]) -> Self {
        Self {
            vertices: points.iter().copied().map(Vertex::new).collect(),
            faces: Vec::new(),
        }
    }

    /// Load a mesh, choosing the reader by file extension.
    pub fn load(path: impl AsRef<Path>) -> FieldResult<Self> {
        crate::io::load_mesh(path.as_ref())
    }

    /// Save the mesh, choosing the writer by file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> FieldResult<()> {
        crate::io::save_mesh(self, path.as_ref())
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// True for meshes that cannot carry a field: no vertices or no faces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Axis-aligned `(min, max)` corners, `None` without vertices.
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut points = self.vertices.iter().map(|v| v.position);
        let first = points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| (lo.inf(&p), hi.sup(&p))))
    }

    /// Faces resolved to corner positions.
    ///
    /// Panics on out-of-range indices; `SurfaceModel::from_mesh` validates
    /// them first.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces.iter().map(|face| {
            let [a, b, c] = face.map(|i| self.vertices[i as usize].position);
            Triangle::new(a, b, c)
        })
    }

    pub fn surface_area(&self) -> f64 {
        self.triangles().map(|t| t.area()).sum()
    }
}

/// Three corner positions of a face.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub v0: Point3<f64>,
    pub v1: Point3<f64>,
    pub v2: Point3<f64>,
}

impl Triangle {
    #[inline]
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// `(v1 - v0) × (v2 - v0)`: twice the area, along the right-hand normal.
    #[inline]
    pub fn area_vector(&self) -> Vector3<f64> {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// Unit normal, `None` when the corners are collinear.
    ///
    /// The cutoff is relative to the edge lengths, so the answer does not
    /// change when the whole mesh is scaled.
    pub fn normal(&self) -> Option<Vector3<f64>> {
        let (e1, e2) = (self.v1 - self.v0, self.v2 - self.v0);
        let cross = e1.cross(&e2);
        let len = cross.norm();
        let cutoff = f64::EPSILON * e1.norm() * e2.norm();
        (len.is_finite() && len > 0.0 && len > cutoff).then(|| cross / len)
    }

    #[inline]
    pub fn area(&self) -> f64 {
        0.5 * self.area_vector().norm()
    }
}
