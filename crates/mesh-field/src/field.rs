//! Orientation and position fields and the randomized smoothing passes.
//!
//! [`InstantField`] owns the read-only [`SurfaceModel`], one orientation and
//! one position per vertex, and the pseudo-random generator that drives
//! initialization and visiting order. The generator is seeded once at
//! construction, so a given mesh and seed always produce the same fields.
//!
//! # Update order
//!
//! Both passes are Gauss–Seidel style: each vertex is rewritten in place
//! and later vertices in the same sweep read the already updated values.
//! Vertices are visited in a freshly shuffled order every sweep. The
//! orientation pass also shuffles each vertex's neighbors; the position pass
//! visits neighbors in their stored (sorted) order.
//!
//! # Example
//!
//! ```
//! use mesh_field::{InstantField, Mesh, SurfaceModel, Vertex};
//!
//! let mesh = Mesh {
//!     vertices: vec![
//!         Vertex::from_coords(0.0, 0.0, 0.0),
//!         Vertex::from_coords(1.0, 0.0, 0.0),
//!         Vertex::from_coords(1.0, 1.0, 0.0),
//!         Vertex::from_coords(0.0, 1.0, 0.0),
//!     ],
//!     faces: vec![[0, 1, 2], [0, 2, 3]],
//! };
//!
//! let surface = SurfaceModel::from_mesh(&mesh).unwrap();
//! let mut field = InstantField::new(surface, 0);
//! field.smooth_orientations(10);
//! field.smooth_positions(0.25, 10);
//! assert_eq!(field.positions().len(), 4);
//! ```

use std::path::Path;

use nalgebra::{Point3, Vector3};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, trace};

use crate::compat::{LatticeFrame, compat_orientation, compat_position};
use crate::error::FieldResult;
use crate::lattice::{SnapPolicy, lattice_snap};
use crate::progress::{ProgressCallback, SweepTracker};
use crate::surface::SurfaceModel;
use crate::tracing_ext::OperationTimer;
use crate::types::Mesh;

/// Tangent vectors shorter than this cannot be normalized reliably.
const MIN_TANGENT_LENGTH: f64 = 1e-9;

/// Orientation and position fields over a surface.
#[derive(Debug, Clone)]
pub struct InstantField {
    surface: SurfaceModel,
    orientations: Vec<Vector3<f64>>,
    positions: Vec<Point3<f64>>,
    rng: ChaCha8Rng,
    seed: u64,
}

impl InstantField {
    /// Seed both fields for `surface`.
    ///
    /// Each vertex gets a uniformly random unit tangent direction and a
    /// random point inside the bounding box of the surface.
    pub fn new(surface: SurfaceModel, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (min, max) = surface.bounds();
        let vertex_count = surface.vertex_count();

        let mut orientations = Vec::with_capacity(vertex_count);
        let mut positions = Vec::with_capacity(vertex_count);
        for normal in surface.normals() {
            orientations.push(random_tangent(&mut rng, normal));

            let t = Vector3::new(rng.r#gen::<f64>(), rng.r#gen::<f64>(), rng.r#gen::<f64>());
            let blend = min.coords.component_mul(&t.map(|c| 1.0 - c)) + max.coords.component_mul(&t);
            positions.push(Point3::from(blend));
        }

        info!(vertices = vertex_count, seed, "Initialized random fields");

        Self {
            surface,
            orientations,
            positions,
            rng,
            seed,
        }
    }

    /// Build the surface model from `mesh` and seed the fields.
    pub fn from_mesh(mesh: &Mesh, seed: u64) -> FieldResult<Self> {
        Ok(Self::new(SurfaceModel::from_mesh(mesh)?, seed))
    }

    /// The underlying surface.
    #[inline]
    pub fn surface(&self) -> &SurfaceModel {
        &self.surface
    }

    /// Orientation field, one unit tangent vector per vertex.
    #[inline]
    pub fn orientations(&self) -> &[Vector3<f64>] {
        &self.orientations
    }

    /// Position field, one tangent-plane point per vertex.
    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Seed the generator was created with.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Run `iterations` orientation smoothing sweeps.
    pub fn smooth_orientations(&mut self, iterations: usize) {
        self.smooth_orientations_with_progress(iterations, None);
    }

    /// Run `iterations` orientation smoothing sweeps, reporting each
    /// completed sweep to `callback`.
    ///
    /// For every vertex the neighbors are folded into a running orientation:
    /// after resolving the 4-fold ambiguity against the current running
    /// value, the running value becomes `weight * own + neighbor`, projected
    /// back onto the tangent plane and normalized.
    pub fn smooth_orientations_with_progress(
        &mut self,
        iterations: usize,
        callback: Option<&ProgressCallback>,
    ) {
        let _timer =
            OperationTimer::with_context("smooth_orientations", self.surface.vertex_count(), iterations);
        let tracker = SweepTracker::new(iterations, "orientations");

        let surface = &self.surface;
        let normals = surface.normals();
        let mut order: Vec<usize> = (0..surface.vertex_count()).collect();
        let mut neighbors: Vec<u32> = Vec::new();
        let mut skipped = 0usize;

        for sweep in 0..iterations {
            order.shuffle(&mut self.rng);
            for &i in &order {
                let n_i = normals[i];
                let mut o_i = self.orientations[i];
                let mut weight = 0.0;

                neighbors.clear();
                neighbors.extend_from_slice(surface.neighbors(i));
                neighbors.shuffle(&mut self.rng);

                for &j in &neighbors {
                    let j = j as usize;
                    let (own, other) =
                        compat_orientation(&o_i, &n_i, &self.orientations[j], &normals[j]);
                    let blended = own * weight + other;
                    let tangent = blended - n_i * blended.dot(&n_i);
                    let len = tangent.norm();
                    if len > MIN_TANGENT_LENGTH {
                        o_i = tangent / len;
                        weight += 1.0;
                    } else {
                        skipped += 1;
                    }
                }

                self.orientations[i] = o_i;
            }
            tracker.report(sweep + 1, callback);
        }

        if skipped > 0 {
            trace!(skipped, "Skipped degenerate orientation updates");
        }
        info!(sweeps = iterations, "Orientation smoothing completed");
    }

    /// Run `iterations` position smoothing sweeps with lattice spacing
    /// `scale`.
    ///
    /// # Panics
    ///
    /// Panics if `scale` is not a positive finite number.
    pub fn smooth_positions(&mut self, scale: f64, iterations: usize) {
        self.smooth_positions_with_progress(scale, iterations, None);
    }

    /// Run `iterations` position smoothing sweeps, reporting each completed
    /// sweep to `callback`.
    ///
    /// The orientation field is read but never written. Each neighbor's
    /// position is made lattice-compatible with the running position, the
    /// two are averaged with the running weight and the result is projected
    /// back onto the vertex's tangent plane. After all neighbors, the
    /// running position is rounded to the lattice point nearest the vertex.
    ///
    /// # Panics
    ///
    /// Panics if `scale` is not a positive finite number.
    pub fn smooth_positions_with_progress(
        &mut self,
        scale: f64,
        iterations: usize,
        callback: Option<&ProgressCallback>,
    ) {
        assert!(
            scale.is_finite() && scale > 0.0,
            "lattice scale must be positive and finite, got {}",
            scale
        );
        let _timer =
            OperationTimer::with_context("smooth_positions", self.surface.vertex_count(), iterations);
        let tracker = SweepTracker::new(iterations, "positions");

        let surface = &self.surface;
        let normals = surface.normals();
        let vertices = surface.positions();
        let orientations = &self.orientations;
        let mut order: Vec<usize> = (0..surface.vertex_count()).collect();

        for sweep in 0..iterations {
            order.shuffle(&mut self.rng);
            for &i in &order {
                let o_i = orientations[i];
                let n_i = normals[i];
                let v_i = vertices[i];
                let mut p_i = self.positions[i];
                let mut weight = 0.0;

                let neighbors = surface.neighbors(i);
                for &j in neighbors {
                    let j = j as usize;
                    let own = LatticeFrame {
                        orientation: o_i,
                        position: p_i,
                        normal: n_i,
                        vertex: v_i,
                    };
                    let other = LatticeFrame {
                        orientation: orientations[j],
                        position: self.positions[j],
                        normal: normals[j],
                        vertex: vertices[j],
                    };
                    let (c0, c1) = compat_position(&own, &other, scale);
                    p_i = Point3::from((c0.coords * weight + c1.coords) / (weight + 1.0));
                    p_i -= n_i * (p_i - v_i).dot(&n_i);
                    weight += 1.0;
                }

                // Isolated vertices still keep their sample on the tangent plane.
                if neighbors.is_empty() {
                    p_i -= n_i * (p_i - v_i).dot(&n_i);
                }

                self.positions[i] = lattice_snap(&p_i, &o_i, &n_i, &v_i, scale, SnapPolicy::Round);
            }
            tracker.report(sweep + 1, callback);
        }

        info!(sweeps = iterations, scale, "Position smoothing completed");
    }

    /// The position field as a point-only mesh.
    pub fn position_mesh(&self) -> Mesh {
        Mesh::from_points(&self.positions)
    }

    /// Write the position field as a point-only OFF file.
    pub fn save_position_field(&self, path: impl AsRef<Path>) -> FieldResult<()> {
        crate::io::save_point_field(&self.positions, path.as_ref())
    }
}

/// Uniformly random unit vector orthogonal to `normal`.
///
/// Directions are drawn uniformly from the unit ball by rejection, which
/// gives the same direction distribution as a normalized Gaussian sample.
fn random_tangent<R: Rng + ?Sized>(rng: &mut R, normal: &Vector3<f64>) -> Vector3<f64> {
    loop {
        let d = Vector3::new(
            rng.gen_range(-1.0f64..1.0),
            rng.gen_range(-1.0f64..1.0),
            rng.gen_range(-1.0f64..1.0),
        );
        let len_sq = d.norm_squared();
        if len_sq > 1.0 || len_sq < 1e-12 {
            continue;
        }
        let tangent = d - normal * d.dot(normal);
        let len = tangent.norm();
        if len > MIN_TANGENT_LENGTH {
            return tangent / len;
        }
    }
}
