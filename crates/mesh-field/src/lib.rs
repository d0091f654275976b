//! Orientation and position field smoothing on triangle meshes.
//!
//! This crate computes the two fields behind instant field-aligned
//! remeshing: a 4-fold rotationally symmetric orientation field (a cross
//! field) and a 4-fold translationally symmetric position field (a local
//! square lattice), both smoothed over the mesh surface with randomized
//! Gauss–Seidel sweeps.
//!
//! # Features
//!
//! - **Lattice primitives**: snap a point to a local lattice, find the
//!   consensus point of two tangent planes
//! - **Compatibility**: resolve the symmetry ambiguity between neighboring
//!   orientations and positions
//! - **Smoothing**: seeded random initialization and in-place orientation and
//!   position passes
//! - **File I/O**: load OFF meshes, write position fields as OFF point sets
//! - **Reports**: energy and invariant diagnostics of a computed field
//!
//! # Units and Scale
//!
//! The lattice spacing `scale` is given in mesh units. When it is not set
//! explicitly it is derived from the surface area, either from a target
//! output vertex count (`sqrt(area / count)`) or from one sixteenth of the
//! input vertex count.
//!
//! # Coordinate System
//!
//! Face winding is **counter-clockwise (CCW) when viewed from outside** the
//! mesh, so vertex normals point outward by the right-hand rule. The field
//! does not depend on the sign of the normals beyond which of the two
//! 90° rotations is called `n × o`.
//!
//! # Quick Start
//!
//! ```no_run
//! use mesh_field::{FieldParams, Mesh, compute_field};
//!
//! let mesh = Mesh::load("model.off").unwrap();
//!
//! let params = FieldParams::with_scale(0.02).seed(7);
//! let solution = compute_field(&mesh, &params).unwrap();
//! println!("{}", solution.report);
//!
//! solution.save("model_positions.off").unwrap();
//! ```
//!
//! # Step by Step
//!
//! ```no_run
//! use mesh_field::{InstantField, Mesh, SurfaceModel};
//!
//! let mesh = Mesh::load("model.off").unwrap();
//! let surface = SurfaceModel::from_mesh(&mesh).unwrap();
//!
//! let mut field = InstantField::new(surface, 0);
//! field.smooth_orientations(100);
//! field.smooth_positions(0.02, 100);
//! field.save_position_field("positions.off").unwrap();
//! ```
//!
//! # Determinism
//!
//! All randomness comes from a ChaCha8 generator seeded once per
//! [`InstantField`]. The same mesh, seed and iteration counts always give
//! bit-identical fields on the same platform.

mod error;
mod pipeline;
pub mod tracing_ext;
mod types;

pub mod compat;
pub mod field;
pub mod io;
pub mod lattice;
pub mod params;
pub mod progress;
pub mod report;
pub mod surface;

pub use error::{ErrorCode, FieldError, FieldLocation, FieldResult, RecoverySuggestion};
pub use types::{Mesh, Triangle, Vertex};

pub use compat::{LatticeFrame, compat_orientation, compat_position};
pub use field::InstantField;
pub use io::{
    MeshFormat, load_mesh, load_off, parse_off, save_mesh, save_off, save_point_field,
    write_off, write_point_field,
};
pub use lattice::{PLANE_REGULARIZATION, SnapPolicy, intermediate_position, lattice_snap, rotate90};
pub use params::{DEFAULT_ITERATIONS, FieldParams, ScaleSpec};
pub use pipeline::{FieldSolution, compute_field, compute_field_with_progress};
pub use progress::{Progress, ProgressCallback};
pub use report::FieldReport;
pub use surface::SurfaceModel;
pub use tracing_ext::{OperationTimer, log_progress, log_surface_stats};

pub use nalgebra::{Point3, Vector3};
