//! End-to-end field computation.
//!
//! [`compute_field`] ties the stages together: build the surface model,
//! resolve the lattice spacing, seed the fields, smooth orientations, then
//! smooth positions, and finally analyze the result.
//!
//! ```no_run
//! use mesh_field::{FieldParams, Mesh, compute_field};
//!
//! let mesh = Mesh::load("bunny.off").unwrap();
//! let solution = compute_field(&mesh, &FieldParams::with_target_vertex_count(2000)).unwrap();
//! println!("{}", solution.report);
//! solution.save("bunny_positions.off").unwrap();
//! ```

use std::path::Path;

use tracing::info;

use crate::error::FieldResult;
use crate::field::InstantField;
use crate::params::FieldParams;
use crate::progress::ProgressCallback;
use crate::report::FieldReport;
use crate::surface::SurfaceModel;
use crate::tracing_ext::{OperationTimer, log_surface_stats};
use crate::types::Mesh;

/// Result of a field computation.
#[derive(Debug, Clone)]
pub struct FieldSolution {
    /// The smoothed fields and their surface.
    pub field: InstantField,
    /// Lattice spacing used for the position field.
    pub scale: f64,
    /// Quality report of the final fields.
    pub report: FieldReport,
}

impl FieldSolution {
    /// Write the position field as a point-only OFF file.
    pub fn save(&self, path: impl AsRef<Path>) -> FieldResult<()> {
        self.field.save_position_field(path)
    }
}

/// Compute orientation and position fields for `mesh`.
pub fn compute_field(mesh: &Mesh, params: &FieldParams) -> FieldResult<FieldSolution> {
    compute_field_with_progress(mesh, params, None)
}

/// Compute orientation and position fields, reporting each sweep of both
/// passes to `callback`.
pub fn compute_field_with_progress(
    mesh: &Mesh,
    params: &FieldParams,
    callback: Option<&ProgressCallback>,
) -> FieldResult<FieldSolution> {
    params.validate()?;
    let _timer = OperationTimer::new("compute_field");

    let surface = SurfaceModel::from_mesh(mesh)?;
    log_surface_stats(&surface, "compute_field");
    let scale = params.resolve_scale(&surface)?;

    info!(
        vertices = surface.vertex_count(),
        scale,
        orientation_iterations = params.orientation_iterations,
        position_iterations = params.position_iterations,
        seed = params.seed,
        "Computing field"
    );

    let mut field = InstantField::new(surface, params.seed);
    field.smooth_orientations_with_progress(params.orientation_iterations, callback);
    field.smooth_positions_with_progress(scale, params.position_iterations, callback);

    let report = FieldReport::analyze(&field, scale);
    info!(
        energy = report.orientation_energy,
        distinct_positions = report.distinct_positions,
        "Field computed"
    );

    Ok(FieldSolution {
        field,
        scale,
        report,
    })
}
