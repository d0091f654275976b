//! Parameters for a field computation.
//!
//! `FieldParams` can be built in code, taken from a preset, or loaded from a
//! TOML or JSON document:
//!
//! ```toml
//! orientation_iterations = 100
//! position_iterations = 100
//! seed = 0
//!
//! [scale]
//! absolute = 0.01
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, FieldResult};
use crate::surface::SurfaceModel;

/// Default number of sweeps for each smoothing pass.
pub const DEFAULT_ITERATIONS: usize = 100;

/// How the lattice spacing is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleSpec {
    /// Explicit lattice spacing in mesh units.
    Absolute(f64),
    /// Spacing that yields roughly this many output vertices:
    /// `sqrt(surface_area / count)`.
    TargetVertexCount(usize),
    /// A target vertex count of one sixteenth of the input vertex count.
    #[default]
    Auto,
}

impl ScaleSpec {
    /// Resolve to a concrete lattice spacing for the given surface.
    pub fn resolve(&self, surface: &SurfaceModel) -> f64 {
        match *self {
            ScaleSpec::Absolute(scale) => scale,
            ScaleSpec::TargetVertexCount(count) => {
                (surface.surface_area() / count.max(1) as f64).sqrt()
            }
            ScaleSpec::Auto => {
                let count = (surface.vertex_count() / 16).max(1);
                (surface.surface_area() / count as f64).sqrt()
            }
        }
    }
}

/// Parameters for computing an orientation and position field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldParams {
    /// Number of orientation smoothing sweeps.
    /// Default: 100
    pub orientation_iterations: usize,

    /// Number of position smoothing sweeps.
    /// Default: 100
    pub position_iterations: usize,

    /// Seed for the pseudo-random generator driving initialization and
    /// visiting order. Identical seeds give bit-identical fields.
    /// Default: 0
    pub seed: u64,

    /// Lattice spacing for the position field.
    /// Default: `Auto`
    pub scale: ScaleSpec,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            orientation_iterations: DEFAULT_ITERATIONS,
            position_iterations: DEFAULT_ITERATIONS,
            seed: 0,
            scale: ScaleSpec::Auto,
        }
    }
}

impl FieldParams {
    /// Params with an explicit lattice spacing.
    pub fn with_scale(scale: f64) -> Self {
        Self {
            scale: ScaleSpec::Absolute(scale),
            ..Default::default()
        }
    }

    /// Params whose spacing targets a number of output vertices.
    pub fn with_target_vertex_count(count: usize) -> Self {
        Self {
            scale: ScaleSpec::TargetVertexCount(count),
            ..Default::default()
        }
    }

    /// Few sweeps, for previews.
    pub fn fast() -> Self {
        Self {
            orientation_iterations: 10,
            position_iterations: 10,
            ..Default::default()
        }
    }

    /// Many sweeps, for smoother fields on large meshes.
    pub fn high_quality() -> Self {
        Self {
            orientation_iterations: 250,
            position_iterations: 250,
            ..Default::default()
        }
    }

    /// Set the seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set both iteration budgets.
    pub fn iterations(mut self, orientation: usize, position: usize) -> Self {
        self.orientation_iterations = orientation;
        self.position_iterations = position;
        self
    }

    /// Check that the parameters describe a computable field.
    pub fn validate(&self) -> FieldResult<()> {
        match self.scale {
            ScaleSpec::Absolute(scale) if !(scale.is_finite() && scale > 0.0) => Err(
                FieldError::invalid_parameter("scale", format!("must be a positive finite spacing, got {}", scale)),
            ),
            ScaleSpec::TargetVertexCount(0) => Err(FieldError::invalid_parameter(
                "target_vertex_count",
                "must be at least 1",
            )),
            _ => Ok(()),
        }
    }

    /// Resolve the lattice spacing for a surface, rejecting degenerate
    /// results (for example a zero-area surface).
    pub fn resolve_scale(&self, surface: &SurfaceModel) -> FieldResult<f64> {
        self.validate()?;
        let scale = self.scale.resolve(surface);
        if scale.is_finite() && scale > 0.0 {
            Ok(scale)
        } else {
            Err(FieldError::invalid_parameter(
                "scale",
                format!("resolved to {} for surface area {}", scale, surface.surface_area()),
            ))
        }
    }

    /// Load parameters from a TOML string.
    pub fn from_toml(toml_str: &str) -> FieldResult<Self> {
        toml::from_str(toml_str).map_err(|e| FieldError::invalid_config(e.to_string()))
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> FieldResult<String> {
        toml::to_string_pretty(self).map_err(|e| FieldError::invalid_config(e.to_string()))
    }

    /// Load parameters from a JSON string.
    pub fn from_json(json_str: &str) -> FieldResult<Self> {
        serde_json::from_str(json_str).map_err(|e| FieldError::invalid_config(e.to_string()))
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> FieldResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| FieldError::invalid_config(e.to_string()))
    }

    /// Load parameters from a file; `.json` files are read as JSON, anything
    /// else as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> FieldResult<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| FieldError::io_read(path, e))?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&contents)
        } else {
            Self::from_toml(&contents)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Mesh, Vertex};
    use approx::assert_relative_eq;

    fn unit_square() -> SurfaceModel {
        let mesh = Mesh {
            vertices: vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(1.0, 0.0, 0.0),
                Vertex::from_coords(1.0, 1.0, 0.0),
                Vertex::from_coords(0.0, 1.0, 0.0),
            ],
            faces: vec![[0, 1, 2], [0, 2, 3]],
        };
        SurfaceModel::from_mesh(&mesh).unwrap()
    }

    #[test]
    fn test_params_default() {
        let params = FieldParams::default();
        assert_eq!(params.scale, ScaleSpec::Auto);
        assert_eq!(params.orientation_iterations, 100);
        assert_eq!(params.position_iterations, 100);
        assert_eq!(params.seed, 0);
    }

    #[test]
    fn test_presets() {
        assert_eq!(FieldParams::fast().orientation_iterations, 10);
        assert_eq!(FieldParams::high_quality().position_iterations, 250);
        let p = FieldParams::with_scale(0.01).seed(7).iterations(3, 4);
        assert_eq!(p.scale, ScaleSpec::Absolute(0.01));
        assert_eq!((p.seed, p.orientation_iterations, p.position_iterations), (7, 3, 4));
    }

    #[test]
    fn test_validate_rejects_bad_scale() {
        assert!(FieldParams::with_scale(0.0).validate().is_err());
        assert!(FieldParams::with_scale(-1.0).validate().is_err());
        assert!(FieldParams::with_scale(f64::NAN).validate().is_err());
        assert!(FieldParams::with_target_vertex_count(0).validate().is_err());
        assert!(FieldParams::with_scale(0.5).validate().is_ok());
    }

    #[test]
    fn test_resolve_scale() {
        let surface = unit_square();
        let scale = FieldParams::with_target_vertex_count(4)
            .resolve_scale(&surface)
            .unwrap();
        assert_relative_eq!(scale, 0.5, epsilon = 1e-12);

        // 4 vertices / 16 rounds down to zero and is clamped to one.
        let auto = FieldParams::default().resolve_scale(&surface).unwrap();
        assert_relative_eq!(auto, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_toml_config() {
        let params = FieldParams::from_toml(
            r#"
            seed = 42
            position_iterations = 5

            [scale]
            absolute = 0.01
            "#,
        )
        .unwrap();
        assert_eq!(params.seed, 42);
        assert_eq!(params.position_iterations, 5);
        assert_eq!(params.orientation_iterations, DEFAULT_ITERATIONS);
        assert_eq!(params.scale, ScaleSpec::Absolute(0.01));

        let text = params.to_toml().unwrap();
        assert_eq!(FieldParams::from_toml(&text).unwrap(), params);
    }

    #[test]
    fn test_json_config() {
        let params = FieldParams::with_target_vertex_count(500).seed(3);
        let json = params.to_json().unwrap();
        assert!(json.contains("target_vertex_count"));
        assert_eq!(FieldParams::from_json(&json).unwrap(), params);
    }

    #[test]
    fn test_invalid_config() {
        let err = FieldParams::from_toml("seed = \"zero\"").unwrap_err();
        assert!(matches!(err, FieldError::InvalidConfig { .. }));
    }
}
