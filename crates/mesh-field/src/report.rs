//! Quality report for a computed field.

use std::collections::HashSet;
use std::fmt;

use rayon::prelude::*;
use serde::Serialize;

use crate::compat::compat_orientation;
use crate::field::InstantField;

/// Summary statistics and invariant diagnostics of a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldReport {
    /// Number of surface vertices.
    pub vertex_count: usize,

    /// Number of undirected surface edges.
    pub edge_count: usize,

    /// Lattice spacing the positions were snapped with.
    pub scale: f64,

    /// Mean over edges of `1 - dot` of the resolved cross-field
    /// representatives. Zero for a perfectly aligned field.
    pub orientation_energy: f64,

    /// Largest deviation of an orientation's length from one.
    pub max_orientation_norm_error: f64,

    /// Largest absolute dot product between an orientation and its normal.
    pub max_orientation_tangent_error: f64,

    /// Largest distance of a position sample from its vertex's tangent plane.
    pub max_position_normal_offset: f64,

    /// Number of distinct position samples, quantized at `scale * 1e-3`.
    pub distinct_positions: usize,
}

impl FieldReport {
    /// Analyze `field`, whose positions were smoothed with `scale`.
    pub fn analyze(field: &InstantField, scale: f64) -> Self {
        let surface = field.surface();
        let normals = surface.normals();
        let vertices = surface.positions();
        let orientations = field.orientations();
        let positions = field.positions();

        let (energy_sum, edge_count) = (0..surface.vertex_count())
            .into_par_iter()
            .map(|i| {
                surface
                    .neighbors(i)
                    .iter()
                    .map(|&j| j as usize)
                    .filter(|&j| j > i)
                    .fold((0.0, 0usize), |(sum, count), j| {
                        let (a, b) = compat_orientation(
                            &orientations[i],
                            &normals[i],
                            &orientations[j],
                            &normals[j],
                        );
                        (sum + (1.0 - a.dot(&b)), count + 1)
                    })
            })
            .reduce(|| (0.0, 0), |a, b| (a.0 + b.0, a.1 + b.1));

        let max_orientation_norm_error = orientations
            .par_iter()
            .map(|o| (o.norm() - 1.0).abs())
            .reduce(|| 0.0, f64::max);

        let max_orientation_tangent_error = orientations
            .par_iter()
            .zip(normals.par_iter())
            .map(|(o, n)| o.dot(n).abs())
            .reduce(|| 0.0, f64::max);

        let max_position_normal_offset = positions
            .par_iter()
            .zip(vertices.par_iter())
            .zip(normals.par_iter())
            .map(|((p, v), n)| (p - v).dot(n).abs())
            .reduce(|| 0.0, f64::max);

        let quantum = scale * 1e-3;
        let distinct_positions = positions
            .iter()
            .map(|p| {
                [
                    (p.x / quantum).round() as i64,
                    (p.y / quantum).round() as i64,
                    (p.z / quantum).round() as i64,
                ]
            })
            .collect::<HashSet<_>>()
            .len();

        Self {
            vertex_count: surface.vertex_count(),
            edge_count,
            scale,
            orientation_energy: if edge_count > 0 {
                energy_sum / edge_count as f64
            } else {
                0.0
            },
            max_orientation_norm_error,
            max_orientation_tangent_error,
            max_position_normal_offset,
            distinct_positions,
        }
    }

    /// Whether every invariant diagnostic is within `tolerance`.
    pub fn is_consistent(&self, tolerance: f64) -> bool {
        self.max_orientation_norm_error <= tolerance
            && self.max_orientation_tangent_error <= tolerance
            && self.max_position_normal_offset <= tolerance
    }
}

impl fmt::Display for FieldReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Field Report")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Edges: {}", self.edge_count)?;
        writeln!(f, "  Scale: {:.6}", self.scale)?;
        writeln!(f, "  Orientation energy: {:.6}", self.orientation_energy)?;
        writeln!(f, "  Distinct positions: {}", self.distinct_positions)?;
        writeln!(
            f,
            "  Invariant errors: norm {:.2e}, tangent {:.2e}, plane offset {:.2e}",
            self.max_orientation_norm_error,
            self.max_orientation_tangent_error,
            self.max_position_normal_offset
        )
    }
}
