//! Spans and structured events emitted by the crate.
//!
//! Nothing is printed unless the application installs a subscriber, e.g.
//! `tracing_subscriber::fmt().with_env_filter("mesh_field=debug").init()`.
//!
//! Targets:
//!
//! - `mesh_field::timing`: one INFO event per finished operation
//! - `mesh_field::progress`: one DEBUG event per sweep
//! - `mesh_field::surface`: DEBUG surface statistics before smoothing

use std::time::Instant;
use tracing::span::EnteredSpan;
use tracing::{Span, debug, info};

use crate::surface::SurfaceModel;

/// Keeps an `operation` span entered and logs the elapsed time when dropped.
pub struct OperationTimer {
    name: &'static str,
    start: Instant,
    _span: EnteredSpan,
}

impl OperationTimer {
    pub fn new(name: &'static str) -> Self {
        Self::enter(name, tracing::info_span!("operation", op = name))
    }

    /// Timer for a smoothing pass; the span records its size.
    pub fn with_context(name: &'static str, vertex_count: usize, iterations: usize) -> Self {
        Self::enter(
            name,
            tracing::info_span!("operation", op = name, vertices = vertex_count, iterations),
        )
    }

    fn enter(name: &'static str, span: Span) -> Self {
        let span = span.entered();
        debug!(target: "mesh_field::timing", "started");
        Self {
            name,
            start: Instant::now(),
            _span: span,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1e3
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        info!(
            target: "mesh_field::timing",
            op = self.name,
            elapsed_ms = self.elapsed_ms(),
            "finished"
        );
    }
}

/// Connectivity and extent of `surface`, tagged with the caller's name.
pub fn log_surface_stats(surface: &SurfaceModel, caller: &str) {
    let (min, max) = surface.bounds();
    let extent = max - min;
    debug!(
        target: "mesh_field::surface",
        caller,
        vertices = surface.vertex_count(),
        faces = surface.face_count(),
        edges = surface.edge_count(),
        area = surface.surface_area(),
        extent = ?[extent.x, extent.y, extent.z],
        "surface"
    );
}

/// One finished sweep of `stage`.
pub fn log_progress(stage: &str, sweep: usize, sweeps: usize) {
    let percent = (sweep * 100).checked_div(sweeps).unwrap_or(0);
    debug!(target: "mesh_field::progress", stage, sweep, sweeps, percent, "sweep");
}
