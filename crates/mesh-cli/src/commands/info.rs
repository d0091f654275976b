//! `info`: connectivity, extent and the automatic lattice spacing of a mesh.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use mesh_field::{Mesh, ScaleSpec, SurfaceModel};
use serde::Serialize;

use crate::{Cli, OutputFormat, output};

#[derive(Serialize)]
struct MeshInfo {
    path: String,
    vertices: usize,
    faces: usize,
    edges: usize,
    bounds: Extent,
    surface_area: f64,
    auto_scale: f64,
}

#[derive(Serialize)]
struct Extent {
    min: [f64; 3],
    max: [f64; 3],
    dimensions: [f64; 3],
}

pub fn run(input: &Path, cli: &Cli) -> Result<()> {
    let mesh =
        Mesh::load(input).with_context(|| format!("cannot read {}", input.display()))?;
    let surface = SurfaceModel::from_mesh(&mesh)?;

    let (min, max) = surface.bounds();
    let dims = max - min;
    let info = MeshInfo {
        path: input.display().to_string(),
        vertices: surface.vertex_count(),
        faces: surface.face_count(),
        edges: surface.edge_count(),
        bounds: Extent {
            min: [min.x, min.y, min.z],
            max: [max.x, max.y, max.z],
            dimensions: [dims.x, dims.y, dims.z],
        },
        surface_area: surface.surface_area(),
        auto_scale: ScaleSpec::Auto.resolve(&surface),
    };

    if matches!(cli.format, OutputFormat::Json) {
        output::print(&info, cli.format, cli.quiet);
        return Ok(());
    }
    if cli.quiet {
        return Ok(());
    }

    let fmt_point = |p: [f64; 3]| format!("({:.4}, {:.4}, {:.4})", p[0], p[1], p[2]);
    let d = info.bounds.dimensions;
    let rows = [
        ("vertices", info.vertices.to_string()),
        ("faces", info.faces.to_string()),
        ("edges", info.edges.to_string()),
        ("extent", format!("{:.4} x {:.4} x {:.4}", d[0], d[1], d[2])),
        ("min", fmt_point(info.bounds.min)),
        ("max", fmt_point(info.bounds.max)),
        ("area", format!("{:.6}", info.surface_area)),
        ("auto scale", format!("{:.6}", info.auto_scale)),
    ];

    println!("{}", info.path.bold());
    for (label, value) in rows {
        println!("  {:<12}{}", label.cyan(), value);
    }

    Ok(())
}
