//! mesh-field solve command - compute and save the position field.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use mesh_field::{FieldParams, FieldReport, Mesh, ScaleSpec, compute_field};
use serde::Serialize;

use crate::{Cli, OutputFormat, output};

/// Command-line values that override the parameter file.
#[derive(Debug, Default)]
pub struct Overrides<'a> {
    pub config: Option<&'a Path>,
    pub scale: Option<f64>,
    pub target_vertices: Option<usize>,
    pub orientation_iterations: Option<usize>,
    pub position_iterations: Option<usize>,
    pub seed: Option<u64>,
}

impl Overrides<'_> {
    /// Start from the parameter file (or defaults) and apply overrides.
    fn params(&self) -> Result<FieldParams> {
        let mut params = match self.config {
            Some(path) => FieldParams::from_file(path)
                .with_context(|| format!("cannot use parameter file {}", path.display()))?,
            None => FieldParams::default(),
        };

        if let Some(scale) = self.scale {
            params.scale = ScaleSpec::Absolute(scale);
        }
        if let Some(count) = self.target_vertices {
            params.scale = ScaleSpec::TargetVertexCount(count);
        }
        if let Some(n) = self.orientation_iterations {
            params.orientation_iterations = n;
        }
        if let Some(n) = self.position_iterations {
            params.position_iterations = n;
        }
        if let Some(seed) = self.seed {
            params.seed = seed;
        }
        Ok(params)
    }
}

#[derive(Serialize)]
struct SolveResult<'a> {
    input: String,
    output: String,
    success: bool,
    params: &'a FieldParams,
    report: &'a FieldReport,
}

pub fn run(input: &Path, output_path: &Path, overrides: &Overrides<'_>, cli: &Cli) -> Result<()> {
    let params = overrides.params()?;
    let mesh =
        Mesh::load(input).with_context(|| format!("cannot read {}", input.display()))?;

    output::info(
        &format!(
            "Computing field ({} vertices, {} + {} sweeps)...",
            mesh.vertex_count(),
            params.orientation_iterations,
            params.position_iterations
        ),
        cli.format,
        cli.quiet,
    );

    let solution = compute_field(&mesh, &params)?;

    solution
        .save(output_path)
        .with_context(|| format!("cannot write {}", output_path.display()))?;

    let result = SolveResult {
        input: input.display().to_string(),
        output: output_path.display().to_string(),
        success: true,
        params: &params,
        report: &solution.report,
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&result, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                output::success(
                    &format!("Position field saved to {}", output_path.display()),
                    cli.format,
                    cli.quiet,
                );
                println!("  {}: {}", "Seed".cyan(), params.seed);
                print!("{}", solution.report);
            }
        }
    }

    Ok(())
}
