//! mesh-field: Command-line interface for orientation and position fields.
//!
//! This tool computes the cross field and position field of a triangle mesh
//! from the command line, suitable for scripting and batch processing.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=mesh_field=info` - Basic operation logging
//! - `RUST_LOG=mesh_field=debug` - Per-sweep progress logging
//! - `RUST_LOG=mesh_field::timing=info` - Performance timing
//! - `RUST_LOG=debug` - All debug output
//!
//! # Example
//!
//! ```bash
//! # Solve with an explicit lattice spacing
//! RUST_LOG=mesh_field=info mesh-field solve bunny.off -o positions.off --scale 0.01
//!
//! # Inspect a mesh
//! mesh-field info bunny.off --format json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod output;

use commands::{info, solve};

/// mesh-field - Compute field-aligned orientation and position fields.
///
/// Smooths a 4-fold symmetric cross field and a matching local lattice over
/// a triangle mesh and writes the position field as an OFF point set.
#[derive(Parser)]
#[command(name = "mesh-field")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// How results are printed
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print nothing, not even errors; only the exit status reports failure
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log more: -v info, -vv per-sweep debug, -vvv everything
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored, aligned tables
    Text,
    /// One pretty-printed JSON object on stdout
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh statistics and the automatic lattice spacing
    Info {
        /// Input mesh file (.off)
        input: PathBuf,
    },

    /// Compute the orientation and position fields
    Solve {
        /// Input mesh file (.off)
        input: PathBuf,

        /// Output file for the position field (.off)
        #[arg(short, long)]
        output: PathBuf,

        /// Parameter file (TOML, or JSON with a .json extension)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Lattice spacing in mesh units
        #[arg(long, conflicts_with = "target_vertices")]
        scale: Option<f64>,

        /// Choose the spacing that yields about this many output vertices
        #[arg(long)]
        target_vertices: Option<usize>,

        /// Orientation smoothing sweeps
        #[arg(long)]
        orientation_iterations: Option<usize>,

        /// Position smoothing sweeps
        #[arg(long)]
        position_iterations: Option<usize>,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Log to stderr. `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let directive = match verbose {
        0 => "warn",
        1 => "mesh_field=info",
        2 => "mesh_field=debug",
        _ => "trace",
    };
    let filter = match std::env::var_os(EnvFilter::DEFAULT_ENV) {
        Some(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)),
        None => EnvFilter::new(directive),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Info { input } => info::run(input, cli),
        Commands::Solve {
            input,
            output,
            config,
            scale,
            target_vertices,
            orientation_iterations,
            position_iterations,
            seed,
        } => {
            let overrides = solve::Overrides {
                config: config.as_deref(),
                scale: *scale,
                target_vertices: *target_vertices,
                orientation_iterations: *orientation_iterations,
                position_iterations: *position_iterations,
                seed: *seed,
            };
            solve::run(input, output, &overrides, cli)
        }
    }
}

fn main() -> ExitCode {
    #[cfg(debug_assertions)]
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if !cli.quiet {
                output::error(&err);
            }
            ExitCode::FAILURE
        }
    }
}
