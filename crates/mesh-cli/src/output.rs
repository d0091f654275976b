//! Output helpers shared by all commands.
//!
//! Text mode prints colored status lines; JSON mode prints only the final
//! result object so the output can be piped into other tools.

use colored::Colorize;
use serde::Serialize;

use crate::OutputFormat;

/// Print a serializable result.
///
/// In JSON mode the value is pretty-printed to stdout. Text mode is a no-op
/// since commands render their own text.
pub fn print<T: Serialize>(value: &T, format: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    if let OutputFormat::Json = format {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("{}: failed to serialize output: {}", "Error".red().bold(), e),
        }
    }
}

/// Print an informational status line (text mode only).
pub fn info(message: &str, format: OutputFormat, quiet: bool) {
    if quiet || matches!(format, OutputFormat::Json) {
        return;
    }
    eprintln!("{} {}", "→".blue().bold(), message);
}

/// Print a success status line (text mode only).
pub fn success(message: &str, format: OutputFormat, quiet: bool) {
    if quiet || matches!(format, OutputFormat::Json) {
        return;
    }
    println!("{} {}", "✓".green().bold(), message);
}

/// Render a command failure on stderr.
///
/// Library errors carry a code, a recovery hint and sometimes a location;
/// anything else is printed with its cause chain.
pub fn error(err: &anyhow::Error) {
    eprintln!("{}: {}", "Error".red().bold(), err);
    match err.downcast_ref::<mesh_field::FieldError>() {
        Some(field_err) => {
            eprintln!("  {:<11}{}", "code".cyan(), field_err.code());
            if let Some(location) = field_err.location() {
                eprintln!("  {:<11}{}", "at".cyan(), location);
            }
            eprintln!("  {:<11}{}", "hint".green(), field_err.recovery_suggestion());
        }
        None => {
            for cause in err.chain().skip(1) {
                eprintln!("  {:<11}{}", "because".yellow(), cause);
            }
        }
    }
}
