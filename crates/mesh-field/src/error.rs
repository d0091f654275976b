//! Failures at the boundary of the crate.
//!
//! Snapping, compat resolution and smoothing cannot fail. Everything that
//! can (files, raw mesh data, parameters) reports a [`FieldError`] that
//! doubles as a `miette` diagnostic.
//!
//! # Codes
//!
//! Stable `FIELD-NNNN` codes, grouped by the thousands digit:
//! `1` for files, `2` for mesh data, `3` for parameters.
//!
//! # Usage
//!
//! ```
//! use mesh_field::{ErrorCode, FieldError};
//!
//! let err = FieldError::invalid_vertex_index(5, 100, 50);
//! assert_eq!(err.code(), ErrorCode::InvalidVertexIndex);
//! eprintln!("{}: {}", err.code(), err.recovery_suggestion());
//! ```

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Shorthand used by every fallible function in the crate.
pub type FieldResult<T> = Result<T, FieldError>;

/// Stable identifier of a [`FieldError`] variant, see [`ErrorCode::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    IoRead = 1001,
    IoWrite = 1002,
    ParseError = 1003,
    UnsupportedFormat = 1004,

    InvalidVertexIndex = 2001,
    InvalidCoordinate = 2002,
    EmptyMesh = 2003,

    InvalidParameter = 3001,
    InvalidConfig = 3002,
}

impl ErrorCode {
    /// `FIELD-` followed by the four-digit discriminant.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::IoRead => "FIELD-1001",
            ErrorCode::IoWrite => "FIELD-1002",
            ErrorCode::ParseError => "FIELD-1003",
            ErrorCode::UnsupportedFormat => "FIELD-1004",
            ErrorCode::InvalidVertexIndex => "FIELD-2001",
            ErrorCode::InvalidCoordinate => "FIELD-2002",
            ErrorCode::EmptyMesh => "FIELD-2003",
            ErrorCode::InvalidParameter => "FIELD-3001",
            ErrorCode::InvalidConfig => "FIELD-3002",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a caller can do about an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// Fix the OFF document by hand or re-export it.
    RepairOffFile { hint: String },
    /// Inspect the input for the listed problems.
    InspectInput { checks: Vec<String> },
    /// Convert the mesh to OFF first.
    ConvertToOff { from: Option<String> },
    /// Change the listed parameters.
    AdjustParameters { parameters: Vec<(String, String)> },
    /// Nothing to suggest.
    None,
}

impl std::fmt::Display for RecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecoverySuggestion::RepairOffFile { hint } => write!(f, "Fix the OFF file: {}", hint),
            RecoverySuggestion::InspectInput { checks } => {
                write!(f, "Inspect the input for: {}", checks.join(", "))
            }
            RecoverySuggestion::ConvertToOff { from: Some(ext) } => {
                write!(f, "Convert the .{} file to OFF (for example with meshlab)", ext)
            }
            RecoverySuggestion::ConvertToOff { from: None } => {
                write!(f, "Give the input file an .off extension")
            }
            RecoverySuggestion::AdjustParameters { parameters } => {
                f.write_str("Change ")?;
                for (i, (name, advice)) in parameters.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "`{}`: {}", name, advice)?;
                }
                Ok(())
            }
            RecoverySuggestion::None => f.write_str("No suggestion available"),
        }
    }
}

/// Where in the input an error was found.
#[derive(Debug, Clone)]
pub enum FieldLocation {
    Vertex { index: usize },
    Face { index: usize },
    /// A file, and the 1-based line when the reader knows it.
    File { path: PathBuf, line: Option<usize> },
}

impl std::fmt::Display for FieldLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldLocation::Vertex { index } => write!(f, "vertex {}", index),
            FieldLocation::Face { index } => write!(f, "face {}", index),
            FieldLocation::File { path, line } => match line {
                Some(l) => write!(f, "{}:{}", path.display(), l),
                None => write!(f, "{}", path.display()),
            },
        }
    }
}

/// Everything that can go wrong before or after smoothing.
#[derive(Debug, Error, Diagnostic)]
pub enum FieldError {
    #[error("cannot open {path}")]
    #[diagnostic(
        code(field::io::read),
        help("{} must exist and be readable by the current user", path.display())
    )]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}")]
    #[diagnostic(
        code(field::io::write),
        help("the parent directory of {} must exist and accept new files", path.display())
    )]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a well-formed OFF document.
    #[error("{path} is not valid OFF: {details}")]
    #[diagnostic(
        code(field::parse::error),
        help("expected `OFF`, then `V F E` counts, V lines of `x y z`, F lines of `k i0 .. ik-1`")
    )]
    ParseError {
        path: PathBuf,
        line: Option<usize>,
        details: String,
    },

    /// The extension names no format this crate reads or writes.
    #[error("no reader or writer for extension {extension:?}")]
    #[diagnostic(code(field::format::unsupported), help("only .off files are handled"))]
    UnsupportedFormat { extension: Option<String> },

    #[error("nothing to smooth: {details}")]
    #[diagnostic(
        code(field::validation::empty),
        help("normals and neighbors come from faces, so at least one triangle is required")
    )]
    EmptyMesh { details: String },

    #[error("face {face_index} uses vertex {vertex_index} of {vertex_count} vertices")]
    #[diagnostic(
        code(field::validation::vertex_index),
        help("face indices are zero-based and must stay below the vertex count")
    )]
    InvalidVertexIndex {
        face_index: usize,
        vertex_index: u32,
        vertex_count: usize,
    },

    #[error("vertex {vertex_index} has non-finite {coordinate} = {value}")]
    #[diagnostic(
        code(field::validation::coordinate),
        help("remove or fix vertices with NaN or infinite coordinates")
    )]
    InvalidCoordinate {
        vertex_index: usize,
        coordinate: &'static str,
        value: f64,
    },

    #[error("`{name}` {details}")]
    #[diagnostic(code(field::params::invalid))]
    InvalidParameter { name: &'static str, details: String },

    /// A parameter file that does not decode into `FieldParams`.
    #[error("bad parameter file: {details}")]
    #[diagnostic(
        code(field::params::config),
        help("write TOML, or JSON with a .json extension, using the FieldParams field names")
    )]
    InvalidConfig { details: String },
}

impl FieldError {
    /// Stable code for scripts and logs.
    pub fn code(&self) -> ErrorCode {
        match self {
            FieldError::IoRead { .. } => ErrorCode::IoRead,
            FieldError::IoWrite { .. } => ErrorCode::IoWrite,
            FieldError::ParseError { .. } => ErrorCode::ParseError,
            FieldError::UnsupportedFormat { .. } => ErrorCode::UnsupportedFormat,
            FieldError::EmptyMesh { .. } => ErrorCode::EmptyMesh,
            FieldError::InvalidVertexIndex { .. } => ErrorCode::InvalidVertexIndex,
            FieldError::InvalidCoordinate { .. } => ErrorCode::InvalidCoordinate,
            FieldError::InvalidParameter { .. } => ErrorCode::InvalidParameter,
            FieldError::InvalidConfig { .. } => ErrorCode::InvalidConfig,
        }
    }

    /// What the caller could change to get past this error.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        let inspect = |checks: &[&str]| RecoverySuggestion::InspectInput {
            checks: checks.iter().map(|c| (*c).to_string()).collect(),
        };
        match self {
            FieldError::IoRead { .. } => inspect(&["path spelling", "read permissions"]),
            FieldError::IoWrite { .. } => inspect(&["output directory", "write permissions"]),
            FieldError::ParseError { line, .. } => RecoverySuggestion::RepairOffFile {
                hint: match line {
                    Some(l) => format!("line {} does not match the expected OFF layout", l),
                    None => "the file ends before all declared vertices and faces".into(),
                },
            },
            FieldError::UnsupportedFormat { extension } => RecoverySuggestion::ConvertToOff {
                from: extension.clone(),
            },
            FieldError::EmptyMesh { .. } => inspect(&["triangle faces present", "vertex count"]),
            FieldError::InvalidVertexIndex { .. } => {
                inspect(&["zero-based face indices", "vertex count header"])
            }
            FieldError::InvalidCoordinate { .. } => inspect(&["NaN or infinite coordinates"]),
            FieldError::InvalidParameter { name, .. } => RecoverySuggestion::AdjustParameters {
                parameters: vec![((*name).into(), "use a positive, finite value".into())],
            },
            FieldError::InvalidConfig { .. } => RecoverySuggestion::AdjustParameters {
                parameters: vec![(
                    "config".into(),
                    "keys are orientation_iterations, position_iterations, seed, scale".into(),
                )],
            },
        }
    }

    /// The vertex, face or file line the error points at, if any.
    pub fn location(&self) -> Option<FieldLocation> {
        match self {
            FieldError::InvalidVertexIndex { face_index, .. } => {
                Some(FieldLocation::Face { index: *face_index })
            }
            FieldError::InvalidCoordinate { vertex_index, .. } => Some(FieldLocation::Vertex {
                index: *vertex_index,
            }),
            FieldError::ParseError { path, line, .. } => Some(FieldLocation::File {
                path: path.clone(),
                line: *line,
            }),
            FieldError::IoRead { path, .. } | FieldError::IoWrite { path, .. } => {
                Some(FieldLocation::File {
                    path: path.clone(),
                    line: None,
                })
            }
            _ => None,
        }
    }

    pub fn io_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FieldError::IoRead {
            path: path.into(),
            source,
        }
    }

    pub fn io_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FieldError::IoWrite {
            path: path.into(),
            source,
        }
    }

    /// Malformed input with no line to point at, such as a truncated file.
    pub fn parse_error(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        FieldError::ParseError {
            path: path.into(),
            line: None,
            details: details.into(),
        }
    }

    pub fn parse_error_at(path: impl Into<PathBuf>, line: usize, details: impl Into<String>) -> Self {
        FieldError::ParseError {
            path: path.into(),
            line: Some(line),
            details: details.into(),
        }
    }

    pub fn invalid_vertex_index(face_index: usize, vertex_index: u32, vertex_count: usize) -> Self {
        FieldError::InvalidVertexIndex {
            face_index,
            vertex_index,
            vertex_count,
        }
    }

    pub fn invalid_coordinate(vertex_index: usize, coordinate: &'static str, value: f64) -> Self {
        FieldError::InvalidCoordinate {
            vertex_index,
            coordinate,
            value,
        }
    }

    pub fn empty_mesh(details: impl Into<String>) -> Self {
        FieldError::EmptyMesh {
            details: details.into(),
        }
    }

    pub fn invalid_parameter(name: &'static str, details: impl Into<String>) -> Self {
        FieldError::InvalidParameter {
            name,
            details: details.into(),
        }
    }

    pub fn invalid_config(details: impl Into<String>) -> Self {
        FieldError::InvalidConfig {
            details: details.into(),
        }
    }

    pub fn unsupported_format(extension: Option<String>) -> Self {
        FieldError::UnsupportedFormat { extension }
    }
}
