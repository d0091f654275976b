//! Mesh and point-field I/O in the OFF format.
//!
//! Input meshes are read from OFF files: an `OFF` header, a counts line
//! `nverts nfaces nedges`, one `x y z` line per vertex and one
//! `k i0 i1 ... ik-1` line per face. Blank lines and `#` comments are
//! ignored, and polygons with more than three corners are fan-triangulated.
//!
//! Position fields are written as point-only OFF files (`OFF`, `n 0 0`, then
//! one point per line). Coordinates use the shortest representation that
//! parses back to the same `f64`.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use tracing::{debug, info};

use crate::error::{FieldError, FieldResult};
use crate::types::{Mesh, Vertex};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Off,
}

impl MeshFormat {
    /// Detect format from file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .and_then(|ext| match ext.as_str() {
                "off" => Some(MeshFormat::Off),
                _ => None,
            })
    }
}

fn detect_format(path: &Path) -> FieldResult<MeshFormat> {
    MeshFormat::from_path(path).ok_or_else(|| {
        FieldError::unsupported_format(path.extension().and_then(|e| e.to_str()).map(String::from))
    })
}

/// Load a mesh from file, detecting the format from the extension.
pub fn load_mesh(path: &Path) -> FieldResult<Mesh> {
    match detect_format(path)? {
        MeshFormat::Off => load_off(path),
    }
}

/// Save a mesh to file, detecting the format from the extension.
pub fn save_mesh(mesh: &Mesh, path: &Path) -> FieldResult<()> {
    match detect_format(path)? {
        MeshFormat::Off => save_off(mesh, path),
    }
}

/// Load a mesh from an OFF file.
pub fn load_off(path: &Path) -> FieldResult<Mesh> {
    let file = File::open(path).map_err(|e| FieldError::io_read(path, e))?;
    let mesh = parse_off(BufReader::new(file), path)?;

    info!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "read OFF"
    );
    if let Some((lo, hi)) = mesh.bounds() {
        debug!(min = ?lo.coords.as_slice(), max = ?hi.coords.as_slice(), "OFF bounds");
    }
    Ok(mesh)
}

/// Meaningful lines of an OFF document with their 1-based line numbers.
struct OffLines<'a, R> {
    lines: std::iter::Enumerate<std::io::Lines<R>>,
    path: &'a Path,
}

impl<R: BufRead> OffLines<'_, R> {
    /// Next non-blank line with comments stripped, or `None` at end of input.
    fn next_line(&mut self) -> FieldResult<Option<(usize, String)>> {
        for (index, line) in self.lines.by_ref() {
            let line = line.map_err(|e| FieldError::io_read(self.path, e))?;
            let content = match line.find('#') {
                Some(pos) => &line[..pos],
                None => line.as_str(),
            };
            let content = content.trim();
            if !content.is_empty() {
                return Ok(Some((index + 1, content.to_string())));
            }
        }
        Ok(None)
    }

    fn expect_line(&mut self, what: &str) -> FieldResult<(usize, String)> {
        self.next_line()?.ok_or_else(|| {
            FieldError::parse_error(self.path, format!("unexpected end of file, expected {}", what))
        })
    }
}

/// Parse an OFF document.
///
/// `path` is only used for error reporting.
pub fn parse_off<R: BufRead>(reader: R, path: &Path) -> FieldResult<Mesh> {
    let mut lines = OffLines {
        lines: reader.lines().enumerate(),
        path,
    };

    let (header_line, header) = lines.expect_line("OFF header")?;
    let mut tokens = header.split_whitespace();
    if tokens.next() != Some("OFF") {
        return Err(FieldError::parse_error_at(
            path,
            header_line,
            format!("expected 'OFF' header, found '{}'", header),
        ));
    }

    // Counts may share the header line.
    let rest: Vec<&str> = tokens.collect();
    let (counts_line, counts) = if rest.is_empty() {
        let (line_no, line) = lines.expect_line("element counts")?;
        (line_no, parse_counts(line.split_whitespace(), path, line_no)?)
    } else {
        (header_line, parse_counts(rest.into_iter(), path, header_line)?)
    };
    let (vertex_count, face_count) = counts;
    debug!(
        line = counts_line,
        vertices = vertex_count,
        faces = face_count,
        "OFF element counts"
    );

    // Counts come from untrusted input; let the vectors grow past this.
    const MAX_PREALLOCATION: usize = 1 << 20;
    let mut mesh = Mesh::with_capacity(
        vertex_count.min(MAX_PREALLOCATION),
        face_count.min(MAX_PREALLOCATION),
    );

    for _ in 0..vertex_count {
        let (line_no, line) = lines.expect_line("vertex coordinates")?;
        let coords: Vec<f64> = line
            .split_whitespace()
            .take(3)
            .map(|t| parse_token::<f64>(t, path, line_no, "coordinate"))
            .collect::<FieldResult<_>>()?;
        if coords.len() < 3 {
            return Err(FieldError::parse_error_at(
                path,
                line_no,
                format!("vertex needs 3 coordinates, found {}", coords.len()),
            ));
        }
        mesh.vertices.push(Vertex::from_coords(coords[0], coords[1], coords[2]));
    }

    for _ in 0..face_count {
        let (line_no, line) = lines.expect_line("face")?;
        let mut tokens = line.split_whitespace();
        let corner_count: usize = tokens
            .next()
            .map(|t| parse_token(t, path, line_no, "face size"))
            .transpose()?
            .unwrap_or(0);
        if corner_count < 3 {
            return Err(FieldError::parse_error_at(
                path,
                line_no,
                format!("face needs at least 3 vertices, found {}", corner_count),
            ));
        }

        let corners: Vec<u32> = tokens
            .take(corner_count)
            .map(|t| parse_token::<u32>(t, path, line_no, "vertex index"))
            .collect::<FieldResult<_>>()?;
        if corners.len() < corner_count {
            return Err(FieldError::parse_error_at(
                path,
                line_no,
                format!("face declares {} vertices but lists {}", corner_count, corners.len()),
            ));
        }
        if let Some(&bad) = corners.iter().find(|&&c| c as usize >= vertex_count) {
            return Err(FieldError::parse_error_at(
                path,
                line_no,
                format!("vertex index {} out of range (mesh has {} vertices)", bad, vertex_count),
            ));
        }

        for k in 1..corner_count - 1 {
            mesh.faces.push([corners[0], corners[k], corners[k + 1]]);
        }
    }

    Ok(mesh)
}

fn parse_counts<'a>(
    mut tokens: impl Iterator<Item = &'a str>,
    path: &Path,
    line_no: usize,
) -> FieldResult<(usize, usize)> {
    let mut next = |what: &str| -> FieldResult<usize> {
        let token = tokens.next().ok_or_else(|| {
            FieldError::parse_error_at(path, line_no, format!("missing {} count", what))
        })?;
        parse_token(token, path, line_no, what)
    };
    let vertices = next("vertex")?;
    let faces = next("face")?;
    Ok((vertices, faces))
}

fn parse_token<T: std::str::FromStr>(
    token: &str,
    path: &Path,
    line_no: usize,
    what: &str,
) -> FieldResult<T> {
    token.parse().map_err(|_| {
        FieldError::parse_error_at(path, line_no, format!("invalid {} '{}'", what, token))
    })
}

/// Save a full mesh to an OFF file.
pub fn save_off(mesh: &Mesh, path: &Path) -> FieldResult<()> {
    let file = File::create(path).map_err(|e| FieldError::io_write(path, e))?;
    let mut writer = BufWriter::new(file);
    write_off(mesh, &mut writer)
        .and_then(|_| writer.flush())
        .map_err(|e| FieldError::io_write(path, e))?;
    info!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "wrote OFF"
    );
    Ok(())
}

/// Write a full mesh in OFF format.
pub fn write_off<W: Write>(mesh: &Mesh, writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "OFF")?;
    writeln!(writer, "{} {} 0", mesh.vertex_count(), mesh.face_count())?;
    for v in &mesh.vertices {
        write_point(writer, &v.position)?;
    }
    for [a, b, c] in &mesh.faces {
        writeln!(writer, "3 {} {} {}", a, b, c)?;
    }
    Ok(())
}

/// Save a point field as a point-only OFF file.
pub fn save_point_field(points: &[Point3<f64>], path: &Path) -> FieldResult<()> {
    let file = File::create(path).map_err(|e| FieldError::io_write(path, e))?;
    let mut writer = BufWriter::new(file);
    write_point_field(&mut writer, points)
        .and_then(|_| writer.flush())
        .map_err(|e| FieldError::io_write(path, e))?;
    info!(path = %path.display(), points = points.len(), "wrote point field");
    Ok(())
}

/// Write a point field in point-only OFF format.
pub fn write_point_field<W: Write>(writer: &mut W, points: &[Point3<f64>]) -> std::io::Result<()> {
    writeln!(writer, "OFF")?;
    writeln!(writer, "{} 0 0", points.len())?;
    for p in points {
        write_point(writer, p)?;
    }
    Ok(())
}

fn write_point<W: Write>(writer: &mut W, p: &Point3<f64>) -> std::io::Result<()> {
    writeln!(writer, "{:e} {:e} {:e}", p.x, p.y, p.z)
}
