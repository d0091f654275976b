#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Write;
use tempfile::NamedTempFile;

fuzz_target!(|data: &[u8]| {
    // Write fuzz data to a temporary file with .off extension
    let mut file = match NamedTempFile::with_suffix(".off") {
        Ok(f) => f,
        Err(_) => return,
    };

    if file.write_all(data).is_err() {
        return;
    }

    // Parsing and building the surface model must never panic
    if let Ok(mesh) = mesh_field::Mesh::load(file.path()) {
        let _ = mesh_field::SurfaceModel::from_mesh(&mesh);
    }
});
