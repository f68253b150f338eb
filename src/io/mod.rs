//! Geometry file I/O.
//!
//! Loaders are collaborators of the core rather than part of it: they only
//! turn a file into [`Geometry`] buffers. Topology is built afterwards with
//! [`WingedMesh::build`](crate::mesh::WingedMesh::build), which is where open
//! or non-manifold input gets rejected.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | 1-based indices, polygons fan-triangulated |
//! | STL | `.stl` | ✓ | ✓ | Binary and ASCII, welded on load |
//! | PLY | `.ply` | ✓ | ✓ | ASCII on save |
//!
//! # Usage
//!
//! ```no_run
//! use wingloop::io::{load, save};
//! use wingloop::mesh::WingedMesh;
//!
//! let geometry = load("model.obj").unwrap();
//! let mesh = WingedMesh::build(&geometry).unwrap();
//! save(&mesh.to_geometry(), "output.stl").unwrap();
//! ```

pub mod obj;
pub mod ply;
pub mod stl;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::Geometry;

/// Supported geometry file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// STL (stereolithography) format.
    Stl,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "stl" => Some(Format::Stl),
            "ply" => Some(Format::Ply),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load geometry from a file, choosing the format by extension.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Geometry> {
    let path = path.as_ref();
    let geometry = match detect(path)? {
        Format::Obj => obj::load(path)?,
        Format::Stl => stl::load(path)?,
        Format::Ply => ply::load(path)?,
    };
    log::debug!(
        "loaded {}: {} vertices, {} triangles",
        path.display(),
        geometry.num_vertices(),
        geometry.num_triangles()
    );
    Ok(geometry)
}

/// Save geometry to a file, choosing the format by extension.
pub fn save<P: AsRef<Path>>(geometry: &Geometry, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::save(geometry, path),
        Format::Stl => stl::save(geometry, path),
        Format::Ply => ply::save(geometry, path),
    }
}
