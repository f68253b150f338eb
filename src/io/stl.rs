//! STL (stereolithography) format support.
//!
//! STL stores every triangle with its own copies of its corners, so loaded
//! geometry is welded on [`MERGE_TOLERANCE`] before it is returned. Binary and
//! ASCII files are both read; files are always written as binary.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{Geometry, MERGE_TOLERANCE};

/// Load geometry from an STL file.
///
/// # Example
///
/// ```no_run
/// use wingloop::io::stl;
///
/// let geometry = stl::load("model.stl").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<Geometry> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);

    let stl = stl_io::read_stl(&mut reader).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let positions = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0], v[1], v[2]))
        .collect();
    let triangles = stl
        .faces
        .iter()
        .map(|t| t.vertices.map(|i| i as u32))
        .collect();

    let geometry = Geometry::new(positions, triangles).welded(MERGE_TOLERANCE);
    if geometry.triangles.is_empty() {
        return Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "STL file contains no valid triangles".to_string(),
        });
    }

    Ok(geometry)
}

/// Save geometry to a binary STL file, with per-triangle normals.
pub fn save<P: AsRef<Path>>(geometry: &Geometry, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);

    let mut triangles = Vec::with_capacity(geometry.num_triangles());
    for (face, t) in geometry.triangles.iter().enumerate() {
        let corner = |k: usize| {
            geometry
                .positions
                .get(t[k] as usize)
                .ok_or(MeshError::InvalidVertexIndex {
                    face,
                    vertex: t[k] as usize,
                })
        };
        let (p0, p1, p2) = (corner(0)?, corner(1)?, corner(2)?);

        let n = (p1 - p0)
            .cross(&(p2 - p0))
            .try_normalize(f32::MIN_POSITIVE)
            .unwrap_or_default();

        triangles.push(stl_io::Triangle {
            normal: stl_io::Normal::new([n.x, n.y, n.z]),
            vertices: [p0, p1, p2].map(|p| stl_io::Vertex::new([p.x, p.y, p.z])),
        });
    }

    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}
