//! PLY (Stanford polygon) format support.
//!
//! Any PLY encoding ply-rs understands can be loaded. Polygons with more than
//! three corners are fan-triangulated. Files are written as ASCII.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{MeshError, Result};
use crate::mesh::Geometry;

/// Load geometry from a PLY file.
///
/// # Example
///
/// ```no_run
/// use wingloop::io::ply;
///
/// let geometry = ply::load("model.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<Geometry> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);
    let load_error = |message: &str| MeshError::LoadError {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| load_error(&e.to_string()))?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| load_error("PLY file has no vertex element"))?;

    let mut positions = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let coord = |name: &str| {
            float_property(vertex, name)
                .ok_or_else(|| load_error(&format!("vertex missing {} coordinate", name)))
        };
        positions.push(Point3::new(coord("x")?, coord("y")?, coord("z")?));
    }

    let face_element = ply
        .payload
        .get("face")
        .ok_or_else(|| load_error("PLY file has no face element"))?;

    let mut polygons = Vec::with_capacity(face_element.len());
    for face in face_element {
        let indices = list_property(face, "vertex_indices")
            .or_else(|| list_property(face, "vertex_index"))
            .ok_or_else(|| load_error("face missing vertex_indices property"))?;
        polygons.push(indices);
    }

    let geometry = Geometry::from_polygons(positions, &polygons);
    if geometry.triangles.is_empty() {
        return Err(load_error("PLY file contains no faces"));
    }

    Ok(geometry)
}

fn float_property(element: &DefaultElement, name: &str) -> Option<f32> {
    match element.get(name)? {
        Property::Float(v) => Some(*v),
        Property::Double(v) => Some(*v as f32),
        Property::Int(v) => Some(*v as f32),
        Property::UInt(v) => Some(*v as f32),
        Property::Short(v) => Some(*v as f32),
        Property::UShort(v) => Some(*v as f32),
        Property::Char(v) => Some(*v as f32),
        Property::UChar(v) => Some(*v as f32),
        _ => None,
    }
}

fn list_property(element: &DefaultElement, name: &str) -> Option<Vec<u32>> {
    match element.get(name)? {
        Property::ListInt(v) => v.iter().map(|&x| u32::try_from(x).ok()).collect(),
        Property::ListUInt(v) => Some(v.clone()),
        Property::ListShort(v) => v.iter().map(|&x| u32::try_from(x).ok()).collect(),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as u32).collect()),
        Property::ListChar(v) => v.iter().map(|&x| u32::try_from(x).ok()).collect(),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as u32).collect()),
        _ => None,
    }
}

/// Save geometry to an ASCII PLY file.
pub fn save<P: AsRef<Path>>(geometry: &Geometry, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);

    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by wingloop")?;
    writeln!(writer, "element vertex {}", geometry.num_vertices())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "element face {}", geometry.num_triangles())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for p in &geometry.positions {
        writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
    }
    for t in &geometry.triangles {
        writeln!(writer, "3 {} {} {}", t[0], t[1], t[2])?;
    }

    writer.flush()?;
    Ok(())
}
