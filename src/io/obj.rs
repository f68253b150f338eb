//! Wavefront OBJ format support.
//!
//! Only `v` and `f` records are read; everything else (normals, texture
//! coordinates, groups, materials) is skipped. Face corners may be written as
//! `v`, `v/vt`, `v//vn` or `v/vt/vn`, and indices may be 1-based or negative
//! (relative to the vertices read so far).

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::Geometry;

/// Load geometry from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use wingloop::io::obj;
///
/// let geometry = obj::load("bunny.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<Geometry> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    parse(reader).map_err(|e| match e {
        ParseError::Io(e) => MeshError::Io(e),
        ParseError::Syntax { line, message } => MeshError::LoadError {
            path: path.to_path_buf(),
            message: format!("line {}: {}", line, message),
        },
    })
}

enum ParseError {
    Io(std::io::Error),
    Syntax { line: usize, message: String },
}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        ParseError::Io(e)
    }
}

fn parse<R: BufRead>(reader: R) -> std::result::Result<Geometry, ParseError> {
    let mut positions = Vec::new();
    let mut polygons = Vec::new();

    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let syntax = |message: String| ParseError::Syntax {
            line: n + 1,
            message,
        };

        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let mut coords = [0.0f32; 3];
                for c in &mut coords {
                    let token = tokens
                        .next()
                        .ok_or_else(|| syntax("vertex has fewer than 3 coordinates".into()))?;
                    *c = token
                        .parse()
                        .map_err(|_| syntax(format!("invalid coordinate '{}'", token)))?;
                }
                positions.push(Point3::from(coords));
            }
            Some("f") => {
                let polygon = tokens
                    .map(|corner| resolve_index(corner, positions.len()).map_err(&syntax))
                    .collect::<std::result::Result<Vec<u32>, _>>()?;
                if polygon.len() < 3 {
                    return Err(syntax("face has fewer than 3 corners".into()));
                }
                polygons.push(polygon);
            }
            _ => {}
        }
    }

    Ok(Geometry::from_polygons(positions, &polygons))
}

/// Resolve the position part of one face corner to a 0-based index.
fn resolve_index(corner: &str, num_positions: usize) -> std::result::Result<u32, String> {
    let token = corner.split('/').next().unwrap_or(corner);
    let raw: i64 = token
        .parse()
        .map_err(|_| format!("invalid face index '{}'", corner))?;

    let index = match raw {
        0 => return Err("face index 0 is not valid in OBJ".to_string()),
        r if r > 0 => r - 1,
        r => num_positions as i64 + r,
    };

    u32::try_from(index).map_err(|_| format!("face index {} out of range", raw))
}

/// Save geometry to an OBJ file.
pub fn save<P: AsRef<Path>>(geometry: &Geometry, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);

    writeln!(writer, "# Generated by wingloop")?;
    writeln!(
        writer,
        "# {} vertices, {} faces",
        geometry.num_vertices(),
        geometry.num_triangles()
    )?;

    for p in &geometry.positions {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for t in &geometry.triangles {
        writeln!(writer, "f {} {} {}", t[0] + 1, t[1] + 1, t[2] + 1)?;
    }

    writer.flush()?;
    Ok(())
}
