//! Loop subdivision for closed triangle meshes.

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use crate::algo::Progress;
use crate::error::Result;
use crate::mesh::{
    undirected, BuildOptions, DirectedKey, EdgeId, Geometry, PositionKey, VertexId, WingedMesh,
};

use super::{EvenStencil, SubdivideOptions};

/// Performs `options.iterations` passes of Loop subdivision.
///
/// Returns a new mesh; the input is left untouched, so ids taken from it stay
/// meaningful for as long as the caller keeps it. Zero iterations return a
/// copy of the input.
///
/// # Rules
///
/// - **Odd vertex**: `3/8 (a + b) + 1/8 (c + d)`
/// - **Even vertex**: `(1 - n β) p + β Σ neighbors`
pub fn loop_subdivide(mesh: &WingedMesh, options: &SubdivideOptions) -> Result<WingedMesh> {
    loop_subdivide_with_progress(mesh, options, &Progress::none())
}

/// Loop subdivision with progress reporting.
pub fn loop_subdivide_with_progress(
    mesh: &WingedMesh,
    options: &SubdivideOptions,
    progress: &Progress,
) -> Result<WingedMesh> {
    options.validate(mesh.num_faces())?;

    let mut current = mesh.clone();
    for iter in 0..options.iterations {
        progress.report(iter, options.iterations, "Loop subdivision");
        current = subdivide(&current, options.stencil)?;
    }
    progress.report(options.iterations, options.iterations, "Loop subdivision");

    Ok(current)
}

/// One pass of Loop subdivision.
///
/// The result has four times as many faces and one extra vertex per
/// undirected edge. Vertices `0..mesh.num_vertices()` keep their ids and are
/// smoothed; the rest are the inserted odd vertices and carry
/// [`Vertex::inserted`](crate::mesh::Vertex::inserted).
///
/// Corners that only matched by position key in `mesh` are routed through one
/// vertex per key, and every shared corner of the result is then the same
/// index. The result is therefore built with [`BuildOptions::exact`] and edges
/// far shorter than the input's merge tolerance still link up. Duplicates
/// that lose their faces this way stay in the buffer as isolated vertices.
pub fn subdivide(mesh: &WingedMesh, stencil: EvenStencil) -> Result<WingedMesh> {
    let even_count = mesh.num_vertices();
    let build_options = BuildOptions::exact();

    let mut positions: Vec<Point3<f32>> = Vec::with_capacity(even_count + mesh.num_unique_edges());
    positions.extend(mesh.vertices().map(|(_, v)| v.position));

    // First vertex seen at each position key
    let mut first_at: HashMap<PositionKey, u32> = HashMap::with_capacity(even_count);
    let canonical: Vec<u32> = mesh
        .vertex_ids()
        .map(|v| *first_at.entry(mesh.key(v)).or_insert(v.raw()))
        .collect();

    // Undirected edge key -> odd vertex, shared by both faces of the edge
    let mut odd_lookup: HashMap<DirectedKey, u32> =
        HashMap::with_capacity(mesh.num_unique_edges());
    let mut triangles: Vec<[u32; 3]> = Vec::with_capacity(mesh.num_faces() * 4);

    for f in mesh.face_ids() {
        let e1 = mesh.face(f).edge;
        let e2 = mesh.next(e1);
        let e3 = mesh.next(e2);

        let [v1, v2, v3] = [e1, e2, e3].map(|e| canonical[mesh.start(e).index()]);
        let [m12, m23, m31] =
            [e1, e2, e3].map(|e| odd_vertex(mesh, e, &mut odd_lookup, &mut positions));

        // Three corner triangles
        triangles.push([v1, m12, m31]);
        triangles.push([v2, m23, m12]);
        triangles.push([v3, m31, m23]);
        // Center triangle
        triangles.push([m12, m23, m31]);
    }

    let mut geometry = Geometry::new(positions, triangles);

    let smoothed = match stencil {
        EvenStencil::OriginalRing => even_positions(mesh, even_count)?,
        EvenStencil::RefinedRing => {
            let refined = WingedMesh::build_with(&geometry, &build_options)?;
            even_positions(&refined, even_count)?
        }
    };
    geometry.positions[..even_count].copy_from_slice(&smoothed);

    let mut result = WingedMesh::build_with(&geometry, &build_options)?;
    for v in &mut result.vertices[even_count..] {
        v.inserted = true;
    }

    log::debug!(
        "loop subdivision: {} -> {} faces, {} -> {} vertices",
        mesh.num_faces(),
        result.num_faces(),
        even_count,
        result.num_vertices()
    );

    Ok(result)
}

/// Index of the odd vertex on the edge of `e`, creating it on first sight.
fn odd_vertex(
    mesh: &WingedMesh,
    e: EdgeId,
    lookup: &mut HashMap<DirectedKey, u32>,
    positions: &mut Vec<Point3<f32>>,
) -> u32 {
    let (a, b) = (mesh.start(e), mesh.end(e));
    let key = undirected(mesh.key(a), mesh.key(b));

    *lookup.entry(key).or_insert_with(|| {
        let c = mesh.opposite(e);
        let d = mesh.opposite(mesh.symmetric(e));

        let near = mesh.position(a).coords + mesh.position(b).coords;
        let far = mesh.position(c).coords + mesh.position(d).coords;
        positions.push(Point3::from(near * (3.0 / 8.0) + far * (1.0 / 8.0)));
        (positions.len() - 1) as u32
    })
}

/// Smoothed positions for vertices `0..count` of `mesh`.
fn even_positions(mesh: &WingedMesh, count: usize) -> Result<Vec<Point3<f32>>> {
    (0..count)
        .map(VertexId::new)
        .map(|v| {
            let p = *mesh.position(v);
            let n = mesh.degree(v)?;
            if n == 0 {
                return Ok(p);
            }

            let beta = loop_beta(n);
            let sum: Vector3<f32> = mesh.neighbor_sum(v)?;
            Ok(Point3::from(sum * beta + p.coords * (1.0 - n as f32 * beta)))
        })
        .collect()
}

/// Loop's even-vertex weight for a vertex of degree `n`:
/// `β = 1/n (5/8 - (3/8 + 1/4 cos(2π/n))²)`.
pub fn loop_beta(n: usize) -> f32 {
    let n_f = n as f64;
    let cos_term = (2.0 * std::f64::consts::PI / n_f).cos();
    let inner = 3.0 / 8.0 + 0.25 * cos_term;
    ((1.0 / n_f) * (5.0 / 8.0 - inner * inner)) as f32
}
