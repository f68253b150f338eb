//! Mesh construction.
//!
//! Builds the winged-edge arenas from flat [`Geometry`] buffers and converts
//! back. The builder is the only place where topology is created; it either
//! returns a mesh satisfying every invariant listed in [`super::winged`] or an
//! error naming the offending face, edge or vertex.

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use super::geometry::Geometry;
use super::index::{EdgeId, FaceId, VertexId};
use super::key::{DirectedKey, PositionKey, EXACT, MERGE_TOLERANCE};
use super::winged::{Edge, Face, Vertex, WingedMesh};
use crate::error::{MeshError, Result};

/// Options controlling topology construction.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Grid spacing for [`PositionKey`]s. Vertices closer than this are
    /// treated as the same point when matching symmetric half-edges.
    /// [`EXACT`] matches bit-identical positions only.
    pub merge_tolerance: f32,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            merge_tolerance: MERGE_TOLERANCE,
        }
    }
}

impl BuildOptions {
    /// Options that match positions exactly, for buffers whose shared corners
    /// are already bit-identical.
    pub fn exact() -> Self {
        Self {
            merge_tolerance: EXACT,
        }
    }

    /// Set the merge tolerance.
    pub fn with_merge_tolerance(mut self, tolerance: f32) -> Self {
        self.merge_tolerance = tolerance;
        self
    }

    /// Check that the options are usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.merge_tolerance.is_finite() && self.merge_tolerance >= 0.0) {
            return Err(MeshError::invalid_param(
                "merge_tolerance",
                self.merge_tolerance,
                "must be non-negative and finite",
            ));
        }
        Ok(())
    }
}

impl WingedMesh {
    /// Build a winged-edge mesh with default options.
    ///
    /// # Example
    /// ```
    /// use wingloop::mesh::{Geometry, WingedMesh};
    /// use nalgebra::Point3;
    ///
    /// let geometry = Geometry::new(
    ///     vec![
    ///         Point3::new(0.0, 0.0, 0.0),
    ///         Point3::new(1.0, 0.0, 0.0),
    ///         Point3::new(0.5, 1.0, 0.0),
    ///         Point3::new(0.5, 0.5, 1.0),
    ///     ],
    ///     vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]],
    /// );
    ///
    /// let mesh = WingedMesh::build(&geometry).unwrap();
    /// assert_eq!(mesh.num_faces(), 4);
    /// assert_eq!(mesh.num_edges(), 12);
    /// ```
    pub fn build(geometry: &Geometry) -> Result<Self> {
        Self::build_with(geometry, &BuildOptions::default())
    }

    /// Build a winged-edge mesh.
    ///
    /// # Errors
    /// - [`MeshError::EmptyMesh`] when there are no triangles,
    /// - [`MeshError::InvalidVertexIndex`] / [`MeshError::DegenerateFace`] for bad indices,
    /// - [`MeshError::DegenerateGeometry`] for zero-area triangles,
    /// - [`MeshError::NonManifoldEdge`] when a directed edge repeats,
    /// - [`MeshError::BoundaryEdge`] when a half-edge has no reverse,
    /// - [`MeshError::NonManifoldVertex`] when the faces around a vertex form
    ///   more than one fan,
    /// - [`MeshError::UnclosedOneRing`] / [`MeshError::DegenerateVertexNormal`]
    ///   when a vertex normal cannot be computed.
    pub fn build_with(geometry: &Geometry, options: &BuildOptions) -> Result<Self> {
        options.validate()?;

        let positions = &geometry.positions;
        let triangles = &geometry.triangles;

        if triangles.is_empty() {
            return Err(MeshError::EmptyMesh);
        }

        // Validate vertex indices
        for (fi, tri) in triangles.iter().enumerate() {
            for &vi in tri {
                if vi as usize >= positions.len() {
                    return Err(MeshError::InvalidVertexIndex {
                        face: fi,
                        vertex: vi as usize,
                    });
                }
            }
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return Err(MeshError::DegenerateFace { face: fi });
            }
        }

        let tolerance = options.merge_tolerance;
        let mut mesh = WingedMesh {
            vertices: positions.iter().map(|&p| Vertex::new(p)).collect(),
            edges: Vec::with_capacity(triangles.len() * 3),
            faces: Vec::with_capacity(triangles.len()),
            keys: positions
                .iter()
                .map(|p| PositionKey::new(p, tolerance))
                .collect(),
            merge_tolerance: tolerance,
        };

        // Directed edge (start key, end key) -> half-edge
        let mut edge_map: HashMap<DirectedKey, EdgeId> =
            HashMap::with_capacity(triangles.len() * 3);

        // First pass: faces, half-edges and the face cycles
        for (fi, tri) in triangles.iter().enumerate() {
            let face = FaceId::new(fi);
            let corners = tri.map(|i| VertexId::new(i as usize));

            let normal = flat_normal(&corners.map(|v| positions[v.index()]))
                .ok_or(MeshError::DegenerateGeometry { face: fi })?;

            let base = mesh.edges.len();
            let ids = [EdgeId::new(base), EdgeId::new(base + 1), EdgeId::new(base + 2)];

            for i in 0..3 {
                let start = corners[i];
                let end = corners[(i + 1) % 3];
                let key = (mesh.key(start), mesh.key(end));
                if key.0 == key.1 {
                    return Err(MeshError::DegenerateGeometry { face: fi });
                }

                let mut edge = Edge::new(start, end, face);
                edge.next = ids[(i + 1) % 3];
                edge.previous = ids[(i + 2) % 3];
                mesh.edges.push(edge);

                // Last writer wins; any outgoing half-edge seeds the walk.
                mesh.vertices[start.index()].edge = ids[i];

                if edge_map.insert(key, ids[i]).is_some() {
                    return Err(MeshError::NonManifoldEdge {
                        start: start.index(),
                        end: end.index(),
                    });
                }
            }

            mesh.faces.push(Face {
                edge: ids[0],
                normal,
            });
        }

        // Second pass: symmetric half-edges
        for i in 0..mesh.edges.len() {
            let Edge { start, end, .. } = mesh.edges[i];
            let reverse = (mesh.key(end), mesh.key(start));
            match edge_map.get(&reverse) {
                Some(&sym) => mesh.edges[i].symmetric = sym,
                None => {
                    return Err(MeshError::BoundaryEdge {
                        start: start.index(),
                        end: end.index(),
                    })
                }
            }
        }

        // Outgoing half-edges per position; a single closed fan walks them all
        let mut outgoing: HashMap<PositionKey, usize> =
            HashMap::with_capacity(mesh.vertices.len());
        for e in &mesh.edges {
            *outgoing.entry(mesh.key(e.start)).or_insert(0) += 1;
        }

        // Third pass: fan check and vertex normals from the one-ring
        let mut isolated = 0usize;
        for vid in (0..mesh.vertices.len()).map(VertexId::new) {
            if !mesh.vertex(vid).edge.is_some() {
                isolated += 1;
                continue;
            }
            let expected = outgoing.get(&mesh.key(vid)).copied().unwrap_or(0);
            if mesh.degree(vid)? != expected {
                return Err(MeshError::NonManifoldVertex {
                    vertex: vid.index(),
                });
            }
            let normal = mesh.mean_normal(vid)?;
            mesh.vertices[vid.index()].normal = normal;
        }

        if isolated > 0 {
            log::warn!("{} vertices are not referenced by any triangle", isolated);
        }
        log::debug!(
            "built winged-edge mesh: {} vertices, {} half-edges, {} faces",
            mesh.num_vertices(),
            mesh.num_edges(),
            mesh.num_faces()
        );

        Ok(mesh)
    }

    /// Convert back to flat geometry buffers.
    ///
    /// Faces are emitted in arena order with their counter-clockwise winding,
    /// so `build` followed by `to_geometry` reproduces the input triangles.
    pub fn to_geometry(&self) -> Geometry {
        let positions = self.vertices.iter().map(|v| v.position).collect();
        let triangles = self
            .face_ids()
            .map(|f| self.face_triangle(f).map(|v| v.raw()))
            .collect();
        Geometry::new(positions, triangles)
    }
}

/// Unit normal of a counter-clockwise triangle, or `None` if it has no area.
fn flat_normal([p0, p1, p2]: &[Point3<f32>; 3]) -> Option<Vector3<f32>> {
    (p1 - p0).cross(&(p2 - p0)).try_normalize(f32::MIN_POSITIVE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> Geometry {
        Geometry::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.5, 1.0, 0.0),
                Point3::new(0.5, 0.5, 1.0),
            ],
            vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]],
        )
    }

    fn octahedron() -> Geometry {
        Geometry::new(
            vec![
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(-1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, -1.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
                Point3::new(0.0, 0.0, -1.0),
            ],
            vec![
                [0, 2, 4],
                [2, 1, 4],
                [1, 3, 4],
                [3, 0, 4],
                [2, 0, 5],
                [1, 2, 5],
                [3, 1, 5],
                [0, 3, 5],
            ],
        )
    }

    #[test]
    fn test_tetrahedron() {
        let mesh = WingedMesh::build(&tetrahedron()).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 4);
        assert_eq!(mesh.num_edges(), 12);
        assert_eq!(mesh.num_unique_edges(), 6);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_vertex_seeds_start_at_vertex() {
        let mesh = WingedMesh::build(&tetrahedron()).unwrap();
        for (vid, v) in mesh.vertices() {
            assert!(v.edge.is_some());
            assert_eq!(mesh.start(v.edge), vid);
        }
    }

    #[test]
    fn test_octahedron_normals_are_unit() {
        let mesh = WingedMesh::build(&octahedron()).unwrap();
        assert!(mesh.is_valid());

        for (_, v) in mesh.vertices() {
            assert!((v.normal.norm() - 1.0).abs() < 1e-5);
            // Vertices sit on the axes, so the normal points along the position.
            assert!((v.normal - v.position.coords).norm() < 1e-5);
        }
        for f in mesh.face_ids() {
            assert!((mesh.face_normal(f).norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_roundtrip() {
        let geometry = octahedron();
        let mesh = WingedMesh::build(&geometry).unwrap();
        assert_eq!(mesh.to_geometry(), geometry);
    }

    #[test]
    fn test_unwelded_input_links_by_position() {
        // Duplicate vertex 0 of the tetrahedron and route one face through the copy.
        let mut geometry = tetrahedron();
        geometry.positions.push(Point3::new(0.0, 0.0, 0.0));
        geometry.triangles[3] = [2, 4, 3];

        let mesh = WingedMesh::build(&geometry).unwrap();
        assert!(mesh.is_valid());
        assert_eq!(mesh.num_unique_edges(), 6);
    }

    #[test]
    fn test_empty_mesh() {
        let result = WingedMesh::build(&Geometry::default());
        assert!(matches!(result, Err(MeshError::EmptyMesh)));
    }

    #[test]
    fn test_invalid_vertex_index() {
        let geometry = Geometry::new(vec![Point3::new(0.0, 0.0, 0.0)], vec![[0, 1, 2]]);
        let result = WingedMesh::build(&geometry);
        assert!(matches!(
            result,
            Err(MeshError::InvalidVertexIndex { face: 0, vertex: 1 })
        ));
    }

    #[test]
    fn test_degenerate_face() {
        let mut geometry = tetrahedron();
        geometry.triangles[2] = [1, 1, 3];
        let result = WingedMesh::build(&geometry);
        assert!(matches!(result, Err(MeshError::DegenerateFace { face: 2 })));
    }

    #[test]
    fn test_zero_area_face() {
        let mut geometry = tetrahedron();
        // Collapse the apex onto the midpoint of edge 0-1.
        geometry.positions[3] = Point3::new(0.5, 0.0, 0.0);
        let result = WingedMesh::build(&geometry);
        assert!(matches!(result, Err(MeshError::DegenerateGeometry { face: 1 })));
    }

    #[test]
    fn test_open_mesh_is_rejected() {
        let mut geometry = tetrahedron();
        geometry.triangles.pop();
        let result = WingedMesh::build(&geometry);
        assert!(matches!(result, Err(MeshError::BoundaryEdge { .. })));
    }

    #[test]
    fn test_inconsistent_winding_is_rejected() {
        let mut geometry = tetrahedron();
        geometry.triangles[1] = [1, 0, 3];
        let result = WingedMesh::build(&geometry);
        assert!(matches!(result, Err(MeshError::NonManifoldEdge { .. })));
    }

    #[test]
    fn test_isolated_vertex_is_allowed() {
        let mut geometry = tetrahedron();
        geometry.positions.push(Point3::new(5.0, 5.0, 5.0));
        let mesh = WingedMesh::build(&geometry).unwrap();

        let v = mesh.vertex(VertexId::new(4));
        assert!(!v.edge.is_some());
        assert_eq!(v.normal, Vector3::zeros());
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_pinched_vertex_is_rejected() {
        // A second tetrahedron, reflected through the origin, touching the
        // first only at vertex 0. Winding is reversed to keep it outward.
        let mut geometry = tetrahedron();
        let mirrored: Vec<_> = geometry.positions[1..]
            .iter()
            .map(|p| Point3::from(-p.coords))
            .collect();
        geometry.positions.extend(mirrored);
        let shift = |i: u32| if i == 0 { 0 } else { i + 3 };
        let second: Vec<[u32; 3]> = geometry
            .triangles
            .iter()
            .map(|&[a, b, c]| [shift(a), shift(c), shift(b)])
            .collect();
        geometry.triangles.extend(second);

        assert_eq!(geometry.incident_triangle_counts()[0], 6);
        let result = WingedMesh::build(&geometry);
        assert!(matches!(result, Err(MeshError::NonManifoldVertex { vertex: 0 })));
    }

    #[test]
    fn test_cancelling_normals_are_rejected() {
        // Two triangles glued back to back: closed, but every vertex sees
        // opposite face normals.
        let geometry = Geometry::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 1]],
        );
        let result = WingedMesh::build(&geometry);
        assert!(matches!(
            result,
            Err(MeshError::DegenerateVertexNormal { vertex: 0 })
        ));
    }

    #[test]
    fn test_exact_matching_links_tiny_edges() {
        let mut geometry = tetrahedron();
        for p in &mut geometry.positions {
            *p = Point3::from(p.coords * 1e-6);
        }

        // The default grid collapses the whole tetrahedron onto a few cells.
        assert!(WingedMesh::build(&geometry).is_err());

        let mesh = WingedMesh::build_with(&geometry, &BuildOptions::exact()).unwrap();
        assert!(mesh.is_valid());
        assert_eq!(mesh.merge_tolerance(), EXACT);
    }

    #[test]
    fn test_bad_tolerance() {
        for tolerance in [-1.0, f32::NAN, f32::INFINITY] {
            let options = BuildOptions::default().with_merge_tolerance(tolerance);
            let result = WingedMesh::build_with(&tetrahedron(), &options);
            assert!(matches!(result, Err(MeshError::InvalidParameter { .. })));
        }
    }
}
