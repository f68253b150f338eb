//! Winged-edge mesh data structure.
//!
//! Each triangle owns three directed **half-edges** (`v0 -> v1`, `v1 -> v2`,
//! `v2 -> v0`). A half-edge knows its start and end vertex, its face, the
//! `next` and `previous` half-edges around that face (counter-clockwise), and
//! its **symmetric** half-edge: the same two vertices in the opposite
//! direction, owned by the neighboring face.
//!
//! All three arenas are derived from a [`Geometry`](super::Geometry) by
//! [`WingedMesh::build`] and are never edited afterwards. Changing the shape
//! means building a new mesh, which is what subdivision does.
//!
//! Invariants of a built mesh:
//! - `symmetric(symmetric(e)) == e` for every half-edge,
//! - `next(next(next(e))) == e` and `previous(next(e)) == e`,
//! - every vertex with an incident face stores a half-edge starting at it,
//! - the one-ring of a vertex reaches every half-edge starting at its
//!   position (no pinched vertices).

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use super::index::{EdgeId, FaceId, VertexId};
use super::key::PositionKey;

/// A vertex in the winged-edge mesh.
#[derive(Debug, Clone)]
pub struct Vertex {
    /// The 3D position of this vertex.
    pub position: Point3<f32>,

    /// Unit normal: the normalized sum of incident face normals.
    pub normal: Vector3<f32>,

    /// One half-edge starting at this vertex, used to seed one-ring walks.
    /// [`EdgeId::NONE`] if no triangle references the vertex.
    pub edge: EdgeId,

    /// Set on vertices inserted at edges by the subdivision step that
    /// produced this mesh.
    pub inserted: bool,
}

impl Vertex {
    /// Create an unconnected vertex at the given position.
    pub fn new(position: Point3<f32>) -> Self {
        Self {
            position,
            normal: Vector3::zeros(),
            edge: EdgeId::NONE,
            inserted: false,
        }
    }
}

/// A directed half-edge owned by exactly one face.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    /// The vertex this half-edge starts at.
    pub start: VertexId,

    /// The vertex this half-edge ends at.
    pub end: VertexId,

    /// The face that owns this half-edge.
    pub face: FaceId,

    /// The next half-edge around the face (counter-clockwise).
    pub next: EdgeId,

    /// The previous half-edge around the face.
    pub previous: EdgeId,

    /// The opposite half-edge in the neighboring face.
    pub symmetric: EdgeId,
}

impl Edge {
    /// Create an unlinked half-edge between two vertices.
    pub fn new(start: VertexId, end: VertexId, face: FaceId) -> Self {
        Self {
            start,
            end,
            face,
            next: EdgeId::NONE,
            previous: EdgeId::NONE,
            symmetric: EdgeId::NONE,
        }
    }
}

/// A triangular face.
#[derive(Debug, Clone, Copy)]
pub struct Face {
    /// The first counter-clockwise half-edge (`v0 -> v1`).
    pub edge: EdgeId,

    /// Unit flat normal.
    pub normal: Vector3<f32>,
}

/// A closed triangle mesh with winged-edge connectivity.
#[derive(Debug, Clone)]
pub struct WingedMesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) faces: Vec<Face>,

    /// Position key of every vertex, parallel to `vertices`.
    pub(crate) keys: Vec<PositionKey>,

    /// Grid spacing the keys were computed with.
    pub(crate) merge_tolerance: f32,
}

impl WingedMesh {
    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of half-edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Number of undirected edges. Every half-edge of a closed mesh has a
    /// symmetric partner, so this is half the half-edge count.
    #[inline]
    pub fn num_unique_edges(&self) -> usize {
        self.edges.len() / 2
    }

    /// The grid spacing used for position keys.
    #[inline]
    pub fn merge_tolerance(&self) -> f32 {
        self.merge_tolerance
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> &Point3<f32> {
        &self.vertex(v).position
    }

    /// Get the stored normal of a vertex.
    #[inline]
    pub fn normal(&self, v: VertexId) -> &Vector3<f32> {
        &self.vertex(v).normal
    }

    /// Get the position key of a vertex.
    #[inline]
    pub fn key(&self, v: VertexId) -> PositionKey {
        self.keys[v.index()]
    }

    // ==================== Topology Queries ====================

    /// Get the start vertex of a half-edge.
    #[inline]
    pub fn start(&self, e: EdgeId) -> VertexId {
        self.edge(e).start
    }

    /// Get the end vertex of a half-edge.
    #[inline]
    pub fn end(&self, e: EdgeId) -> VertexId {
        self.edge(e).end
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, e: EdgeId) -> EdgeId {
        self.edge(e).next
    }

    /// Get the previous half-edge around the face.
    #[inline]
    pub fn previous(&self, e: EdgeId) -> EdgeId {
        self.edge(e).previous
    }

    /// Get the symmetric (opposite) half-edge.
    #[inline]
    pub fn symmetric(&self, e: EdgeId) -> EdgeId {
        self.edge(e).symmetric
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, e: EdgeId) -> FaceId {
        self.edge(e).face
    }

    /// The vertex opposite a half-edge inside its own face.
    #[inline]
    pub fn opposite(&self, e: EdgeId) -> VertexId {
        self.end(self.next(e))
    }

    /// Get the three vertices of a face in counter-clockwise order.
    pub fn face_triangle(&self, f: FaceId) -> [VertexId; 3] {
        let e0 = self.face(f).edge;
        let e1 = self.next(e0);
        let e2 = self.next(e1);
        [self.start(e0), self.start(e1), self.start(e2)]
    }

    /// Get the positions of the three vertices of a face.
    pub fn face_positions(&self, f: FaceId) -> [Point3<f32>; 3] {
        self.face_triangle(f).map(|v| *self.position(v))
    }

    /// Get the stored flat normal of a face.
    #[inline]
    pub fn face_normal(&self, f: FaceId) -> &Vector3<f32> {
        &self.face(f).normal
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all vertices with their IDs.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::new(i), v))
    }

    /// Iterate over all half-edge IDs.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    // ==================== Geometry ====================

    /// Compute the area of a face.
    pub fn face_area(&self, f: FaceId) -> f32 {
        let [p0, p1, p2] = self.face_positions(f);
        0.5 * (p1 - p0).cross(&(p2 - p0)).norm()
    }

    /// Compute the total surface area of the mesh.
    pub fn surface_area(&self) -> f32 {
        self.face_ids().map(|f| self.face_area(f)).sum()
    }

    /// Compute the axis-aligned bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = self.vertices.first()?.position;
        let (mut min, mut max) = (first, first);
        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v.position[i]);
                max[i] = max[i].max(v.position[i]);
            }
        }
        Some((min, max))
    }

    // ==================== Validation ====================

    /// Check that all connectivity invariants hold.
    pub fn is_valid(&self) -> bool {
        for (vid, v) in self.vertices() {
            if v.edge.is_some() && self.edge(v.edge).start != vid {
                return false;
            }
        }

        for e in self.edge_ids() {
            let edge = self.edge(e);
            if !edge.symmetric.is_some() || self.symmetric(edge.symmetric) != e {
                return false;
            }
            if self.previous(edge.next) != e || self.next(edge.previous) != e {
                return false;
            }
            if self.next(self.next(edge.next)) != e {
                return false;
            }
            if self.start(edge.next) != edge.end {
                return false;
            }
            let sym = self.edge(edge.symmetric);
            if self.key(sym.start) != self.key(edge.end)
                || self.key(sym.end) != self.key(edge.start)
            {
                return false;
            }
        }

        for f in self.face_ids() {
            let e = self.face(f).edge;
            if !e.is_some() || self.face_of(e) != f {
                return false;
            }
        }

        let mut outgoing: HashMap<PositionKey, usize> = HashMap::new();
        for edge in &self.edges {
            *outgoing.entry(self.key(edge.start)).or_insert(0) += 1;
        }
        self.vertex_ids().all(|v| {
            let expected = if self.vertex(v).edge.is_some() {
                outgoing.get(&self.key(v)).copied().unwrap_or(0)
            } else {
                0
            };
            self.degree(v).ok() == Some(expected)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Geometry;

    fn tetrahedron() -> WingedMesh {
        let g = Geometry::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.5, 1.0, 0.0),
                Point3::new(0.5, 0.5, 1.0),
            ],
            vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]],
        );
        WingedMesh::build(&g).unwrap()
    }

    #[test]
    fn test_vertex_creation() {
        let v = Vertex::new(Point3::new(1.0, 2.0, 3.0));
        assert_eq!(v.position, Point3::new(1.0, 2.0, 3.0));
        assert!(!v.edge.is_some());
        assert!(!v.inserted);
    }

    #[test]
    fn test_face_triangle_follows_winding() {
        let mesh = tetrahedron();
        let f = FaceId::new(1);
        let [a, b, c] = mesh.face_triangle(f);
        assert_eq!([a.index(), b.index(), c.index()], [0, 1, 3]);

        let e = mesh.face(f).edge;
        assert_eq!(mesh.opposite(e), c);
    }

    #[test]
    fn test_symmetry_and_face_cycle() {
        let mesh = tetrahedron();
        for e in mesh.edge_ids() {
            assert_eq!(mesh.symmetric(mesh.symmetric(e)), e);
            assert_eq!(mesh.next(mesh.next(mesh.next(e))), e);
            assert_eq!(mesh.previous(mesh.next(e)), e);
        }
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_pinched_fan_is_invalid() {
        // Two tetrahedra, the second reflected below the first with its own
        // apex (vertex 7) just under vertex 0.
        let base = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let mut positions = base.to_vec();
        positions.extend(base[1..].iter().map(|p| Point3::from(-p.coords)));
        positions.push(Point3::new(0.0, 0.0, -0.01));

        let first = [[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        let shift = |i: u32| if i == 0 { 7 } else { i + 3 };
        let mut triangles = first.to_vec();
        triangles.extend(first.iter().map(|&[a, b, c]| [shift(a), shift(c), shift(b)]));

        let mut mesh = WingedMesh::build(&Geometry::new(positions, triangles)).unwrap();
        assert!(mesh.is_valid());

        // Make vertex 7 coincide with vertex 0 as far as keys go: both fans
        // now meet at one position, but each walk covers only its own.
        mesh.keys[7] = mesh.keys[0];
        assert!(!mesh.is_valid());
    }

    #[test]
    fn test_geometry_queries() {
        let mesh = tetrahedron();
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 1.0));

        // Bottom face lies in z = 0 with area 0.5.
        assert!((mesh.face_area(FaceId::new(0)) - 0.5).abs() < 1e-6);
        assert!(mesh.surface_area() > 0.5);
    }
}
