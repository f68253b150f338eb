//! One-ring traversal.
//!
//! Starting from a vertex's seed half-edge `e`, the walk repeatedly steps to
//! `next(symmetric(current))`, which is the following outgoing half-edge
//! around the same vertex. It stops once the end vertex of `current` is the
//! end vertex of `e` again (compared by [`PositionKey`](super::PositionKey)).
//!
//! Termination relies on the mesh being a closed manifold. The walk is capped
//! at the number of half-edges in the mesh; hitting the cap is reported as
//! [`MeshError::UnclosedOneRing`] instead of looping forever.

use nalgebra::Vector3;

use super::index::{EdgeId, VertexId};
use super::key::PositionKey;
use super::winged::WingedMesh;
use crate::error::{MeshError, Result};

/// Iterator over the outgoing half-edges around a vertex.
///
/// Check [`OneRing::overran`] after exhausting the iterator to find out
/// whether the walk closed normally.
pub struct OneRing<'a> {
    mesh: &'a WingedMesh,
    first_end: Option<PositionKey>,
    current: EdgeId,
    steps: usize,
    limit: usize,
    done: bool,
    overrun: bool,
}

impl<'a> OneRing<'a> {
    fn new(mesh: &'a WingedMesh, v: VertexId) -> Self {
        let seed = mesh.vertex(v).edge;
        let first_end = seed.is_some().then(|| mesh.key(mesh.end(seed)));
        Self {
            mesh,
            first_end,
            current: seed,
            steps: 0,
            limit: mesh.num_edges(),
            done: first_end.is_none(),
            overrun: false,
        }
    }

    /// Number of half-edges yielded so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Whether the walk was cut off before returning to its first neighbor.
    pub fn overran(&self) -> bool {
        self.overrun
    }
}

impl Iterator for OneRing<'_> {
    type Item = EdgeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.steps >= self.limit {
            self.done = true;
            self.overrun = true;
            return None;
        }

        let result = self.current;
        self.steps += 1;

        // If current goes v -> w, symmetric(current) goes w -> v and the
        // half-edge after it in its face starts at v again.
        let sym = self.mesh.symmetric(self.current);
        if !sym.is_some() {
            self.done = true;
            self.overrun = true;
            return Some(result);
        }
        self.current = self.mesh.next(sym);

        if Some(self.mesh.key(self.mesh.end(self.current))) == self.first_end {
            self.done = true;
        }

        Some(result)
    }
}

impl WingedMesh {
    /// Walk the outgoing half-edges around a vertex.
    pub fn one_ring(&self, v: VertexId) -> OneRing<'_> {
        OneRing::new(self, v)
    }

    /// Fold over the one-ring of `v`, failing if the walk does not close.
    fn fold_ring<T>(&self, v: VertexId, init: T, mut f: impl FnMut(T, EdgeId) -> T) -> Result<T> {
        let mut ring = self.one_ring(v);
        let mut acc = init;
        for e in ring.by_ref() {
            acc = f(acc, e);
        }
        if ring.overran() {
            return Err(MeshError::UnclosedOneRing {
                vertex: v.index(),
                steps: ring.steps(),
            });
        }
        Ok(acc)
    }

    /// Number of half-edges around `v`. Zero for an isolated vertex.
    pub fn degree(&self, v: VertexId) -> Result<usize> {
        self.fold_ring(v, 0, |n, _| n + 1)
    }

    /// Normalized sum of the flat normals of the faces around `v`.
    pub fn mean_normal(&self, v: VertexId) -> Result<Vector3<f32>> {
        let sum = self.fold_ring(v, Vector3::zeros(), |acc, e| {
            acc + self.face(self.face_of(e)).normal
        })?;
        sum.try_normalize(1e-6)
            .ok_or(MeshError::DegenerateVertexNormal { vertex: v.index() })
    }

    /// Sum of the positions of the vertices around `v`.
    pub fn neighbor_sum(&self, v: VertexId) -> Result<Vector3<f32>> {
        self.fold_ring(v, Vector3::zeros(), |acc, e| {
            acc + self.position(self.end(e)).coords
        })
    }

    /// The vertices around `v`, in walk order.
    pub fn neighbors(&self, v: VertexId) -> Result<Vec<VertexId>> {
        self.fold_ring(v, Vec::new(), |mut acc, e| {
            acc.push(self.end(e));
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use nalgebra::Point3;

    use crate::mesh::{FaceId, Geometry};

    use super::*;

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
    fn test_degree_matches_incident_triangles() {
        let geometry = octahedron();
        let mesh = WingedMesh::build(&geometry).unwrap();
        let counts = geometry.incident_triangle_counts();

        for v in mesh.vertex_ids() {
            assert_eq!(mesh.degree(v).unwrap(), counts[v.index()]);
        }
    }

    #[test]
    fn test_neighbors_of_apex() {
        let mesh = WingedMesh::build(&octahedron()).unwrap();
        let apex = VertexId::new(4);

        let ring: HashSet<usize> = mesh
            .neighbors(apex)
            .unwrap()
            .into_iter()
            .map(|v| v.index())
            .collect();
        assert_eq!(ring, HashSet::from([0, 1, 2, 3]));

        // The equator is symmetric about the z axis.
        let sum = mesh.neighbor_sum(apex).unwrap();
        assert!(sum.norm() < 1e-6);
    }

    #[test]
    fn test_walk_is_consecutive() {
        let mesh = WingedMesh::build(&octahedron()).unwrap();
        for v in mesh.vertex_ids() {
            let ring: Vec<EdgeId> = mesh.one_ring(v).collect();
            for (i, &e) in ring.iter().enumerate() {
                assert_eq!(mesh.start(e), v);
                // Consecutive half-edges share a face through their symmetric.
                let following = ring[(i + 1) % ring.len()];
                assert_eq!(mesh.next(mesh.symmetric(e)), following);
            }
        }
    }

    #[test]
    fn test_mean_normal_is_unit() {
        let mesh = WingedMesh::build(&octahedron()).unwrap();
        for v in mesh.vertex_ids() {
            let n = mesh.mean_normal(v).unwrap();
            assert!((n.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_isolated_vertex() {
        let mut geometry = octahedron();
        geometry.positions.push(Point3::new(3.0, 3.0, 3.0));
        let mesh = WingedMesh::build(&geometry).unwrap();
        let lonely = VertexId::new(6);

        assert_eq!(mesh.degree(lonely).unwrap(), 0);
        assert_eq!(mesh.neighbor_sum(lonely).unwrap(), Vector3::zeros());
        assert!(matches!(
            mesh.mean_normal(lonely),
            Err(MeshError::DegenerateVertexNormal { vertex: 6 })
        ));
    }

    #[test]
    fn test_broken_ring_is_reported() {
        let mut mesh = WingedMesh::build(&octahedron()).unwrap();
        // Route the walk into a half-edge that keeps stepping onto itself, so
        // it never comes back to the first neighbor.
        let v = VertexId::new(4);
        let seed = mesh.vertex(v).edge;
        let far = mesh.next(mesh.face(FaceId::new(7)).edge);
        assert_ne!(mesh.end(far), mesh.end(seed));
        let sym = mesh.symmetric(seed);
        mesh.edges[sym.index()].next = far;
        mesh.edges[far.index()].symmetric = sym;

        let ring = mesh.one_ring(v);
        let steps = ring.count();
        assert!(steps <= mesh.num_edges());
        assert!(matches!(
            mesh.degree(v),
            Err(MeshError::UnclosedOneRing { vertex: 4, .. })
        ));
    }
}
