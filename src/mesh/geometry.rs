//! Flat geometry buffers.
//!
//! [`Geometry`] is the exchange format at both ends of the pipeline: loaders
//! produce it, [`WingedMesh::build`](super::WingedMesh::build) consumes it, and
//! [`WingedMesh::to_geometry`](super::WingedMesh::to_geometry) gives it back.

use std::collections::{HashMap, HashSet};

use nalgebra::Point3;

use super::key::PositionKey;

/// Vertex positions plus 0-based triangle vertex-index triples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    /// Vertex positions.
    pub positions: Vec<Point3<f32>>,
    /// Triangles as counter-clockwise `[v0, v1, v2]` indices into `positions`.
    pub triangles: Vec<[u32; 3]>,
}

impl Geometry {
    /// Create geometry from positions and triangles.
    pub fn new(positions: Vec<Point3<f32>>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            positions,
            triangles,
        }
    }

    /// Create geometry from polygons of arbitrary size, fan-triangulating
    /// anything with more than three corners. Polygons with fewer than three
    /// corners are dropped.
    pub fn from_polygons(positions: Vec<Point3<f32>>, polygons: &[Vec<u32>]) -> Self {
        let mut triangles = Vec::with_capacity(polygons.len());
        for poly in polygons {
            if poly.len() < 3 {
                continue;
            }
            for i in 1..poly.len() - 1 {
                triangles.push([poly[0], poly[i], poly[i + 1]]);
            }
        }
        Self::new(positions, triangles)
    }

    /// Number of vertex positions.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Merge positions that share a [`PositionKey`] and drop triangles that
    /// collapse as a result. Vertex order follows first occurrence.
    pub fn welded(&self, tolerance: f32) -> Geometry {
        let mut lookup: HashMap<PositionKey, u32> = HashMap::with_capacity(self.positions.len());
        let mut positions = Vec::with_capacity(self.positions.len());
        let remap: Vec<u32> = self
            .positions
            .iter()
            .map(|p| {
                *lookup.entry(PositionKey::new(p, tolerance)).or_insert_with(|| {
                    positions.push(*p);
                    (positions.len() - 1) as u32
                })
            })
            .collect();

        let triangles = self
            .triangles
            .iter()
            .filter_map(|t| {
                let [a, b, c] = t.map(|i| remap.get(i as usize).copied().unwrap_or(i));
                (a != b && b != c && a != c).then_some([a, b, c])
            })
            .collect();

        Geometry::new(positions, triangles)
    }

    /// Number of distinct undirected edges, by vertex index.
    pub fn unique_edge_count(&self) -> usize {
        let mut edges: HashSet<(u32, u32)> = HashSet::with_capacity(self.triangles.len() * 3 / 2);
        for t in &self.triangles {
            for i in 0..3 {
                let (a, b) = (t[i], t[(i + 1) % 3]);
                edges.insert((a.min(b), a.max(b)));
            }
        }
        edges.len()
    }

    /// For every vertex, the number of triangles that reference it.
    pub fn incident_triangle_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.positions.len()];
        for t in &self.triangles {
            for &v in t {
                if let Some(c) = counts.get_mut(v as usize) {
                    *c += 1;
                }
            }
        }
        counts
    }
}
