//! Viewer-facing model state.
//!
//! A viewer drives the core through two triggers only: toggling between flat
//! and smooth shading, and subdividing once more. [`Model`] holds the current
//! mesh generation together with those settings and hands out the vertex
//! stream to upload.

use crate::algo::subdivide::{subdivide, EvenStencil};
use crate::error::Result;
use crate::mesh::{Geometry, WingedMesh};
use crate::render::{flatten, FlatVertex, Smoothing};

/// The mesh currently on display plus its shading and subdivision level.
#[derive(Debug, Clone)]
pub struct Model {
    mesh: WingedMesh,
    smoothing: Smoothing,
    stencil: EvenStencil,
    level: usize,
}

impl Model {
    /// Wrap an already built mesh at subdivision level 0.
    pub fn new(mesh: WingedMesh) -> Self {
        Self {
            mesh,
            smoothing: Smoothing::default(),
            stencil: EvenStencil::default(),
            level: 0,
        }
    }

    /// Build the topology for `geometry` and wrap it.
    pub fn from_geometry(geometry: &Geometry) -> Result<Self> {
        Ok(Self::new(WingedMesh::build(geometry)?))
    }

    /// Set the even-vertex stencil used by later [`subdivide`](Self::subdivide) calls.
    pub fn with_stencil(mut self, stencil: EvenStencil) -> Self {
        self.stencil = stencil;
        self
    }

    /// The current mesh generation.
    pub fn mesh(&self) -> &WingedMesh {
        &self.mesh
    }

    /// Current shading mode.
    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }

    /// Number of subdivision passes applied so far.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Switch between flat and smooth shading and return the new mode.
    pub fn toggle_smoothing(&mut self) -> Smoothing {
        self.smoothing = self.smoothing.toggled();
        self.smoothing
    }

    /// Replace the mesh with one more level of Loop subdivision.
    ///
    /// On failure the current mesh is kept.
    pub fn subdivide(&mut self) -> Result<&WingedMesh> {
        let refined = subdivide(&self.mesh, self.stencil)?;
        self.mesh = refined;
        self.level += 1;
        log::info!(
            "subdivision level {}: {} vertices, {} faces",
            self.level,
            self.mesh.num_vertices(),
            self.mesh.num_faces()
        );
        Ok(&self.mesh)
    }

    /// The vertex stream for the current mesh and shading mode.
    pub fn vertex_stream(&self) -> Vec<FlatVertex> {
        flatten(&self.mesh, self.smoothing)
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Point3;

    use super::*;
    use crate::error::MeshError;
    use crate::mesh::{FaceId, VertexId};

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
    fn test_triggers() {
        let mut model = Model::from_geometry(&octahedron()).unwrap();
        assert_eq!(model.level(), 0);
        assert_eq!(model.smoothing(), Smoothing::Flat);
        assert_eq!(model.vertex_stream().len(), 24);

        assert_eq!(model.toggle_smoothing(), Smoothing::Smooth);
        model.subdivide().unwrap();
        model.subdivide().unwrap();

        assert_eq!(model.level(), 2);
        assert_eq!(model.mesh().num_faces(), 128);
        assert_eq!(model.vertex_stream().len(), 384);
    }

    #[test]
    fn test_smoothing_changes_stream() {
        let mut model = Model::from_geometry(&octahedron()).unwrap();
        let flat = model.vertex_stream();
        model.toggle_smoothing();
        let smooth = model.vertex_stream();

        assert_eq!(flat.len(), smooth.len());
        assert_ne!(flat, smooth);
        for (a, b) in flat.iter().zip(&smooth) {
            assert_eq!(a.position, b.position);
            assert_eq!(a.barycentric, b.barycentric);
        }
    }

    #[test]
    fn test_failed_subdivide_keeps_mesh() {
        let mut mesh = WingedMesh::build(&octahedron()).unwrap();
        // Send the walk around the apex into a half-edge loop that never
        // returns to its first neighbor.
        let seed = mesh.vertex(VertexId::new(4)).edge;
        let sym = mesh.symmetric(seed);
        let far = mesh.next(mesh.face(FaceId::new(7)).edge);
        mesh.edges[sym.index()].next = far;
        mesh.edges[far.index()].symmetric = sym;

        let mut model = Model::new(mesh);
        let before = model.mesh().to_geometry();

        let result = model.subdivide();
        assert!(matches!(result, Err(MeshError::UnclosedOneRing { .. })));
        assert_eq!(model.level(), 0);
        assert_eq!(model.mesh().num_faces(), 8);
        assert_eq!(model.mesh().to_geometry(), before);
    }

    #[test]
    fn test_open_geometry_is_rejected() {
        let mut geometry = octahedron();
        geometry.triangles.truncate(4);
        assert!(Model::from_geometry(&geometry).is_err());
    }
}
