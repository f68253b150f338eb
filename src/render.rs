//! Render-ready vertex stream.
//!
//! [`flatten`] expands a mesh into three [`FlatVertex`] records per face, in
//! the face's counter-clockwise order. Vertices are deliberately duplicated per
//! face: each corner carries a distinct barycentric coordinate, which a
//! fragment shader uses to draw the triangle's edges as a wireframe overlay.
//!
//! The stream is plain `#[repr(C)]` data; [`as_bytes`] gives the slice to
//! upload into a vertex buffer with stride [`FlatVertex::STRIDE`].

use bytemuck::{Pod, Zeroable};
use nalgebra::{Point3, Vector3};

use crate::mesh::WingedMesh;

/// Which normal the stream carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Smoothing {
    /// Every corner uses its face's flat normal.
    #[default]
    Flat,
    /// Every corner uses its vertex's mean normal.
    Smooth,
}

impl Smoothing {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Smoothing::Flat => Smoothing::Smooth,
            Smoothing::Smooth => Smoothing::Flat,
        }
    }
}

/// One corner of one triangle.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FlatVertex {
    /// Corner position.
    pub position: [f32; 3],
    /// `(1,0,0)`, `(0,1,0)` or `(0,0,1)` for the first, second and third corner.
    pub barycentric: [f32; 3],
    /// Shading normal.
    pub normal: [f32; 3],
}

impl FlatVertex {
    /// Byte size of one record.
    pub const STRIDE: usize = std::mem::size_of::<FlatVertex>();

    /// Byte offset of `position`.
    pub const POSITION_OFFSET: usize = 0;

    /// Byte offset of `barycentric`.
    pub const BARYCENTRIC_OFFSET: usize = std::mem::size_of::<[f32; 3]>();

    /// Byte offset of `normal`.
    pub const NORMAL_OFFSET: usize = std::mem::size_of::<[f32; 3]>() * 2;

    fn new(position: &Point3<f32>, barycentric: [f32; 3], normal: &Vector3<f32>) -> Self {
        Self {
            position: [position.x, position.y, position.z],
            barycentric,
            normal: [normal.x, normal.y, normal.z],
        }
    }
}

const CORNERS: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Expand `mesh` into `3 * num_faces` records.
pub fn flatten(mesh: &WingedMesh, smoothing: Smoothing) -> Vec<FlatVertex> {
    let mut stream = Vec::with_capacity(mesh.num_faces() * 3);

    for f in mesh.face_ids() {
        let face_normal = mesh.face_normal(f);
        for (v, barycentric) in mesh.face_triangle(f).into_iter().zip(CORNERS) {
            let normal = match smoothing {
                Smoothing::Flat => face_normal,
                Smoothing::Smooth => mesh.normal(v),
            };
            stream.push(FlatVertex::new(mesh.position(v), barycentric, normal));
        }
    }

    stream
}

/// View a vertex stream as raw bytes for upload.
pub fn as_bytes(stream: &[FlatVertex]) -> &[u8] {
    bytemuck::cast_slice(stream)
}
