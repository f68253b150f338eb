//! # wingloop
//!
//! Winged-edge triangle meshes with Loop subdivision.
//!
//! wingloop turns indexed triangle buffers into a winged-edge structure,
//! walks vertex one-rings over it, and refines closed meshes with Loop
//! subdivision. A flattener expands the result into a per-corner vertex
//! stream, ready for a renderer that draws a wireframe overlay from
//! barycentric coordinates.
//!
//! ## Features
//!
//! - **Winged-edge topology**: every directed edge knows its face, its
//!   neighbors inside that face, and its symmetric twin
//! - **Position keys**: coincident positions are matched on a quantized grid,
//!   so unwelded input still links up
//! - **Loop subdivision**: pure passes that return a new mesh
//! - **Vertex streams**: flat or smooth normals, `#[repr(C)]` records
//! - **File formats**: OBJ, STL, PLY
//!
//! ## Quick Start
//!
//! ```no_run
//! use wingloop::prelude::*;
//!
//! let geometry = wingloop::io::load("model.obj").unwrap();
//! let mesh = WingedMesh::build(&geometry).unwrap();
//!
//! let refined = loop_subdivide(&mesh, &SubdivideOptions::new(3)).unwrap();
//! println!("{} faces", refined.num_faces());
//!
//! wingloop::io::save(&refined.to_geometry(), "smooth.obj").unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use wingloop::prelude::*;
//! use nalgebra::Point3;
//!
//! let geometry = Geometry::new(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.5, 1.0, 0.0),
//!         Point3::new(0.5, 0.5, 1.0),
//!     ],
//!     vec![
//!         [0, 2, 1], // bottom
//!         [0, 1, 3], // front
//!         [1, 2, 3], // right
//!         [2, 0, 3], // left
//!     ],
//! );
//!
//! let mesh = WingedMesh::build(&geometry).unwrap();
//! assert_eq!(mesh.num_vertices(), 4);
//! assert_eq!(mesh.num_edges(), 12);
//! assert_eq!(mesh.degree(VertexId::new(0)).unwrap(), 3);
//! ```
//!
//! ## Viewer Model
//!
//! ```
//! use wingloop::prelude::*;
//! # use nalgebra::Point3;
//! # let geometry = Geometry::new(
//! #     vec![
//! #         Point3::new(0.0, 0.0, 0.0),
//! #         Point3::new(1.0, 0.0, 0.0),
//! #         Point3::new(0.5, 1.0, 0.0),
//! #         Point3::new(0.5, 0.5, 1.0),
//! #     ],
//! #     vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]],
//! # );
//! let mut model = Model::from_geometry(&geometry).unwrap();
//! model.toggle_smoothing();
//! model.subdivide().unwrap();
//!
//! let stream: Vec<FlatVertex> = model.vertex_stream();
//! assert_eq!(stream.len(), 3 * 16);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;
pub mod model;
pub mod render;

/// Prelude module for convenient imports.
///
/// ```
/// use wingloop::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::subdivide::{loop_subdivide, subdivide, EvenStencil, SubdivideOptions};
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{BuildOptions, EdgeId, FaceId, Geometry, VertexId, WingedMesh};
    pub use crate::model::Model;
    pub use crate::render::{flatten, FlatVertex, Smoothing};
}

pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_tetrahedron() {
        let geometry = Geometry::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.5, 1.0, 0.0),
                Point3::new(0.5, 0.5, 1.0),
            ],
            vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]],
        );

        let mesh = WingedMesh::build(&geometry).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 4);
        // Closed: every edge has a twin, so 12 directed edges form 6 undirected ones.
        assert_eq!(mesh.num_edges(), 12);
        assert_eq!(mesh.num_unique_edges(), 6);
        assert!(mesh.is_valid());

        for e in mesh.edge_ids() {
            assert!(mesh.symmetric(e).is_some(), "edge {:?} should have a twin", e);
        }
    }

    #[test]
    fn test_open_mesh_is_rejected() {
        let geometry = Geometry::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.5, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        assert!(matches!(
            WingedMesh::build(&geometry),
            Err(MeshError::BoundaryEdge { .. })
        ));
    }
}
