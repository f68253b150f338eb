//! Core mesh data structures.
//!
//! This module provides the winged-edge mesh representation, the flat buffers
//! it is built from, and the one-ring traversal used by normals and
//! subdivision.
//!
//! # Overview
//!
//! The primary type is [`WingedMesh`]: three arenas (vertices, half-edges,
//! faces) cross-referencing each other through [`VertexId`], [`EdgeId`] and
//! [`FaceId`]. It is always derived from a [`Geometry`] and rebuilt from
//! scratch whenever the geometry changes.
//!
//! Coincident vertices are recognized through [`PositionKey`]s, positions
//! quantized to a [`MERGE_TOLERANCE`] grid.
//!
//! # Construction
//!
//! ```
//! use wingloop::mesh::{Geometry, WingedMesh, VertexId};
//! use nalgebra::Point3;
//!
//! let geometry = Geometry::new(
//!     vec![
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(-1.0, 0.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!         Point3::new(0.0, -1.0, 0.0),
//!         Point3::new(0.0, 0.0, 1.0),
//!         Point3::new(0.0, 0.0, -1.0),
//!     ],
//!     vec![
//!         [0, 2, 4], [2, 1, 4], [1, 3, 4], [3, 0, 4],
//!         [2, 0, 5], [1, 2, 5], [3, 1, 5], [0, 3, 5],
//!     ],
//! );
//!
//! let mesh = WingedMesh::build(&geometry).unwrap();
//! assert_eq!(mesh.degree(VertexId::new(4)).unwrap(), 4);
//! ```

mod builder;
mod geometry;
mod index;
mod key;
mod traverse;
mod winged;

pub use builder::BuildOptions;
pub use geometry::Geometry;
pub use index::{EdgeId, FaceId, VertexId};
pub use key::{undirected, DirectedKey, PositionKey, EXACT, MERGE_TOLERANCE};
pub use traverse::OneRing;
pub use winged::{Edge, Face, Vertex, WingedMesh};
