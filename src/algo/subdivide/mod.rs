//! Mesh subdivision.
//!
//! # Loop Subdivision
//!
//! Loop subdivision (Loop, 1987) is an approximating subdivision scheme for
//! triangle meshes. Each pass:
//!
//! 1. Inserts an "odd" vertex on every edge at `3/8 (a + b) + 1/8 (c + d)`,
//!    where `c` and `d` are the vertices opposite the edge,
//! 2. Splits each triangle into three corner triangles and one center triangle,
//! 3. Rebuilds the winged-edge topology,
//! 4. Moves every original ("even") vertex to
//!    `(1 - n β) p + β Σ neighbors` with
//!    `β = 1/n (5/8 - (3/8 + 1/4 cos(2π/n))²)`.
//!
//! Which ring supplies `n` and the neighbor sum is selected by
//! [`EvenStencil`].
//!
//! # Example
//!
//! ```
//! use wingloop::algo::subdivide::{loop_subdivide, SubdivideOptions};
//! use wingloop::mesh::{Geometry, WingedMesh};
//! use nalgebra::Point3;
//!
//! let geometry = Geometry::new(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.5, 1.0, 0.0),
//!         Point3::new(0.5, 0.5, 1.0),
//!     ],
//!     vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]],
//! );
//! let mesh = WingedMesh::build(&geometry).unwrap();
//!
//! let refined = loop_subdivide(&mesh, &SubdivideOptions::new(2)).unwrap();
//! assert_eq!(refined.num_faces(), 64);
//! ```
//!
//! # References
//!
//! - Loop, C. (1987). "Smooth Subdivision Surfaces Based on Triangles."
//!   Master's thesis, University of Utah.

mod loop_subdivision;

pub use loop_subdivision::{loop_beta, loop_subdivide, loop_subdivide_with_progress, subdivide};

use crate::error::{MeshError, Result};

/// The one-ring used to reposition even vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvenStencil {
    /// Degree and neighbor sum from the mesh before the split, so only
    /// original neighbors contribute. This is classical Loop subdivision.
    #[default]
    OriginalRing,

    /// Degree and neighbor sum from the rebuilt mesh, where every neighbor of
    /// an even vertex is a freshly inserted odd vertex.
    RefinedRing,
}

/// Options for subdivision.
#[derive(Debug, Clone)]
pub struct SubdivideOptions {
    /// Number of subdivision passes.
    pub iterations: usize,

    /// Ring used for the even-vertex rule.
    pub stencil: EvenStencil,
}

impl Default for SubdivideOptions {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SubdivideOptions {
    /// Create options with the specified number of passes.
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            stencil: EvenStencil::default(),
        }
    }

    /// Set the even-vertex stencil.
    pub fn with_stencil(mut self, stencil: EvenStencil) -> Self {
        self.stencil = stencil;
        self
    }

    /// Check that `iterations` passes over `num_faces` faces stay addressable
    /// with 32-bit half-edge indices.
    pub fn validate(&self, num_faces: usize) -> Result<()> {
        let too_many = || {
            MeshError::invalid_param(
                "iterations",
                self.iterations,
                "result exceeds 32-bit indices",
            )
        };
        let mut faces = num_faces;
        for _ in 0..self.iterations {
            faces = faces.checked_mul(4).ok_or_else(too_many)?;
        }
        match faces.checked_mul(3) {
            Some(half_edges) if half_edges < u32::MAX as usize => Ok(()),
            _ => Err(too_many()),
        }
    }
}
