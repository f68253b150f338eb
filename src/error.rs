//! Error types for wingloop.
//!
//! Every fallible operation in the crate returns [`Result`]. Malformed input is
//! reported when the topology is built, so traversal and subdivision never see
//! a mesh they cannot walk.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The geometry has no triangles.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A triangle references a vertex index outside the position buffer.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A triangle repeats one of its vertex indices.
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// A triangle has zero area, so its normal is undefined.
    #[error("face {face} has zero area (coincident or collinear vertices)")]
    DegenerateGeometry {
        /// The face index.
        face: usize,
    },

    /// The incident face normals of a vertex cancel out.
    #[error("vertex {vertex} has no defined normal (incident face normals cancel)")]
    DegenerateVertexNormal {
        /// The vertex index.
        vertex: usize,
    },

    /// A half-edge has no reverse half-edge: the mesh is open.
    #[error("edge ({start}, {end}) lies on a boundary; only closed meshes are supported")]
    BoundaryEdge {
        /// Start vertex of the unmatched half-edge.
        start: usize,
        /// End vertex of the unmatched half-edge.
        end: usize,
    },

    /// The same directed edge occurs twice (inconsistent winding or more than two faces).
    #[error("edge ({start}, {end}) is non-manifold or inconsistently wound")]
    NonManifoldEdge {
        /// Start vertex of the repeated half-edge.
        start: usize,
        /// End vertex of the repeated half-edge.
        end: usize,
    },

    /// The faces around a vertex form more than one fan (a pinched vertex).
    #[error("vertex {vertex} is non-manifold (its faces form more than one fan)")]
    NonManifoldVertex {
        /// The vertex index.
        vertex: usize,
    },

    /// The walk around a vertex did not return to its first neighbor.
    #[error("one-ring of vertex {vertex} does not close after {steps} steps")]
    UnclosedOneRing {
        /// The vertex index.
        vertex: usize,
        /// Number of steps taken before giving up.
        steps: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading geometry from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving geometry to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Whether this error describes a topological defect of the input
    /// (open, non-manifold or unwalkable mesh).
    pub fn is_topological(&self) -> bool {
        matches!(
            self,
            MeshError::BoundaryEdge { .. }
                | MeshError::NonManifoldEdge { .. }
                | MeshError::NonManifoldVertex { .. }
                | MeshError::UnclosedOneRing { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = MeshError::BoundaryEdge { start: 1, end: 2 };
        assert_eq!(
            e.to_string(),
            "edge (1, 2) lies on a boundary; only closed meshes are supported"
        );

        let e = MeshError::invalid_param("merge_tolerance", -1.0, "must be positive");
        assert_eq!(e.to_string(), "invalid parameter: merge_tolerance = -1 (must be positive)");
    }

    #[test]
    fn test_is_topological() {
        assert!(MeshError::NonManifoldEdge { start: 0, end: 1 }.is_topological());
        assert!(MeshError::UnclosedOneRing { vertex: 0, steps: 3 }.is_topological());
        assert!(MeshError::NonManifoldVertex { vertex: 0 }.is_topological());
        assert!(!MeshError::DegenerateFace { face: 0 }.is_topological());
        assert!(!MeshError::EmptyMesh.is_topological());
    }
}
