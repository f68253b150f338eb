//! Mesh processing algorithms.
//!
//! - **Subdivision**: Loop subdivision of closed triangle meshes
//! - **Progress**: callbacks for reporting long-running passes

pub mod progress;
pub mod subdivide;

pub use progress::Progress;
