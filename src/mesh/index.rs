//! Index types for mesh elements.
//!
//! Vertices, half-edges and faces live in arenas owned by the mesh and refer to
//! one another through these `u32` wrappers. `u32::MAX` is reserved as the
//! [`NONE`](VertexId::NONE) sentinel; a fully built mesh never stores it except
//! in the `edge` field of an isolated vertex.

use std::fmt::{self, Debug};

/// A type-safe vertex index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId(u32);

/// A type-safe half-edge index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct EdgeId(u32);

/// A type-safe face index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId(u32);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// The "no element" sentinel.
            pub const NONE: Self = Self(u32::MAX);

            /// Create a new index from an arena position.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index < u32::MAX as usize, "index {} too large", index);
                Self(index as u32)
            }

            /// Arena position of this element.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// The raw `u32`, as written to index buffers.
            #[inline]
            pub fn raw(self) -> u32 {
                self.0
            }

            /// Check if this is a real element and not the sentinel.
            #[inline]
            pub fn is_some(self) -> bool {
                self.0 != u32::MAX
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_some() {
                    write!(f, "{}({})", $display, self.0)
                } else {
                    write!(f, "{}(NONE)", $display)
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::NONE
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(EdgeId, "E");
impl_index_type!(FaceId, "F");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel() {
        let v = VertexId::new(42);
        assert_eq!(v.index(), 42);
        assert!(v.is_some());

        assert!(!EdgeId::NONE.is_some());
        assert_eq!(FaceId::default(), FaceId::NONE);
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", VertexId::new(7)), "V(7)");
        assert_eq!(format!("{:?}", EdgeId::NONE), "E(NONE)");
        assert_eq!(format!("{:?}", FaceId::from(3)), "F(3)");
    }
}
