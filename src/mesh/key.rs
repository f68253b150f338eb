//! Position keys for merging coincident vertices.
//!
//! Two vertices are treated as the same point when their coordinates fall into
//! the same cell of a grid with spacing [`MERGE_TOLERANCE`]. Keys are used to
//! match symmetric half-edges, to terminate one-ring walks, to share odd
//! vertices between the two triangles of an edge, and to weld loader output.

use nalgebra::Point3;

/// Default grid spacing for position keys.
pub const MERGE_TOLERANCE: f32 = 1e-5;

/// Grid spacing that selects exact matching: two positions share a key only
/// when their coordinates are bit-identical.
pub const EXACT: f32 = 0.0;

/// A vertex position quantized to the merge grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PositionKey([i64; 3]);

impl PositionKey {
    /// Quantize `p` to a grid of the given spacing. A spacing of [`EXACT`]
    /// keys on the coordinate bits instead.
    #[inline]
    pub fn new(p: &Point3<f32>, tolerance: f32) -> Self {
        if tolerance == EXACT {
            return Self::exact(p);
        }
        let step = tolerance as f64;
        Self([
            (p.x as f64 / step).round() as i64,
            (p.y as f64 / step).round() as i64,
            (p.z as f64 / step).round() as i64,
        ])
    }

    /// Key on the exact coordinates. `-0.0` and `0.0` share a key.
    #[inline]
    pub fn exact(p: &Point3<f32>) -> Self {
        let bits = |c: f32| if c == 0.0 { 0 } else { c.to_bits() as i64 };
        Self([bits(p.x), bits(p.y), bits(p.z)])
    }

    /// Quantize `p` with [`MERGE_TOLERANCE`].
    #[inline]
    pub fn of(p: &Point3<f32>) -> Self {
        Self::new(p, MERGE_TOLERANCE)
    }

    /// The quantized grid coordinates.
    pub fn cells(&self) -> [i64; 3] {
        self.0
    }
}

/// Key of a directed edge: `(start, end)`.
pub type DirectedKey = (PositionKey, PositionKey);

/// Key of an undirected edge, independent of traversal direction.
#[inline]
pub fn undirected(a: PositionKey, b: PositionKey) -> DirectedKey {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_points_share_key() {
        let a = Point3::new(0.25_f32, -1.5, 3.0);
        let b = Point3::new(0.25_f32, -1.5, 3.0);
        assert_eq!(PositionKey::of(&a), PositionKey::of(&b));
    }

    #[test]
    fn test_tolerance_merges_nearby_points() {
        let a = Point3::new(1.0_f32, 1.0, 1.0);
        let b = Point3::new(1.000_000_2_f32, 1.0, 1.0);
        let c = Point3::new(1.001_f32, 1.0, 1.0);
        assert_eq!(PositionKey::of(&a), PositionKey::of(&b));
        assert_ne!(PositionKey::of(&a), PositionKey::of(&c));
        assert_eq!(PositionKey::new(&a, 0.01), PositionKey::new(&c, 0.01));
    }

    #[test]
    fn test_exact_keys_separate_tiny_offsets() {
        let a = Point3::new(1e-7_f32, 0.0, 0.0);
        let b = Point3::new(2e-7_f32, 0.0, 0.0);
        assert_eq!(PositionKey::of(&a), PositionKey::of(&b));
        assert_ne!(PositionKey::exact(&a), PositionKey::exact(&b));
        assert_eq!(PositionKey::new(&a, EXACT), PositionKey::exact(&a));
        assert_eq!(
            PositionKey::exact(&Point3::new(-0.0, 0.0, 0.0)),
            PositionKey::exact(&Point3::origin())
        );
    }

    #[test]
    fn test_undirected_is_symmetric() {
        let a = PositionKey::of(&Point3::new(0.0, 0.0, 0.0));
        let b = PositionKey::of(&Point3::new(1.0, 0.0, 0.0));
        assert_eq!(undirected(a, b), undirected(b, a));
        assert_ne!((a, b), (b, a));
    }
}
