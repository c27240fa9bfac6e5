//! # Chunk Coordinates
//!
//! Chunks sit on a horizontal grid. A `ChunkCoord` names one grid cell and keys the
//! world's chunk map; it carries no size information, so the world-space origin is
//! always derived from the chunk edge length at the call site.

use std::fmt;

use cgmath::Point3;

/// Position of a chunk on the horizontal chunk grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// Grid column along the world X axis.
    pub x: i32,
    /// Grid row along the world Z axis.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a coordinate from its grid components.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// World-space position of the chunk's minimum corner: `(x * size, 0, z * size)`.
    pub fn origin(self, size: usize) -> Point3<i32> {
        let size = size as i32;
        Point3::new(self.x * size, 0, self.z * size)
    }

    /// Every coordinate in the square `[-radius, radius]²`, x-major then z.
    ///
    /// A negative radius yields nothing.
    pub fn square(radius: i32) -> impl Iterator<Item = ChunkCoord> {
        (-radius..=radius).flat_map(move |x| (-radius..=radius).map(move |z| ChunkCoord::new(x, z)))
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from((x, z): (i32, i32)) -> Self {
        Self::new(x, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_enumerates_x_major() {
        let coords: Vec<ChunkCoord> = ChunkCoord::square(1).collect();
        assert_eq!(coords.len(), 9);
        assert_eq!(coords[0], ChunkCoord::new(-1, -1));
        assert_eq!(coords[1], ChunkCoord::new(-1, 0));
        assert_eq!(coords[3], ChunkCoord::new(0, -1));
        assert_eq!(coords[8], ChunkCoord::new(1, 1));
    }

    #[test]
    fn zero_radius_is_single_chunk_and_negative_is_empty() {
        assert_eq!(ChunkCoord::square(0).collect::<Vec<_>>(), vec![ChunkCoord::new(0, 0)]);
        assert_eq!(ChunkCoord::square(-1).count(), 0);
    }

    #[test]
    fn origin_scales_by_chunk_size() {
        assert_eq!(ChunkCoord::new(-2, 3).origin(16), Point3::new(-32, 0, 48));
    }

    #[test]
    fn displays_as_pair() {
        assert_eq!(ChunkCoord::new(1, -1).to_string(), "(1, -1)");
    }
}
