//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and maps each one to the
//! sweep axis and direction the greedy mesher emits it from.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    Front = 0,

    /// The back face (facing negative Z)
    Back = 1,

    /// The bottom face (facing negative Y)
    Bottom = 2,

    /// The top face (facing positive Y)
    Top = 3,

    /// The left face (facing negative X)
    Left = 4,

    /// The right face (facing positive X)
    Right = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::Front,
            BlockSide::Back,
            BlockSide::Bottom,
            BlockSide::Top,
            BlockSide::Left,
            BlockSide::Right,
        ]
    }

    /// Picks the face perpendicular to `axis` (0 = X, 1 = Y, 2 = Z).
    ///
    /// # Arguments
    /// * `axis` - The sweep axis the face is perpendicular to
    /// * `forward` - Whether the face points toward increasing coordinates on that axis
    ///
    /// # Panics
    /// Panics if `axis` is not 0, 1 or 2.
    pub(crate) fn from_axis(axis: usize, forward: bool) -> Self {
        match (axis, forward) {
            (0, true) => BlockSide::Right,
            (0, false) => BlockSide::Left,
            (1, true) => BlockSide::Top,
            (1, false) => BlockSide::Bottom,
            (2, true) => BlockSide::Front,
            (2, false) => BlockSide::Back,
            _ => panic!("axis {axis} is not one of the three block axes"),
        }
    }

    /// The unit normal pointing out of the block through this face.
    pub fn normal(self) -> Vector3<f32> {
        match self {
            BlockSide::Front => Vector3::unit_z(),
            BlockSide::Back => -Vector3::unit_z(),
            BlockSide::Bottom => -Vector3::unit_y(),
            BlockSide::Top => Vector3::unit_y(),
            BlockSide::Left => -Vector3::unit_x(),
            BlockSide::Right => Vector3::unit_x(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_and_direction_select_matching_normal() {
        for axis in 0..3 {
            let forward = BlockSide::from_axis(axis, true).normal();
            let backward = BlockSide::from_axis(axis, false).normal();
            assert_eq!(forward[axis], 1.0);
            assert_eq!(backward[axis], -1.0);
            assert_eq!(forward + backward, Vector3::new(0.0, 0.0, 0.0));
        }
    }

    #[test]
    #[should_panic(expected = "not one of the three block axes")]
    fn fourth_axis_is_a_bug() {
        BlockSide::from_axis(3, true);
    }

    #[test]
    fn all_sides_are_distinct() {
        let sides = BlockSide::all();
        for (i, a) in sides.iter().enumerate() {
            for b in sides.iter().skip(i + 1) {
                assert_ne!(a.normal(), b.normal());
            }
        }
    }
}
