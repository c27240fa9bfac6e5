//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides functionality for block type identification and conversion from
//! the compact id stored in vertex buffers.

use num_derive::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// The mesher only ever asks two questions of a block type: whether it is `Air`,
/// and whether it equals its neighbour. New materials can be appended here without
/// touching the meshing algorithm. The `FromPrimitive` derive allows conversion from
/// the integer id written into vertex data.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Non-solid, never meshed.
    #[default]
    Air = 0,

    /// The generic opaque terrain block produced by the heightmap fill.
    Solid = 1,

    /// A dirt block.
    Dirt = 2,

    /// A grass block.
    Grass = 3,

    /// A stone block.
    Stone = 4,
}

impl BlockType {
    /// Converts a compact id back into a `BlockType`.
    ///
    /// # Returns
    /// `None` if the id does not name a block type.
    pub fn from_id(id: BlockTypeSize) -> Option<Self> {
        num_traits::FromPrimitive::from_u8(id)
    }

    /// The compact id of this block type.
    pub fn id(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Whether the block occupies space. Everything except `Air` does.
    pub fn is_solid(self) -> bool {
        self != BlockType::Air
    }
}
