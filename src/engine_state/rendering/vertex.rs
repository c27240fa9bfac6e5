//! Vertex data structures for voxel rendering.
//!
//! This module defines the vertex format chunk meshes are flattened into before they
//! are handed to a rendering layer.

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::block::block_type::BlockType;

/// A vertex of a chunk mesh.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Normal: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Block Type: u32 (4 bytes)
///
/// Total size: 36 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in world space
    pub position: [f32; 3],
    /// Face normal
    pub normal: [f32; 3],
    /// UV texture coordinates (normalized 0.0-1.0)
    pub tex_coords: [f32; 2],
    /// Block type id, see [`BlockType::from_id`]
    pub block_type: u32,
}

impl Vertex {
    /// Creates a new vertex with the given parameters.
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, tex_coords: [f32; 2], block_type: BlockType) -> Self {
        Vertex {
            position: position.into(),
            normal: normal.into(),
            tex_coords,
            block_type: u32::from(block_type.id()),
        }
    }

    /// Decodes the block type id.
    pub fn block_type(&self) -> Option<BlockType> {
        u8::try_from(self.block_type).ok().and_then(BlockType::from_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 36);
    }

    #[test]
    fn block_type_round_trips_and_rejects_garbage() {
        let vertex = Vertex::new(Point3::new(1.0, 2.0, 3.0), Vector3::unit_y(), [0.0, 1.0], BlockType::Grass);
        assert_eq!(vertex.block_type(), Some(BlockType::Grass));
        assert_eq!(vertex.position, [1.0, 2.0, 3.0]);

        let garbage = Vertex { block_type: 9_000, ..vertex };
        assert_eq!(garbage.block_type(), None);
    }
}
