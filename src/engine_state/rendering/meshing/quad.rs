//! A single axis-aligned rectangle of a chunk mesh.

use cgmath::{InnerSpace, Point3, Vector3};

use crate::engine_state::voxels::block::block_side::BlockSide;
use crate::engine_state::voxels::block::block_type::BlockType;

/// Texture coordinates every quad uses, one per corner.
pub const QUAD_TEX_COORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// One merged face of a chunk mesh, in world coordinates.
///
/// Corners are wound counter-clockwise when viewed from the side the normal points
/// to, so `(p1 - p0) × (p3 - p0)` points along `normal`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    /// Corner positions.
    pub positions: [Point3<f32>; 4],
    /// Corner texture coordinates.
    pub tex_coords: [[f32; 2]; 4],
    /// Unit normal, always along a world axis.
    pub normal: Vector3<f32>,
    /// Material of the face.
    pub block_type: BlockType,
    /// Which block face this quad covers.
    pub side: BlockSide,
}

impl Quad {
    /// Surface area in block faces.
    pub fn area(&self) -> f32 {
        let [p0, p1, _, p3] = self.positions;
        (p1 - p0).cross(p3 - p0).magnitude()
    }

    /// Geometric normal implied by the winding. Matches `normal` for every quad the
    /// mesher emits.
    pub fn winding_normal(&self) -> Vector3<f32> {
        let [p0, p1, _, p3] = self.positions;
        (p1 - p0).cross(p3 - p0).normalize()
    }
}
