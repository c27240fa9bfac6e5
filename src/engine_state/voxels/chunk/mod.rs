//! # Chunk Module
//!
//! This module provides the `Chunk` struct and related functionality for managing
//! cubic blocks of voxel data together with the mesh derived from them.
//!
//! ## Storage
//!
//! A chunk stores one `BlockType` per cell in a dense vector of `size³` entries.
//! Cells are laid out x-fastest, then y, then z:
//!
//! ```text
//! index = x + y * size + z * size * size
//! ```
//!
//! This is the same order [`ChunkBuilder::push_block_type`] walks, so fills that
//! generate blocks sequentially never need to compute an index.
//!
//! ## Lifecycle
//!
//! A chunk is only ever handed out fully built: the builder fills the grid, runs the
//! greedy mesher over it and returns blocks and quads together. There is no mutation
//! path afterwards.

use cgmath::Point3;

use super::block::block_type::BlockType;
use crate::engine_state::camera_state::frustum::Aabb;
use crate::engine_state::rendering::meshing::quad::Quad;
use crate::error::EngineError;

mod chunk_coord;
mod chunk_creation;

pub use chunk_coord::ChunkCoord;
pub use chunk_creation::ChunkBuilder;

/// The default edge length of a chunk in blocks.
pub const CHUNK_DIMENSION: usize = 16;

/// The largest supported chunk edge length in blocks.
pub const MAX_CHUNK_DIMENSION: usize = 256;

/// Number of cells in a chunk of edge length `size`.
///
/// # Errors
/// [`EngineError::InvalidChunkDimensions`] unless `1 <= size <= MAX_CHUNK_DIMENSION`.
pub(crate) fn cell_count(size: usize) -> Result<usize, EngineError> {
    if (1..=MAX_CHUNK_DIMENSION).contains(&size) {
        Ok(size * size * size)
    } else {
        let edge = i32::try_from(size).unwrap_or(i32::MAX);
        Err(EngineError::InvalidChunkDimensions([edge; 3]))
    }
}

/// Represents a cubic collection of voxel blocks and its mesh.
///
/// Chunks are the fundamental unit of generation, meshing and culling.
#[derive(Clone, Debug)]
pub struct Chunk {
    /// The position of this chunk on the chunk grid.
    coord: ChunkCoord,
    /// Edge length in blocks.
    size: usize,
    /// Dense block grid, `size³` entries.
    blocks: Vec<BlockType>,
    /// World-space quads covering every visible face.
    quads: Vec<Quad>,
}

impl Chunk {
    /// Builds a chunk from a ready block grid and meshes it.
    ///
    /// # Errors
    /// [`EngineError::InvalidChunkDimensions`] if `size` is zero or above
    /// [`MAX_CHUNK_DIMENSION`], [`EngineError::MalformedChunk`] if `blocks.len() != size³`.
    pub fn from_blocks(coord: ChunkCoord, size: usize, blocks: Vec<BlockType>) -> Result<Self, EngineError> {
        let expected = cell_count(size)?;
        if blocks.len() != expected {
            return Err(EngineError::MalformedChunk { expected, actual: blocks.len() });
        }
        Self::unmeshed(coord, size, blocks).meshed()
    }

    /// Creates a new, completely empty chunk (all blocks are air).
    pub fn empty(coord: ChunkCoord, size: usize) -> Result<Self, EngineError> {
        Self::filled(coord, size, |_| BlockType::Air)
    }

    /// Creates a new chunk filled with solid blocks.
    pub fn solid(coord: ChunkCoord, size: usize) -> Result<Self, EngineError> {
        Self::filled(coord, size, |_| BlockType::Solid)
    }

    /// Creates a new chunk with a 3D checkerboard pattern of solid and air blocks.
    ///
    /// The block at the chunk's minimum corner is solid.
    pub fn checkerboard(coord: ChunkCoord, size: usize) -> Result<Self, EngineError> {
        let cells = cell_count(size)?;
        let mut push_air = false;
        let mut builder = ChunkBuilder::new(coord, size);
        let plane = size * size;

        for i in 0..cells {
            builder.push_block_type(if push_air { BlockType::Air } else { BlockType::Solid });
            push_air = !push_air;

            // Keep alternating across row and plane boundaries when the size is even.
            if size % 2 == 0 && (i + 1) % size == 0 {
                push_air = !push_air;
            }
            if size % 2 == 0 && (i + 1) % plane == 0 {
                push_air = !push_air;
            }
        }

        builder.finish()
    }

    fn filled(coord: ChunkCoord, size: usize, block_at: impl Fn(usize) -> BlockType) -> Result<Self, EngineError> {
        let mut builder = ChunkBuilder::new(coord, size);
        for i in 0..cell_count(size)? {
            builder.push_block_type(block_at(i));
        }
        builder.finish()
    }

    /// A chunk with its grid filled in but no quads yet. Only the builder and the
    /// mesher tests see chunks in this state.
    pub(crate) fn unmeshed(coord: ChunkCoord, size: usize, blocks: Vec<BlockType>) -> Self {
        Self { coord, size, blocks, quads: Vec::new() }
    }

    fn meshed(mut self) -> Result<Self, EngineError> {
        self.quads = crate::engine_state::rendering::meshing::greedy::GreedyMesher::mesh(&self)?;
        Ok(self)
    }

    /// Returns the block at the given local coordinates.
    ///
    /// Any coordinate that is negative or `>= size` yields `Air`.
    pub fn at(&self, x: i32, y: i32, z: i32) -> BlockType {
        let size = self.size as i32;
        if x < 0 || y < 0 || z < 0 || x >= size || y >= size || z >= size {
            return BlockType::Air;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        self.blocks
            .get(x + y * self.size + z * self.size * self.size)
            .copied()
            .unwrap_or(BlockType::Air)
    }

    /// Returns the block at the specified chunk-relative position. See [`Chunk::at`].
    pub fn get_block_at(&self, position: Point3<i32>) -> BlockType {
        self.at(position.x, position.y, position.z)
    }

    /// The position of this chunk on the chunk grid.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Edge length in blocks.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The raw block grid in x, y, z order.
    pub fn blocks(&self) -> &[BlockType] {
        &self.blocks
    }

    /// The chunk's mesh, in world coordinates.
    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    /// Number of non-air blocks.
    pub fn solid_count(&self) -> usize {
        self.blocks.iter().filter(|block| block.is_solid()).count()
    }

    /// World-space position of the minimum corner.
    pub fn origin(&self) -> Point3<i32> {
        self.coord.origin(self.size)
    }

    /// World-space bounding box, `size` units on every axis.
    pub fn bounds(&self) -> Aabb {
        Aabb::for_chunk(self.coord, self.size)
    }
}
