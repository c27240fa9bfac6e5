//! # Chunk Creation Module
//!
//! `ChunkBuilder` fills a chunk's block grid either sequentially, walking the grid
//! in storage order, or by explicit coordinates. Finishing the builder runs the
//! greedy mesher, so every `Chunk` that leaves this module carries its mesh.

use crate::engine_state::voxels::block::block_type::BlockType;
use crate::error::EngineError;

use super::{cell_count, Chunk, ChunkCoord};

/// A builder for creating and populating chunks.
///
/// Blocks not written before [`ChunkBuilder::finish`] stay `Air`.
pub struct ChunkBuilder {
    coord: ChunkCoord,
    size: usize,
    blocks: Vec<BlockType>,
    /// Cursor for `push_block_type`, in storage order.
    local_x: usize,
    local_y: usize,
    local_z: usize,
}

impl ChunkBuilder {
    /// Creates a builder for a chunk of edge length `size` at `coord`, filled with air.
    ///
    /// An unsupported size gets no grid at all; [`ChunkBuilder::finish`] reports it.
    pub fn new(coord: ChunkCoord, size: usize) -> Self {
        ChunkBuilder {
            coord,
            size,
            blocks: vec![BlockType::Air; cell_count(size).unwrap_or(0)],
            local_x: 0,
            local_y: 0,
            local_z: 0,
        }
    }

    /// Writes a block at the cursor and advances it along x, then y, then z.
    ///
    /// Pushes past the end of the grid are ignored.
    pub fn push_block_type(&mut self, block_type: BlockType) {
        if self.local_z >= self.size {
            return;
        }
        self.set_block(self.local_x, self.local_y, self.local_z, block_type);

        self.local_x += 1;
        if self.local_x == self.size {
            self.local_x = 0;
            self.local_y += 1;

            if self.local_y == self.size {
                self.local_y = 0;
                self.local_z += 1;
            }
        }
    }

    /// Writes a block at explicit local coordinates. Out-of-range writes are ignored.
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, block_type: BlockType) {
        if x >= self.size || y >= self.size || z >= self.size {
            return;
        }
        let index = x + y * self.size + z * self.size * self.size;
        if let Some(slot) = self.blocks.get_mut(index) {
            *slot = block_type;
        }
    }

    /// Meshes the grid and returns the finished chunk.
    ///
    /// # Errors
    /// [`EngineError::InvalidChunkDimensions`] if the builder was created with size zero
    /// or a size above [`MAX_CHUNK_DIMENSION`](super::MAX_CHUNK_DIMENSION).
    pub fn finish(self) -> Result<Chunk, EngineError> {
        Chunk::from_blocks(self.coord, self.size, self.blocks)
    }
}
