//! # World Module
//!
//! This module provides the `World` struct which owns every built chunk, keyed by
//! its grid coordinate.
//!
//! ## Ownership
//!
//! Chunks are stored by value. Build tasks hand their chunk back by move and the
//! orchestrating thread inserts it; nothing else ever holds a reference across
//! threads, so the map needs no lock.

use std::collections::HashMap;

use crate::engine_state::voxels::chunk::{Chunk, ChunkCoord};
use crate::error::EngineError;

/// Represents a voxel world composed of multiple chunks.
///
/// At most one chunk exists per coordinate, and a chunk is never replaced or
/// removed once inserted.
#[derive(Debug, Default)]
pub struct World {
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl World {
    /// Creates a new, empty world.
    pub fn new() -> Self {
        World { chunks: HashMap::new() }
    }

    /// Inserts a chunk under its own coordinate.
    ///
    /// # Errors
    /// [`EngineError::DuplicateChunk`] if the coordinate is already occupied. The
    /// stored chunk is left untouched.
    pub fn insert_chunk(&mut self, chunk: Chunk) -> Result<(), EngineError> {
        let coord = chunk.coord();
        if self.chunks.contains_key(&coord) {
            return Err(EngineError::DuplicateChunk(coord));
        }
        self.chunks.insert(coord, chunk);
        Ok(())
    }

    /// Retrieves the chunk at the given coordinate, if one was built.
    pub fn get_chunk_at(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Whether a chunk exists at the given coordinate.
    pub fn contains_chunk(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Number of stored chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the world holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Iterates all chunks in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (ChunkCoord, &Chunk)> {
        self.chunks.iter().map(|(coord, chunk)| (*coord, chunk))
    }
}
