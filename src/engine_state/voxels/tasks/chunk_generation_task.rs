//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask`, which fills and meshes one chunk on
//! a worker thread and hands it back for insertion into the world.

use std::sync::Arc;

use web_time::Instant;

use crate::engine_state::task_management::task::{Task, TaskResult};
use crate::engine_state::voxels::chunk::{Chunk, ChunkCoord};
use crate::engine_state::voxels::terrain::TerrainGenerator;
use crate::engine_state::voxels::world::World;
use crate::error::EngineError;

/// A task that builds the chunk at one coordinate.
///
/// The generator is shared read-only; the chunk is created and owned by the task.
pub struct ChunkGenerationTask {
    generator: Arc<TerrainGenerator>,
    coord: ChunkCoord,
}

impl ChunkGenerationTask {
    /// Creates a new chunk generation task.
    pub fn new(generator: Arc<TerrainGenerator>, coord: ChunkCoord) -> Self {
        ChunkGenerationTask { generator, coord }
    }
}

impl Task for ChunkGenerationTask {
    fn chunk_coord(&self) -> ChunkCoord {
        self.coord
    }

    fn process(&self) -> Result<Box<dyn TaskResult>, EngineError> {
        let start = Instant::now();
        let chunk = self.generator.build_chunk(self.coord)?;
        log::trace!(
            "Built chunk {} ({} solid blocks, {} quads) in {:?}",
            self.coord,
            chunk.solid_count(),
            chunk.quads().len(),
            start.elapsed()
        );

        Ok(Box::new(ChunkGenerationTaskResult { chunk }))
    }
}

/// The result of a chunk generation task: the finished chunk.
pub struct ChunkGenerationTaskResult {
    chunk: Chunk,
}

impl TaskResult for ChunkGenerationTaskResult {
    fn chunk_coord(&self) -> ChunkCoord {
        self.chunk.coord()
    }

    /// Inserts the chunk into the world.
    fn handle_result(self: Box<Self>, world: &mut World) -> Result<(), EngineError> {
        world.insert_chunk(self.chunk)
    }
}
