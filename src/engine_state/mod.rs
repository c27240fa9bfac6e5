//! # Engine State Module
//!
//! The orchestrating layer of the terrain engine.
//!
//! ## Key Components
//!
//! * `TerrainEngine` - builds the world and answers visibility queries
//! * `camera_state` - cameras, projections and the frustum chunks are culled against
//! * `rendering` - greedy meshing and GPU-ready mesh buffers
//! * `task_management` - the worker pool chunk builds run on
//! * `voxels` - blocks, chunks, noise, terrain fill and the chunk map
//!
//! ## Generation
//!
//! `generate_world` queues one build task per missing chunk coordinate, waits for the
//! pool to finish all of them, and only then inserts the chunks into the world on the
//! calling thread. Build tasks never touch shared mutable state, so nothing is locked.

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, error, info};
use web_time::Instant;

use camera_state::camera::{Camera, Projection};
use camera_state::frustum::Frustum;
use rendering::meshing::mesh::ChunkMesh;
use task_management::task::TaskResult;
use task_management::TaskManager;
use voxels::chunk::{Chunk, ChunkCoord};
use voxels::tasks::chunk_generation_task::ChunkGenerationTask;
use voxels::terrain::TerrainGenerator;
use voxels::world::World;

use crate::config::EngineConfig;
use crate::error::EngineError;

pub mod camera_state;
pub mod rendering;
pub mod task_management;
pub mod voxels;

/// The chunked voxel terrain engine.
///
/// # Examples
///
/// ```
/// use terrain_engine::{EngineConfig, Frustum, TerrainEngine};
///
/// let mut engine = TerrainEngine::new(EngineConfig::default())?;
/// assert_eq!(engine.generate_world(1)?, 9);
///
/// let frustum = Frustum::from_perspective(90.0, 1.0, 0.1, 100.0)?;
/// for (coord, quads) in engine.render_visible(&frustum) {
///     println!("Chunk {coord} quads: {quads}");
/// }
/// # Ok::<(), terrain_engine::EngineError>(())
/// ```
pub struct TerrainEngine {
    config: EngineConfig,
    generator: Arc<TerrainGenerator>,
    world: World,
    /// Dropped after a failed build and recreated on the next one.
    task_manager: Option<TaskManager>,
}

impl TerrainEngine {
    /// Validates `config` and starts the worker pool.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let generator = Arc::new(TerrainGenerator::from_config(&config)?);
        let task_manager = TaskManager::new(config.worker_count())?;

        info!(
            "Terrain engine ready: seed {}, chunk size {}, {:?} generation, {:?} noise",
            config.seed,
            generator.chunk_size(),
            config.generation,
            config.noise
        );

        Ok(TerrainEngine {
            config,
            generator,
            world: World::new(),
            task_manager: Some(task_manager),
        })
    }

    /// Default configuration with a different seed.
    pub fn with_seed(seed: u32) -> Result<Self, EngineError> {
        Self::new(EngineConfig { seed, ..EngineConfig::default() })
    }

    /// Builds every missing chunk in `[-radius, radius]²`.
    ///
    /// Chunks that already exist are kept as they are. Either every missing chunk is
    /// inserted or, if any build fails or times out, none is.
    ///
    /// # Returns
    /// The number of chunks inserted.
    pub fn generate_world(&mut self, radius: i32) -> Result<usize, EngineError> {
        if radius < 0 {
            return Err(EngineError::NegativeRadius(radius));
        }

        let start = Instant::now();
        let task_manager = match self.task_manager.take() {
            Some(task_manager) => task_manager,
            None => TaskManager::new(self.config.worker_count())?,
        };
        let task_manager = self.task_manager.insert(task_manager);

        let mut published = 0;
        for coord in ChunkCoord::square(radius) {
            if self.world.contains_chunk(coord) {
                continue;
            }
            task_manager.publish_task(Box::new(ChunkGenerationTask::new(Arc::clone(&self.generator), coord)));
            published += 1;
        }
        info!("Generating world of radius {radius}: {published} chunks to build");

        let results = match task_manager.run_to_completion(self.config.build_timeout()) {
            Ok(results) => results,
            Err(err) => {
                error!("World generation failed, discarding this batch: {err}");
                self.task_manager = None;
                return Err(err);
            }
        };

        self.merge_results(results)?;

        info!(
            "Generated {published} chunks in {:?}, world holds {}",
            start.elapsed(),
            self.world.len()
        );
        Ok(published)
    }

    /// Inserts a finished batch into the world, or nothing if any result conflicts
    /// with a stored chunk or with another result of the batch.
    fn merge_results(&mut self, results: Vec<Box<dyn TaskResult>>) -> Result<(), EngineError> {
        let mut incoming = HashSet::with_capacity(results.len());
        for result in &results {
            let coord = result.chunk_coord();
            if self.world.contains_chunk(coord) || !incoming.insert(coord) {
                error!("Chunk {coord} is already present, discarding this batch");
                return Err(EngineError::DuplicateChunk(coord));
            }
        }

        for result in results {
            result.handle_result(&mut self.world)?;
        }
        Ok(())
    }

    /// Chunks whose bounds intersect `frustum`, in no particular order.
    pub fn visible_chunks<'a>(&'a self, frustum: &'a Frustum) -> impl Iterator<Item = (ChunkCoord, &'a Chunk)> + 'a {
        self.world
            .iter()
            .filter(move |(_, chunk)| frustum.intersects(&chunk.bounds()))
    }

    /// Visible chunks and their quad counts.
    pub fn render_visible(&self, frustum: &Frustum) -> Vec<(ChunkCoord, usize)> {
        let visible: Vec<(ChunkCoord, usize)> = self
            .visible_chunks(frustum)
            .map(|(coord, chunk)| (coord, chunk.quads().len()))
            .collect();
        debug!("{} of {} chunks visible", visible.len(), self.world.len());
        visible
    }

    /// Vertex and index buffers for every visible chunk.
    pub fn visible_meshes(&self, frustum: &Frustum) -> Vec<ChunkMesh> {
        self.visible_chunks(frustum)
            .map(|(_, chunk)| ChunkMesh::from_chunk(chunk))
            .collect()
    }

    /// The frustum of the camera in the engine's configuration.
    pub fn camera_frustum(&self) -> Result<Frustum, EngineError> {
        let camera = Camera::from_settings(&self.config.camera);
        let projection = Projection::from_settings(&self.config.camera)?;
        Ok(camera.frustum(&projection))
    }

    /// The chunk at `coord`, if built.
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.world.get_chunk_at(coord)
    }

    /// Whether the chunk at `coord` was built.
    pub fn contains_chunk(&self, coord: ChunkCoord) -> bool {
        self.world.contains_chunk(coord)
    }

    /// Number of built chunks.
    pub fn chunk_count(&self) -> usize {
        self.world.len()
    }

    /// Coordinates of every built chunk, sorted.
    pub fn coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self.world.iter().map(|(coord, _)| coord).collect();
        coords.sort();
        coords
    }

    /// The chunk map.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Chunk edge length.
    pub fn chunk_size(&self) -> usize {
        self.generator.chunk_size()
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationMethod;
    use super::task_management::task::Task;

    fn small_config(generation: GenerationMethod) -> EngineConfig {
        EngineConfig {
            chunk_dimensions: [8, 8, 8],
            workers: Some(2),
            generation,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn negative_radius_fails_before_anything_is_built() {
        let mut engine = TerrainEngine::new(small_config(GenerationMethod::Solid)).unwrap();
        assert!(matches!(engine.generate_world(-1), Err(EngineError::NegativeRadius(-1))));
        assert_eq!(engine.chunk_count(), 0);
    }

    #[test]
    fn growing_the_radius_only_builds_the_new_ring() {
        let mut engine = TerrainEngine::new(small_config(GenerationMethod::Solid)).unwrap();
        assert_eq!(engine.generate_world(0).unwrap(), 1);
        assert_eq!(engine.generate_world(2).unwrap(), 24);
        assert_eq!(engine.generate_world(2).unwrap(), 0);
        assert_eq!(engine.chunk_count(), 25);
        assert_eq!(engine.coords().first(), Some(&ChunkCoord::new(-2, -2)));
        assert_eq!(engine.coords().last(), Some(&ChunkCoord::new(2, 2)));
    }

    /// Heightmap noise that panics for any sample west of the origin.
    struct WestOfOriginPanics;

    impl noise::NoiseFn<f64, 2> for WestOfOriginPanics {
        fn get(&self, point: [f64; 2]) -> f64 {
            assert!(point[0] >= 0.0, "no terrain west of the origin");
            0.5
        }
    }

    #[test]
    fn failed_batch_inserts_nothing_and_replaces_the_pool() {
        let config = small_config(GenerationMethod::Heightmap);
        let mut engine = TerrainEngine::new(config.clone()).unwrap();
        let healthy = Arc::clone(&engine.generator);
        engine.generator = Arc::new(TerrainGenerator::with_noise(
            Box::new(WestOfOriginPanics),
            GenerationMethod::Heightmap,
            config.terrain.clone(),
            8,
        ));

        assert_eq!(engine.generate_world(0).unwrap(), 1);
        assert!(engine.task_manager.is_some());

        let err = engine.generate_world(2).unwrap_err();
        assert!(
            matches!(&err, EngineError::ChunkBuildFailed { coord, reason } if coord.x < 0 && reason.contains("west")),
            "{err:?}"
        );
        assert_eq!(engine.chunk_count(), 1);
        assert!(engine.contains_chunk(ChunkCoord::new(0, 0)));
        assert!(engine.task_manager.is_none());

        engine.generator = healthy;
        assert_eq!(engine.generate_world(2).unwrap(), 24);
        assert_eq!(engine.task_manager.as_ref().map(TaskManager::worker_count), Some(2));
        assert_eq!(engine.chunk_count(), 25);
    }

    #[test]
    fn conflicting_results_leave_the_world_untouched() {
        let mut engine = TerrainEngine::new(small_config(GenerationMethod::Solid)).unwrap();
        engine.generate_world(0).unwrap();
        let generator = Arc::clone(&engine.generator);
        let build = |x| {
            ChunkGenerationTask::new(Arc::clone(&generator), ChunkCoord::new(x, 0))
                .process()
                .unwrap()
        };

        let err = engine.merge_results(vec![build(1), build(0)]).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateChunk(coord) if coord == ChunkCoord::new(0, 0)));
        assert_eq!(engine.chunk_count(), 1);

        let err = engine.merge_results(vec![build(2), build(3), build(2)]).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateChunk(coord) if coord == ChunkCoord::new(2, 0)));
        assert_eq!(engine.chunk_count(), 1);

        engine.merge_results(vec![build(1), build(2)]).unwrap();
        assert_eq!(engine.coords(), vec![ChunkCoord::new(0, 0), ChunkCoord::new(1, 0), ChunkCoord::new(2, 0)]);
    }

    #[test]
    fn invalid_configuration_is_rejected_up_front() {
        let config = EngineConfig { chunk_dimensions: [8, 8, 9], ..EngineConfig::default() };
        assert!(matches!(TerrainEngine::new(config), Err(EngineError::InvalidChunkDimensions(_))));

        let config = EngineConfig { chunk_dimensions: [3_000_000; 3], ..EngineConfig::default() };
        assert!(matches!(TerrainEngine::new(config), Err(EngineError::InvalidChunkDimensions(_))));

        let config = EngineConfig { build_timeout_ms: Some(0), ..EngineConfig::default() };
        assert!(matches!(TerrainEngine::new(config), Err(EngineError::ZeroBuildTimeout)));

        let config = EngineConfig { workers: Some(0), ..EngineConfig::default() };
        assert!(matches!(TerrainEngine::new(config), Err(EngineError::InvalidWorkerCount(0))));
    }

    #[test]
    fn visible_meshes_match_render_listing() {
        let mut engine = TerrainEngine::new(small_config(GenerationMethod::Checkerboard)).unwrap();
        engine.generate_world(1).unwrap();
        let frustum = engine.camera_frustum().unwrap();

        let mut listing = engine.render_visible(&frustum);
        listing.sort();
        let mut meshes: Vec<(ChunkCoord, usize)> = engine
            .visible_meshes(&frustum)
            .iter()
            .map(|mesh| (mesh.coord, mesh.quad_count()))
            .collect();
        meshes.sort();

        assert!(!listing.is_empty());
        assert_eq!(listing, meshes);
    }

    #[test]
    fn queries_reflect_built_chunks() {
        let mut engine = TerrainEngine::with_seed(11).unwrap();
        engine.generate_world(0).unwrap();
        let origin = ChunkCoord::new(0, 0);
        assert!(engine.contains_chunk(origin));
        assert!(engine.chunk(ChunkCoord::new(1, 0)).is_none());
        assert_eq!(engine.chunk(origin).unwrap().size(), engine.chunk_size());
        assert_eq!(engine.config().seed, 11);
        assert_eq!(engine.world().len(), 1);
    }
}
