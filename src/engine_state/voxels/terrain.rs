//! # Terrain Generation
//!
//! Turns a chunk coordinate into a finished chunk. The heightmap method samples two
//! noise octaves per world column: a detail term at the base frequency and a hill
//! term at a lower frequency. Every cell from `y = 0` up to the rounded height is
//! solid and everything above is air, so columns never have overhangs or caves.

use noise::{Clamp, NoiseFn, Perlin, ScaleBias};

use crate::config::{EngineConfig, GenerationMethod, NoiseBackend, TerrainSettings};
use crate::engine_state::voxels::block::block_type::BlockType;
use crate::engine_state::voxels::chunk::{cell_count, Chunk, ChunkBuilder, ChunkCoord};
use crate::engine_state::voxels::noise_field::NoiseField;
use crate::error::EngineError;

/// Builds chunks for one seed and one set of generation settings.
///
/// Read-only after construction; build workers share it behind an `Arc`.
pub struct TerrainGenerator {
    noise: Box<dyn NoiseFn<f64, 2> + Send + Sync>,
    settings: TerrainSettings,
    method: GenerationMethod,
    chunk_size: usize,
}

impl TerrainGenerator {
    /// Creates a generator from explicit parts.
    pub fn new(
        seed: u32,
        backend: NoiseBackend,
        method: GenerationMethod,
        settings: TerrainSettings,
        chunk_size: usize,
    ) -> Self {
        let noise: Box<dyn NoiseFn<f64, 2> + Send + Sync> = match backend {
            NoiseBackend::Gradient => Box::new(NoiseField::new(seed)),
            NoiseBackend::Perlin => Box::new(
                Clamp::new(ScaleBias::new(Perlin::new(seed)).set_scale(0.5).set_bias(0.5))
                    .set_bounds(0.0, 1.0),
            ),
        };

        Self::with_noise(noise, method, settings, chunk_size)
    }

    /// Creates a generator sampling an arbitrary noise source, expected in `[0, 1]`.
    pub(crate) fn with_noise(
        noise: Box<dyn NoiseFn<f64, 2> + Send + Sync>,
        method: GenerationMethod,
        settings: TerrainSettings,
        chunk_size: usize,
    ) -> Self {
        TerrainGenerator { noise, settings, method, chunk_size }
    }

    /// Creates a generator from a validated configuration.
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        let chunk_size = config.validate()?;
        Ok(Self::new(
            config.seed,
            config.noise,
            config.generation,
            config.terrain.clone(),
            chunk_size,
        ))
    }

    /// Edge length of the chunks this generator builds.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Raw column height at a world position, before rounding.
    pub fn sample_height(&self, world_x: i32, world_z: i32) -> f64 {
        let settings = &self.settings;
        let (x, z) = (f64::from(world_x), f64::from(world_z));

        let detail_scale = settings.frequency;
        let hill_scale = settings.frequency * settings.hill_frequency_ratio;
        let detail = self.noise.get([x * detail_scale, z * detail_scale]);
        let hill = self.noise.get([x * hill_scale, z * hill_scale]);

        settings.base_height + detail * settings.detail_amplitude + hill * settings.hill_amplitude
    }

    /// Index of the highest solid cell in a world column, clamped into the chunk.
    pub fn height_at(&self, world_x: i32, world_z: i32) -> i32 {
        let top = self.chunk_size.saturating_sub(1) as f64;
        self.sample_height(world_x, world_z).round().clamp(0.0, top) as i32
    }

    /// Fills and meshes the chunk at `coord`.
    pub fn build_chunk(&self, coord: ChunkCoord) -> Result<Chunk, EngineError> {
        let size = self.chunk_size;
        cell_count(size)?;
        match self.method {
            GenerationMethod::Heightmap => self.heightmap(coord),
            GenerationMethod::Solid => Chunk::solid(coord, size),
            GenerationMethod::Empty => Chunk::empty(coord, size),
            GenerationMethod::Checkerboard => Chunk::checkerboard(coord, size),
        }
    }

    fn heightmap(&self, coord: ChunkCoord) -> Result<Chunk, EngineError> {
        let size = self.chunk_size;
        let origin = coord.origin(size);

        let mut heights = Vec::with_capacity(size * size);
        for z in 0..size {
            for x in 0..size {
                heights.push(self.height_at(origin.x + x as i32, origin.z + z as i32));
            }
        }

        let mut builder = ChunkBuilder::new(coord, size);
        for z in 0..size {
            for y in 0..size {
                for x in 0..size {
                    let block = if y as i32 <= heights[x + z * size] {
                        BlockType::Solid
                    } else {
                        BlockType::Air
                    };
                    builder.push_block_type(block);
                }
            }
        }
        builder.finish()
    }
}
