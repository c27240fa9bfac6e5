//! # Engine Configuration
//!
//! Everything the engine and the binary can be tuned with, loadable from JSON.
//! Every field has a default, so a config file only needs the keys it changes:
//!
//! ```json
//! { "seed": 7, "radius": 3, "generation": "checkerboard" }
//! ```

use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine_state::camera_state::frustum::validate_projection;
use crate::engine_state::voxels::chunk::{CHUNK_DIMENSION, MAX_CHUNK_DIMENSION};
use crate::error::EngineError;

/// How each chunk's block grid is filled.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMethod {
    /// Noise heightmap columns, solid up to the sampled height.
    #[default]
    Heightmap,
    /// Every block solid.
    Solid,
    /// Every block air.
    Empty,
    /// Alternating solid and air blocks on all three axes.
    Checkerboard,
}

/// Which noise source the heightmap samples.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseBackend {
    /// The engine's own seeded gradient noise.
    #[default]
    Gradient,
    /// The `noise` crate's Perlin, remapped into `[0, 1]`.
    Perlin,
}

/// Heightmap shaping.
///
/// Column height is `base_height + detail * detail_amplitude + hill * hill_amplitude`,
/// where `detail` is sampled at `frequency` and `hill` at `frequency * hill_frequency_ratio`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// World-to-noise scale of the detail term.
    pub frequency: f64,
    /// Hill frequency relative to `frequency`.
    pub hill_frequency_ratio: f64,
    /// Height of a column where both noise terms are zero.
    pub base_height: f64,
    /// Blocks of height contributed by the detail term.
    pub detail_amplitude: f64,
    /// Blocks of height contributed by the hill term.
    pub hill_amplitude: f64,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        TerrainSettings {
            frequency: 0.05,
            hill_frequency_ratio: 0.5,
            base_height: 4.0,
            detail_amplitude: 8.0,
            hill_amplitude: 4.0,
        }
    }
}

/// The camera the binary culls against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Eye position in world space.
    pub position: [f32; 3],
    /// Point the camera looks at.
    pub target: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Width over height.
    pub aspect: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        CameraSettings {
            position: [0.0, 64.0, 0.0],
            target: [0.0, 0.0, 0.0],
            fov_degrees: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 200.0,
        }
    }
}

/// Top-level engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the noise permutation.
    pub seed: u32,
    /// World radius in chunks, used by the binary.
    pub radius: i32,
    /// Chunk edge lengths. Must be positive and equal.
    pub chunk_dimensions: [i32; 3],
    /// Worker pool size. Defaults to the available parallelism.
    pub workers: Option<usize>,
    /// Per-task build timeout. `None` waits forever.
    pub build_timeout_ms: Option<u64>,
    /// Block fill strategy.
    pub generation: GenerationMethod,
    /// Heightmap noise source.
    pub noise: NoiseBackend,
    /// Heightmap shaping.
    pub terrain: TerrainSettings,
    /// Culling camera.
    pub camera: CameraSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let size = CHUNK_DIMENSION as i32;
        EngineConfig {
            seed: 42,
            radius: 1,
            chunk_dimensions: [size, size, size],
            workers: None,
            build_timeout_ms: Some(30_000),
            generation: GenerationMethod::default(),
            noise: NoiseBackend::default(),
            terrain: TerrainSettings::default(),
            camera: CameraSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks every setting that would otherwise fail after work was dispatched.
    ///
    /// # Returns
    /// The chunk edge length.
    pub fn validate(&self) -> Result<usize, EngineError> {
        if self.radius < 0 {
            return Err(EngineError::NegativeRadius(self.radius));
        }
        if let Some(0) = self.workers {
            return Err(EngineError::InvalidWorkerCount(0));
        }
        if let Some(0) = self.build_timeout_ms {
            return Err(EngineError::ZeroBuildTimeout);
        }
        let camera = &self.camera;
        validate_projection(camera.fov_degrees, camera.aspect, camera.near, camera.far)?;
        self.chunk_size()
    }

    /// The chunk edge length, if the three configured dimensions agree and the cube
    /// fits within [`MAX_CHUNK_DIMENSION`].
    pub fn chunk_size(&self) -> Result<usize, EngineError> {
        let [x, y, z] = self.chunk_dimensions;
        if x <= 0 || x as usize > MAX_CHUNK_DIMENSION || x != y || y != z {
            return Err(EngineError::InvalidChunkDimensions(self.chunk_dimensions));
        }
        Ok(x as usize)
    }

    /// The configured worker count, or the available parallelism.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        })
    }

    /// The per-task build timeout.
    pub fn build_timeout(&self) -> Option<Duration> {
        self.build_timeout_ms.map(Duration::from_millis)
    }
}
