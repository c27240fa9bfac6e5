#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Terrain Engine
//!
//! A chunked voxel terrain engine: it procedurally generates a block world in
//! fixed-size chunks, greedy-meshes each chunk into a minimal set of quads, and
//! culls chunks against a camera frustum. Chunks are built in parallel on a worker
//! pool and merged into the world on a single thread.
//!
//! ## Key Modules
//!
//! * `config` - JSON-loadable engine configuration
//! * `engine_state` - the engine: voxels, meshing, culling and the worker pool
//! * `error` - the crate's error type
//!
//! ## Architecture
//!
//! * `NoiseField` - seeded gradient noise for column heights
//! * `Chunk` - a cubic block grid plus the quads covering its visible faces
//! * `GreedyMesher` - merges coplanar same-material faces into rectangles
//! * `Frustum` - six-plane view volume tested against chunk bounding boxes
//! * `TerrainEngine` - enumerates chunk coordinates, builds them on the pool and
//!   answers visibility queries
//!
//! ## Usage
//!
//! ```rust
//! use terrain_engine::{EngineConfig, TerrainEngine};
//!
//! let mut engine = TerrainEngine::new(EngineConfig::default())?;
//! engine.generate_world(1)?;
//! let frustum = engine.camera_frustum()?;
//! assert!(!engine.render_visible(&frustum).is_empty());
//! # Ok::<(), terrain_engine::EngineError>(())
//! ```
//!
//! Rendering, windowing and persistence are left to the caller: the engine hands
//! out quad lists or flat vertex and index buffers per visible chunk.

use anyhow::Context;
use log::info;

pub mod config;
pub mod engine_state;
pub mod error;

pub use config::EngineConfig;
pub use engine_state::camera_state::camera::{Camera, Projection};
pub use engine_state::camera_state::frustum::{Aabb, Frustum, Plane};
pub use engine_state::rendering::meshing::{ChunkMesh, GreedyMesher, Quad};
pub use engine_state::rendering::vertex::Vertex;
pub use engine_state::voxels::block::block_side::BlockSide;
pub use engine_state::voxels::block::block_type::BlockType;
pub use engine_state::voxels::chunk::{Chunk, ChunkCoord};
pub use engine_state::voxels::noise_field::NoiseField;
pub use engine_state::TerrainEngine;
pub use error::EngineError;

/// Runs the command-line front end.
///
/// Loads the configuration named by the first argument (or the defaults), builds
/// the world for the configured radius, and lists the chunks visible from the
/// configured camera with their quad counts.
pub fn run() -> anyhow::Result<()> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_path(&path)
            .with_context(|| format!("Failed to load configuration from {path}"))?,
        None => EngineConfig::default(),
    };

    let radius = config.radius;
    let mut engine = TerrainEngine::new(config).context("Failed to start the terrain engine")?;
    engine
        .generate_world(radius)
        .with_context(|| format!("Failed to generate a world of radius {radius}"))?;

    let frustum = engine.camera_frustum()?;
    let mut visible = engine.render_visible(&frustum);
    visible.sort();

    for (coord, quads) in &visible {
        println!("Chunk ({}, {}) quads: {}", coord.x, coord.z, quads);
    }
    info!("{} of {} chunks visible", visible.len(), engine.chunk_count());

    Ok(())
}
