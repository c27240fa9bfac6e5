//! # Engine Errors
//!
//! Every fallible operation in the engine reports through [`EngineError`].
//!
//! Errors fall into three groups:
//! - configuration errors, detected before any build task is dispatched
//! - build failures, reported by the worker pool when a chunk task panics or stalls
//! - loading errors, raised while reading a configuration file

use std::time::Duration;

use crate::engine_state::voxels::chunk::{ChunkCoord, MAX_CHUNK_DIMENSION};

/// The error type returned by the terrain engine.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// `generate_world` was asked for a negative radius.
    #[error("World radius must not be negative, got {0}.")]
    NegativeRadius(i32),

    /// The configured chunk edge lengths are not positive, not identical on all axes,
    /// or larger than [`MAX_CHUNK_DIMENSION`].
    #[error(
        "Chunk dimensions must be positive, identical on every axis and at most {max}, got {0:?}.",
        max = MAX_CHUNK_DIMENSION
    )]
    InvalidChunkDimensions([i32; 3]),

    /// The worker pool was configured without any workers.
    #[error("The worker pool needs at least one worker, got {0}.")]
    InvalidWorkerCount(usize),

    /// A build timeout of zero, which no chunk could ever meet.
    #[error("The chunk build timeout must be positive; use null to disable it.")]
    ZeroBuildTimeout,

    /// Camera parameters do not describe a valid perspective projection.
    #[error(
        "Invalid perspective projection (fov {fov_degrees} degrees, aspect {aspect}, near {near}, far {far})."
    )]
    InvalidProjection {
        /// Vertical field of view in degrees.
        fov_degrees: f32,
        /// Width over height.
        aspect: f32,
        /// Near clip distance.
        near: f32,
        /// Far clip distance.
        far: f32,
    },

    /// A block grid whose length does not match its declared edge length.
    #[error("Chunk block grid is malformed: expected {expected} blocks, found {actual}.")]
    MalformedChunk {
        /// Number of blocks implied by the edge length.
        expected: usize,
        /// Number of blocks actually present.
        actual: usize,
    },

    /// A chunk build task aborted before returning its chunk.
    #[error("Building chunk {coord} failed: {reason}")]
    ChunkBuildFailed {
        /// The chunk the task was building.
        coord: ChunkCoord,
        /// Panic message or failure description.
        reason: String,
    },

    /// A chunk build task did not finish within the configured timeout.
    #[error("Building chunk {coord} did not finish within {timeout:?}.")]
    ChunkBuildTimedOut {
        /// The chunk the task was building.
        coord: ChunkCoord,
        /// The per-task timeout that elapsed.
        timeout: Duration,
    },

    /// The worker pool lost contact with its worker threads.
    #[error("The worker pool disconnected before all chunk builds completed.")]
    WorkerDisconnected,

    /// A chunk was inserted for a coordinate that already holds one.
    #[error("A chunk already exists at {0}.")]
    DuplicateChunk(ChunkCoord),

    /// The configuration file is not valid JSON for an `EngineConfig`.
    #[error("Failed to parse engine configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The configuration file could not be read, or a worker thread could not be spawned.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
