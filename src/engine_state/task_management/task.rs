//! # Task System Core Traits
//!
//! This module defines the two halves of a unit of background work.
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task returns a boxed `TaskResult`, or an error
//! 4. Once every task has finished, each result's `handle_result()` is called on the
//!    orchestrating thread, which is the only place the world is mutated
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred to a worker
//! - `TaskResult` must be `Send` to be transferred back
//! - Tasks own their inputs; anything shared between tasks is read-only

use crate::engine_state::voxels::chunk::ChunkCoord;
use crate::engine_state::voxels::world::World;
use crate::error::EngineError;

/// A unit of work that runs on a worker thread.
///
/// Tasks should own all the data they need. A task that panics is reported as a
/// [`EngineError::ChunkBuildFailed`] for its `chunk_coord()`.
pub trait Task: Send {
    /// The chunk this task produces. Used to attribute failures and timeouts.
    fn chunk_coord(&self) -> ChunkCoord;

    /// Performs the work. Runs on a worker thread.
    fn process(&self) -> Result<Box<dyn TaskResult>, EngineError>;
}

/// The output of a `Task`, applied on the orchestrating thread.
pub trait TaskResult: Send {
    /// The chunk this result writes to.
    fn chunk_coord(&self) -> ChunkCoord;

    /// Applies the result to the world.
    ///
    /// Runs single-threaded after the build barrier, so it may mutate the world freely.
    fn handle_result(self: Box<Self>, world: &mut World) -> Result<(), EngineError>;
}
