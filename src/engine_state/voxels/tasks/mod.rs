//! # Voxel Tasks
//!
//! Work items the worker pool runs for the voxel world. A chunk generation task
//! fills and meshes one chunk off the main thread; its result is merged into the
//! [`World`](super::world::World) once the whole batch has finished.

pub mod chunk_generation_task;
