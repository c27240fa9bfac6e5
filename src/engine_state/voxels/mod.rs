//! # Voxel Engine Core
//!
//! This module contains the voxel data model and the code that produces it.
//!
//! ## Architecture
//!
//! * **Block**: block types and the six block faces
//! * **Chunk**: fixed-size block grids, their builder and their grid coordinates
//! * **NoiseField**: seeded gradient noise used for column heights
//! * **Terrain**: turns a chunk coordinate into a filled, meshed chunk
//! * **World**: owns every built chunk, keyed by coordinate
//! * **Tasks**: the build task the worker pool runs per chunk
//!
//! ## Data Flow
//!
//! 1. The engine enumerates chunk coordinates and queues one generation task each
//! 2. Workers fill and mesh their chunk on locally owned data
//! 3. After every task finished, the engine inserts the chunks into the world on its own thread

pub mod block;
pub mod chunk;
pub mod noise_field;
pub mod tasks;
pub mod terrain;
pub mod world;
