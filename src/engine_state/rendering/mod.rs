//! Rendering-side data for the voxel engine.
//!
//! Chunks are meshed here into quads, and quads are flattened into vertex and index
//! buffers. Uploading and drawing those buffers is the caller's business.

pub mod meshing;
pub mod vertex;

pub use vertex::Vertex;
