//! Mesh generation for voxel rendering.
//!
//! - `greedy`: the greedy mesher turning a block grid into merged quads
//! - `quad`: the quad type chunks store their mesh as
//! - `mesh`: flattening a chunk's quads into vertex and index buffers

pub mod greedy;
pub mod mesh;
pub mod quad;

pub use greedy::GreedyMesher;
pub use mesh::ChunkMesh;
pub use quad::Quad;
