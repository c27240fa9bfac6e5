//! Flat vertex and index buffers for one chunk.

use crate::engine_state::rendering::vertex::Vertex;
use crate::engine_state::voxels::chunk::{Chunk, ChunkCoord};

use super::quad::Quad;

/// Indices of the two triangles of a quad, relative to its first vertex.
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// A chunk's quads flattened into GPU-ready buffers.
///
/// Four vertices per quad; six indices per quad forming two triangles with the
/// quad's winding.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    /// The chunk this mesh was built from.
    pub coord: ChunkCoord,
    /// Vertex buffer contents.
    pub vertices: Vec<Vertex>,
    /// Index buffer contents.
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    /// Flattens a chunk's quads.
    pub fn from_chunk(chunk: &Chunk) -> Self {
        Self::from_quads(chunk.coord(), chunk.quads())
    }

    /// Flattens a quad list.
    pub fn from_quads(coord: ChunkCoord, quads: &[Quad]) -> Self {
        let mut vertices = Vec::with_capacity(quads.len() * 4);
        let mut indices = Vec::with_capacity(quads.len() * 6);

        for quad in quads {
            let first = vertices.len() as u32;
            for (position, tex_coords) in quad.positions.iter().zip(quad.tex_coords) {
                vertices.push(Vertex::new(*position, quad.normal, tex_coords, quad.block_type));
            }
            indices.extend(QUAD_INDICES.iter().map(|index| first + index));
        }

        ChunkMesh { coord, vertices, indices }
    }

    /// Number of quads in the mesh.
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Whether the mesh has nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Vertex buffer as raw bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
