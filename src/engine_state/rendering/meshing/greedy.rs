//! Greedy meshing implementation for voxel rendering.
//!
//! This module implements the greedy meshing algorithm which combines adjacent coplanar
//! faces of the same material into larger quads, reducing the face count from one per
//! exposed block face to one per rectangular region.
//!
//! # Algorithm
//!
//! For each sweep axis, with `u` and `v` the two other axes, every slice boundary
//! `d` in `0..=size` gets a `size × size` mask. A mask cell compares the block at `d`
//! with the block at `d - 1`; out-of-range cells read as air, so the chunk's outer
//! faces fall out of the same comparison. Differing cells become active, tagged with
//! the non-air material and the direction the face points. The mask is then consumed
//! row by row: each active cell grows a rectangle first along `u`, then along `v`
//! while whole rows match, and every rectangle becomes one quad.
//!
//! Faces never merge across chunk boundaries.

use cgmath::{Point3, Vector3};
use web_time::Instant;

use super::quad::{Quad, QUAD_TEX_COORDS};
use crate::engine_state::voxels::block::block_side::BlockSide;
use crate::engine_state::voxels::block::block_type::BlockType;
use crate::engine_state::voxels::chunk::{cell_count, Chunk};
use crate::error::EngineError;

/// An active mask cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct MaskCell {
    block_type: BlockType,
    /// The face points toward increasing sweep coordinates.
    forward: bool,
}

/// Turns a chunk's block grid into quads. Stateless; safe to run on many chunks at once.
pub struct GreedyMesher;

impl GreedyMesher {
    /// Meshes `chunk`, returning world-space quads.
    ///
    /// # Errors
    /// [`EngineError::InvalidChunkDimensions`] for an unsupported size,
    /// [`EngineError::MalformedChunk`] if the block grid does not hold `size³` blocks.
    pub fn mesh(chunk: &Chunk) -> Result<Vec<Quad>, EngineError> {
        let size = chunk.size();
        let expected = cell_count(size)?;
        if chunk.blocks().len() != expected {
            return Err(EngineError::MalformedChunk { expected, actual: chunk.blocks().len() });
        }

        let start = Instant::now();
        let origin = chunk.origin();
        let origin = Vector3::new(origin.x as f32, origin.y as f32, origin.z as f32);

        let mut quads = Vec::new();
        let mut mask: Vec<Option<MaskCell>> = vec![None; size * size];

        for axis in 0..3 {
            let u = (axis + 1) % 3;
            let v = (axis + 2) % 3;

            for d in 0..=size {
                Self::fill_mask(chunk, &mut mask, axis, u, v, d);

                for j in 0..size {
                    let mut i = 0;
                    while i < size {
                        let Some(cell) = mask[i + j * size] else {
                            i += 1;
                            continue;
                        };

                        let mut width = 1;
                        while i + width < size && mask[i + width + j * size] == Some(cell) {
                            width += 1;
                        }

                        let mut height = 1;
                        while j + height < size
                            && (0..width).all(|k| mask[i + k + (j + height) * size] == Some(cell))
                        {
                            height += 1;
                        }

                        let mut base = [0.0f32; 3];
                        base[axis] = d as f32;
                        base[u] = i as f32;
                        base[v] = j as f32;
                        let mut du = Vector3::new(0.0, 0.0, 0.0);
                        du[u] = width as f32;
                        let mut dv = Vector3::new(0.0, 0.0, 0.0);
                        dv[v] = height as f32;

                        quads.push(Self::quad(Point3::from(base) + origin, du, dv, axis, cell));

                        for row in j..j + height {
                            for column in i..i + width {
                                mask[column + row * size] = None;
                            }
                        }
                        i += width;
                    }
                }
            }
        }

        log::trace!(
            "Greedy meshed chunk {} into {} quads in {:?}",
            chunk.coord(),
            quads.len(),
            start.elapsed()
        );

        Ok(quads)
    }

    fn fill_mask(chunk: &Chunk, mask: &mut [Option<MaskCell>], axis: usize, u: usize, v: usize, d: usize) {
        let size = chunk.size();
        for j in 0..size {
            for i in 0..size {
                let mut current = [0i32; 3];
                current[axis] = d as i32;
                current[u] = i as i32;
                current[v] = j as i32;
                let mut behind = current;
                behind[axis] -= 1;

                let current = chunk.at(current[0], current[1], current[2]);
                let behind = chunk.at(behind[0], behind[1], behind[2]);

                mask[i + j * size] = (current != behind).then(|| MaskCell {
                    block_type: if current != BlockType::Air { current } else { behind },
                    forward: current == BlockType::Air,
                });
            }
        }
    }

    fn quad(base: Point3<f32>, du: Vector3<f32>, dv: Vector3<f32>, axis: usize, cell: MaskCell) -> Quad {
        let v0 = base;
        let v1 = base + du;
        let v2 = base + du + dv;
        let v3 = base + dv;

        let positions = if cell.forward { [v0, v1, v2, v3] } else { [v0, v3, v2, v1] };
        let side = BlockSide::from_axis(axis, cell.forward);

        Quad {
            positions,
            tex_coords: QUAD_TEX_COORDS,
            normal: side.normal(),
            block_type: cell.block_type,
            side,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use approx::assert_relative_eq;

    use super::*;
    use crate::engine_state::voxels::chunk::{ChunkBuilder, ChunkCoord};

    fn chunk_with(size: usize, cells: &[(usize, usize, usize, BlockType)]) -> Chunk {
        let mut builder = ChunkBuilder::new(ChunkCoord::new(0, 0), size);
        for &(x, y, z, block) in cells {
            builder.set_block(x, y, z, block);
        }
        builder.finish().unwrap()
    }

    #[test]
    fn single_block_gives_six_unit_quads_facing_out() {
        let chunk = chunk_with(4, &[(1, 2, 1, BlockType::Solid)]);
        let quads = chunk.quads();
        assert_eq!(quads.len(), 6);

        let center = Point3::new(1.5f32, 2.5, 1.5);
        let sides: HashSet<BlockSide> = quads.iter().map(|quad| quad.side).collect();
        assert_eq!(sides.len(), 6);

        for quad in quads {
            assert_relative_eq!(quad.area(), 1.0);
            let corner_sum = quad.positions.iter().fold(Vector3::new(0.0, 0.0, 0.0), |acc, p| {
                acc + Vector3::new(p.x, p.y, p.z)
            });
            let face_center = Point3::new(corner_sum.x / 4.0, corner_sum.y / 4.0, corner_sum.z / 4.0);
            assert_relative_eq!(face_center - center, quad.normal * 0.5);
            assert_eq!(quad.block_type, BlockType::Solid);
        }
    }

    #[test]
    fn full_chunk_merges_into_one_quad_per_side() {
        let chunk = Chunk::solid(ChunkCoord::new(0, 0), 16).unwrap();
        let quads = chunk.quads();
        assert_eq!(quads.len(), 6);
        for quad in quads {
            assert_relative_eq!(quad.area(), 256.0);
        }
    }

    #[test]
    fn empty_chunk_has_no_quads() {
        let chunk = Chunk::empty(ChunkCoord::new(0, 0), 16).unwrap();
        assert!(GreedyMesher::mesh(&chunk).unwrap().is_empty());
    }

    #[test]
    fn winding_matches_normal() {
        let chunk = Chunk::checkerboard(ChunkCoord::new(0, 0), 4).unwrap();
        assert!(!chunk.quads().is_empty());
        for quad in chunk.quads() {
            assert_relative_eq!(quad.winding_normal(), quad.normal);
            assert_eq!(quad.normal, quad.side.normal());
        }
    }

    #[test]
    fn material_boundaries_split_quads() {
        let size = 4;
        let mut cells = Vec::new();
        for z in 0..size {
            for y in 0..size {
                for x in 0..size {
                    let block = if x < 2 { BlockType::Solid } else { BlockType::Dirt };
                    cells.push((x, y, z, block));
                }
            }
        }
        let chunk = chunk_with(size, &cells);
        let quads = chunk.quads();
        assert_eq!(quads.len(), 11);

        // The shared wall belongs to the block on the far side and faces back toward x = 0.
        let wall: Vec<&Quad> = quads
            .iter()
            .filter(|quad| quad.positions.iter().all(|p| p.x == 2.0))
            .collect();
        assert_eq!(wall.len(), 1);
        assert_eq!(wall[0].block_type, BlockType::Dirt);
        assert_eq!(wall[0].side, BlockSide::Left);
        assert_relative_eq!(wall[0].area(), 16.0);
    }

    #[test]
    fn quads_are_offset_into_world_space() {
        let mut builder = ChunkBuilder::new(ChunkCoord::new(-1, 2), 8);
        builder.set_block(0, 0, 0, BlockType::Stone);
        let chunk = builder.finish().unwrap();
        for quad in chunk.quads() {
            for p in quad.positions {
                assert!((-8.0..=-7.0).contains(&p.x), "{p:?}");
                assert!((0.0..=1.0).contains(&p.y), "{p:?}");
                assert!((16.0..=17.0).contains(&p.z), "{p:?}");
            }
        }
    }

    #[test]
    fn quad_area_matches_exposed_faces_per_side() {
        let size = 6;
        let mut cells = Vec::new();
        for z in 0..size {
            for x in 0..size {
                let column = (x * 7 + z * 3) % 5;
                for y in 0..=column {
                    // A hole buried inside the (3, 1) column.
                    if (x, y, z) == (3, 1, 1) {
                        continue;
                    }
                    cells.push((x, y, z, BlockType::Solid));
                }
            }
        }
        // A floating block.
        cells.push((2, 5, 2, BlockType::Solid));
        let chunk = chunk_with(size, &cells);
        assert_eq!(chunk.at(3, 1, 1), BlockType::Air);
        assert!(chunk.at(3, 2, 1).is_solid());

        let mut exposed: HashMap<BlockSide, f32> = HashMap::new();
        for z in 0..size as i32 {
            for y in 0..size as i32 {
                for x in 0..size as i32 {
                    if !chunk.at(x, y, z).is_solid() {
                        continue;
                    }
                    for side in BlockSide::all() {
                        let n = side.normal();
                        let neighbour = chunk.at(x + n.x as i32, y + n.y as i32, z + n.z as i32);
                        if !neighbour.is_solid() {
                            *exposed.entry(side).or_default() += 1.0;
                        }
                    }
                }
            }
        }

        let mut meshed: HashMap<BlockSide, f32> = HashMap::new();
        for quad in chunk.quads() {
            *meshed.entry(quad.side).or_default() += quad.area();
        }
        assert_eq!(meshed, exposed);
    }

    #[test]
    fn malformed_grid_is_rejected() {
        let chunk = Chunk::unmeshed(ChunkCoord::new(0, 0), 3, vec![BlockType::Solid; 26]);
        assert!(matches!(
            GreedyMesher::mesh(&chunk),
            Err(EngineError::MalformedChunk { expected: 27, actual: 26 })
        ));
        let chunk = Chunk::unmeshed(ChunkCoord::new(0, 0), 0, Vec::new());
        assert!(GreedyMesher::mesh(&chunk).is_err());
    }
}
