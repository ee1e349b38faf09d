//! Chunk mesh generation.
//!
//! Turns a chunk coordinate into a height-field mesh by sampling the
//! height field over the chunk's terrain-unit footprint. Generation is
//! deterministic for a fixed field, which is what makes re-generating an
//! evicted chunk equivalent to having kept it.

use glam::Vec3;
use horizon_common::{ChunkCoord, TerrainError, TerrainResult};

use crate::height::HeightField;
use crate::mesh::TerrainMesh;

/// Packs a height sample into a vertex color.
///
/// Little-endian RGBA with the green channel rising with height over a
/// fixed red/blue base, so ridgelines read brighter than valleys. Heights
/// outside `[-1, 1]` saturate; the alpha channel is always opaque.
#[must_use]
pub fn height_color(height: f32) -> u32 {
    let t = ((height + 1.0) * 0.5).clamp(0.0, 1.0);
    let green = 0x40 + (t * 191.0) as u32;

    0xff20_0020 | (green << 8)
}

/// Generates chunk meshes from a height field.
///
/// `chunk_size` is the chunk edge length in terrain units (the space the
/// height field is sampled in), `resolution` is the number of quads per
/// chunk edge, and `world_scale` converts terrain units to the render
/// units the emitted vertices are in.
pub struct MeshGenerator {
    field: Box<dyn HeightField>,
    chunk_size: f32,
    resolution: u32,
    world_scale: f32,
}

impl MeshGenerator {
    /// Creates a generator over the given height field.
    pub fn new(
        field: impl HeightField + 'static,
        chunk_size: f32,
        resolution: u32,
        world_scale: f32,
    ) -> Self {
        Self {
            field: Box::new(field),
            chunk_size,
            resolution,
            world_scale,
        }
    }

    /// Quads per chunk edge.
    #[must_use]
    pub const fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Generates the mesh for one chunk.
    ///
    /// The chunk covers `[coord.x * chunk_size, (coord.x + 1) * chunk_size)
    /// × [coord.z * chunk_size, ...)` in terrain units, sampled at quad
    /// corners so the far edge is included. Each grid cell becomes one
    /// quad: two triangles over four flat-shaded vertices, counter-
    /// clockwise when seen from above.
    ///
    /// A non-finite height sample fails the whole chunk with
    /// [`TerrainError::Generation`]; no partial mesh is ever returned.
    pub fn generate(&self, coord: ChunkCoord) -> TerrainResult<TerrainMesh> {
        let quads = self.resolution as usize;
        let vertex_count = quads * quads * 4;

        let mut positions = Vec::with_capacity(vertex_count);
        let mut normals = Vec::with_capacity(vertex_count);
        let mut colors = Vec::with_capacity(vertex_count);
        let mut indices = Vec::with_capacity(quads * quads * 6);

        let base_x = coord.x as f32 * self.chunk_size;
        let base_z = coord.z as f32 * self.chunk_size;
        let step = self.chunk_size / self.resolution as f32;

        let mut index_base = 0u32;

        for qx in 0..quads {
            for qz in 0..quads {
                let x0 = qx as f32 * step;
                let x1 = (qx + 1) as f32 * step;
                let z0 = qz as f32 * step;
                let z1 = (qz + 1) as f32 * step;

                let h00 = self.sample(coord, base_x + x0, base_z + z0)?;
                let h01 = self.sample(coord, base_x + x0, base_z + z1)?;
                let h10 = self.sample(coord, base_x + x1, base_z + z0)?;
                let h11 = self.sample(coord, base_x + x1, base_z + z1)?;

                let s = self.world_scale;
                let v = [
                    Vec3::new(x1 * s, h11, z1 * s),
                    Vec3::new(x1 * s, h10, z0 * s),
                    Vec3::new(x0 * s, h00, z0 * s),
                    Vec3::new(x0 * s, h01, z1 * s),
                ];

                let n0 = (v[1] - v[0]).cross(v[2] - v[0]).normalize();
                let n1 = (v[3] - v[2]).cross(v[0] - v[2]).normalize();

                positions.extend_from_slice(&v);
                normals.extend_from_slice(&[n0, n0, n0, n1]);
                colors.extend_from_slice(&[
                    height_color(h11),
                    height_color(h10),
                    height_color(h00),
                    height_color(h01),
                ]);
                indices.extend_from_slice(&[
                    index_base,
                    index_base + 1,
                    index_base + 2,
                    index_base + 2,
                    index_base + 3,
                    index_base,
                ]);

                index_base += 4;
            }
        }

        Ok(TerrainMesh::new(positions, normals, colors, indices))
    }

    fn sample(&self, coord: ChunkCoord, x: f32, z: f32) -> TerrainResult<f32> {
        let height = self.field.sample(x, z);

        if height.is_finite() {
            Ok(height)
        } else {
            Err(TerrainError::Generation {
                coord,
                reason: format!("non-finite height sample at ({x}, {z})"),
            })
        }
    }
}

impl std::fmt::Debug for MeshGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshGenerator")
            .field("chunk_size", &self.chunk_size)
            .field("resolution", &self.resolution)
            .field("world_scale", &self.world_scale)
            .finish_non_exhaustive()
    }
}
