//! Chunk mesh data.

use glam::Vec3;

/// Immutable triangle mesh for one terrain chunk.
///
/// Four parallel sequences: vertex positions, vertex normals, packed RGBA
/// vertex colors, and a triangle index list. The three vertex arrays stay
/// in lockstep; every index references them. Once constructed, a mesh is
/// never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainMesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    colors: Vec<u32>,
    indices: Vec<u32>,
}

impl TerrainMesh {
    /// Assembles a mesh from its parallel arrays.
    ///
    /// The vertex arrays must have equal length and every index must be in
    /// range; violations are construction bugs, checked in debug builds.
    #[must_use]
    pub fn new(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        colors: Vec<u32>,
        indices: Vec<u32>,
    ) -> Self {
        debug_assert_eq!(positions.len(), normals.len());
        debug_assert_eq!(positions.len(), colors.len());
        debug_assert!(indices.iter().all(|&i| (i as usize) < positions.len()));

        Self {
            positions,
            normals,
            colors,
            indices,
        }
    }

    /// Vertex positions.
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Per-vertex normals.
    #[must_use]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Per-vertex packed RGBA colors (little-endian `0xAABBGGRR`).
    #[must_use]
    pub fn colors(&self) -> &[u32] {
        &self.colors
    }

    /// Triangle index list, three entries per triangle.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
