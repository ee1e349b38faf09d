//! # Horizon Terrain
//!
//! Streaming procedural terrain around a moving viewer.
//!
//! This crate handles:
//! - Height-field sampling (seam plus a noise-backed implementation)
//! - Chunk mesh generation from the height field
//! - Lazy renderer resource lifecycle per chunk
//! - The windowed streaming cache (cache/generate/render tiers)
//!
//! The renderer itself is a collaborator behind the [`renderer::Renderer`]
//! trait; this crate never talks to a GPU.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod chunk;
pub mod generator;
pub mod height;
pub mod mesh;
pub mod renderer;
pub mod streaming;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::chunk::*;
    pub use crate::generator::*;
    pub use crate::height::*;
    pub use crate::mesh::*;
    pub use crate::renderer::*;
    pub use crate::streaming::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_common::ChunkCoord;

    // The reference scenario: 4-unit chunks at 8x world scale, 20 quads
    // per edge, windows 4/2/1.
    fn reference_config() -> StreamerConfig {
        StreamerConfig {
            chunk_size: 4.0,
            resolution: 20,
            world_scale: 8.0,
            cache_radius: 4,
            generate_radius: 2,
            render_radius: 1,
            seed: 10,
        }
    }

    #[test]
    fn test_reference_scenario() {
        let mut streamer = TerrainStreamer::new(reference_config()).expect("valid config");
        let mut renderer = RecordingRenderer::new();

        // The viewer starts at the world origin, which maps to chunk
        // (1, 1) through the zero-to-one index remap.
        let pass = streamer.update((0.0, 0.0), &mut renderer);
        assert!(pass.is_clean());
        assert_eq!(streamer.chunk_count(), 25);
        for x in -1..=3 {
            for z in -1..=3 {
                assert!(streamer.contains(ChunkCoord::new(x, z)));
            }
        }

        streamer.draw((0.0, 0.0), &mut renderer).expect("draw");
        assert_eq!(renderer.draws().len(), 9);

        // Each drawn chunk carries a full 20x20-quad mesh.
        let chunk = streamer.get_chunk(ChunkCoord::new(1, 1)).expect("cached");
        assert_eq!(chunk.mesh().vertex_count(), 20 * 20 * 4);
        assert_eq!(chunk.mesh().triangle_count(), 20 * 20 * 2);
    }

    #[test]
    fn test_update_before_draw_protocol_never_misses() {
        let mut streamer = TerrainStreamer::new(reference_config()).expect("valid config");
        let mut renderer = RecordingRenderer::new();

        // Wander across several chunk boundaries; an update before every
        // draw keeps the render window complete.
        let path = [
            (0.0, 0.0),
            (33.0, 0.0),
            (70.0, -20.0),
            (130.0, -130.0),
            (-200.0, 300.0),
        ];

        for position in path {
            streamer.update(position, &mut renderer);
            streamer.draw(position, &mut renderer).expect("draw");
        }
    }
}
