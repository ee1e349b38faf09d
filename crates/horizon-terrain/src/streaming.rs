//! Windowed chunk streaming cache.
//!
//! The streamer keeps three nested square windows centered on the
//! viewer's chunk, tested with Chebyshev distance:
//!
//! - **render window** (`d <= render_radius`): drawn every frame
//! - **generate window** (`d <= generate_radius`): kept generated ahead
//!   of the viewer
//! - **cache window** (`d <= cache_radius`): retained if already
//!   generated, for cheap reuse on re-approach
//!
//! Chunks beyond the cache window are evicted and their renderer
//! resources released. Everything happens synchronously inside
//! [`TerrainStreamer::update`] and [`TerrainStreamer::draw`]; there is no
//! background work.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use horizon_common::{ChunkCoord, LocationCode, TerrainError, TerrainResult};

use crate::chunk::TerrainChunk;
use crate::generator::MeshGenerator;
use crate::height::{HeightField, PerlinField};
use crate::renderer::Renderer;

/// Default retention window radius, in chunk indices.
pub const DEFAULT_CACHE_RADIUS: i32 = 4;

/// Default pre-generation window radius, in chunk indices.
pub const DEFAULT_GENERATE_RADIUS: i32 = 2;

/// Default draw window radius, in chunk indices.
pub const DEFAULT_RENDER_RADIUS: i32 = 1;

/// Streamer configuration, fixed at construction.
///
/// Unit convention: viewer positions and emitted vertices are in render
/// units; the height field is sampled in terrain units. One chunk edge is
/// `chunk_size` terrain units and `chunk_size * world_scale` render units
/// (the *stride* used to convert positions to chunk indices).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamerConfig {
    /// Chunk edge length in terrain units
    pub chunk_size: f32,
    /// Quads per chunk edge
    pub resolution: u32,
    /// Render units per terrain unit
    pub world_scale: f32,
    /// Retention window radius in chunk indices
    pub cache_radius: i32,
    /// Pre-generation window radius in chunk indices
    pub generate_radius: i32,
    /// Draw window radius in chunk indices
    pub render_radius: i32,
    /// Height field seed
    pub seed: u32,
}

impl Default for StreamerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 4.0,
            resolution: 20,
            world_scale: 8.0,
            cache_radius: DEFAULT_CACHE_RADIUS,
            generate_radius: DEFAULT_GENERATE_RADIUS,
            render_radius: DEFAULT_RENDER_RADIUS,
            seed: 12345,
        }
    }
}

impl StreamerConfig {
    /// Render units per chunk edge; the divisor for position-to-index
    /// conversion.
    #[must_use]
    pub fn chunk_stride(&self) -> f32 {
        self.chunk_size * self.world_scale
    }

    fn validate(&self) -> TerrainResult<()> {
        if self.render_radius > self.generate_radius {
            return Err(TerrainError::Config(format!(
                "render_radius ({}) exceeds generate_radius ({})",
                self.render_radius, self.generate_radius
            )));
        }
        if self.generate_radius > self.cache_radius {
            return Err(TerrainError::Config(format!(
                "generate_radius ({}) exceeds cache_radius ({})",
                self.generate_radius, self.cache_radius
            )));
        }
        if self.render_radius < 0 {
            return Err(TerrainError::Config(format!(
                "render_radius ({}) is negative",
                self.render_radius
            )));
        }
        if self.chunk_size <= 0.0 || !self.chunk_size.is_finite() {
            return Err(TerrainError::Config(format!(
                "chunk_size ({}) must be positive and finite",
                self.chunk_size
            )));
        }
        if self.world_scale <= 0.0 || !self.world_scale.is_finite() {
            return Err(TerrainError::Config(format!(
                "world_scale ({}) must be positive and finite",
                self.world_scale
            )));
        }
        if self.resolution == 0 {
            return Err(TerrainError::Config("resolution is zero".into()));
        }
        Ok(())
    }
}

/// Summary of one [`TerrainStreamer::update`] pass.
///
/// Per-chunk failures are collected here rather than aborting the pass;
/// each chunk succeeds or fails independently.
#[derive(Debug, Default)]
pub struct UpdatePass {
    /// Chunks generated and inserted this pass
    pub generated: usize,
    /// Chunks evicted this pass
    pub evicted: usize,
    /// Per-chunk failures (generation, resource release)
    pub failures: Vec<TerrainError>,
}

impl UpdatePass {
    /// True when the pass completed without per-chunk failures.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Streaming cache of terrain chunks around a moving viewer.
///
/// [`TerrainStreamer::update`] runs once per tick: it evicts chunks
/// outside the cache window and generates missing chunks inside the
/// generate window. [`TerrainStreamer::draw`] runs once per frame and
/// draws the render window, lazily uploading each chunk's mesh on its
/// first draw.
pub struct TerrainStreamer {
    config: StreamerConfig,
    generator: MeshGenerator,
    chunks: HashMap<LocationCode, TerrainChunk>,
    /// Center of the last completed update; updates at the same center
    /// are skipped entirely.
    last_center: Option<ChunkCoord>,
}

impl TerrainStreamer {
    /// Creates a streamer over a seeded Perlin height field.
    ///
    /// Fails fast with [`TerrainError::Config`] if the window radii are
    /// not ordered `render <= generate <= cache` or the sizes are
    /// degenerate.
    pub fn new(config: StreamerConfig) -> TerrainResult<Self> {
        let field = PerlinField::new(config.seed);
        Self::with_field(config, field)
    }

    /// Creates a streamer over a caller-supplied height field.
    ///
    /// Same validation as [`TerrainStreamer::new`]; the config's `seed`
    /// is ignored in favor of whatever the field samples.
    pub fn with_field(
        config: StreamerConfig,
        field: impl HeightField + 'static,
    ) -> TerrainResult<Self> {
        config.validate()?;

        info!(
            chunk_size = config.chunk_size,
            resolution = config.resolution,
            world_scale = config.world_scale,
            cache_radius = config.cache_radius,
            generate_radius = config.generate_radius,
            render_radius = config.render_radius,
            "creating terrain streamer"
        );

        let generator = MeshGenerator::new(
            field,
            config.chunk_size,
            config.resolution,
            config.world_scale,
        );

        Ok(Self {
            config,
            generator,
            chunks: HashMap::new(),
            last_center: None,
        })
    }

    /// The streamer configuration.
    #[must_use]
    pub fn config(&self) -> &StreamerConfig {
        &self.config
    }

    /// Number of chunks currently cached.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Whether a chunk is currently cached.
    #[must_use]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord.code())
    }

    /// A cached chunk, if present.
    #[must_use]
    pub fn get_chunk(&self, coord: ChunkCoord) -> Option<&TerrainChunk> {
        self.chunks.get(&coord.code())
    }

    /// Coordinates of all cached chunks, in no particular order.
    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.values().map(TerrainChunk::coord)
    }

    /// Chunk coordinate containing a viewer position.
    #[must_use]
    pub fn center_for(&self, position: (f32, f32)) -> ChunkCoord {
        ChunkCoord::from_world(position.0, position.1, self.config.chunk_stride())
    }

    /// Streams the cache toward a viewer position: evicts chunks outside
    /// the cache window, then generates missing chunks inside the
    /// generate window.
    ///
    /// Skipped entirely when the viewer has not crossed a chunk boundary
    /// since the previous update. Per-chunk failures are collected in the
    /// returned [`UpdatePass`]; the pass always runs to completion.
    pub fn update(&mut self, position: (f32, f32), renderer: &mut dyn Renderer) -> UpdatePass {
        let center = self.center_for(position);

        if self.last_center == Some(center) {
            return UpdatePass::default();
        }
        self.last_center = Some(center);

        let mut pass = UpdatePass::default();
        self.evict_irrelevant(center, renderer, &mut pass);
        self.generate_missing(center, &mut pass);

        debug!(
            %center,
            generated = pass.generated,
            evicted = pass.evicted,
            failures = pass.failures.len(),
            "update pass complete"
        );

        pass
    }

    /// Draws every chunk in the render window around a viewer position.
    ///
    /// Chunks upload their meshes lazily on first draw. A render-window
    /// coordinate with no cache entry means the caller skipped
    /// [`TerrainStreamer::update`] for the current position; all such
    /// coordinates are collected and reported as
    /// [`TerrainError::MissingChunks`], never silently skipped.
    pub fn draw(
        &mut self,
        position: (f32, f32),
        renderer: &mut dyn Renderer,
    ) -> TerrainResult<()> {
        let center = self.center_for(position);
        let radius = self.config.render_radius;

        let mut missing = Vec::new();

        for x in (center.x - radius)..=(center.x + radius) {
            for z in (center.z - radius)..=(center.z + radius) {
                let coord = ChunkCoord::new(x, z);
                match self.chunks.get_mut(&coord.code()) {
                    Some(chunk) => {
                        chunk
                            .draw(renderer)
                            .map_err(|e| TerrainError::Render {
                                coord,
                                reason: e.to_string(),
                            })?;
                    }
                    None => missing.push(coord),
                }
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(TerrainError::MissingChunks { center, missing })
        }
    }

    /// Evicts every cached chunk outside the cache window.
    fn evict_irrelevant(
        &mut self,
        center: ChunkCoord,
        renderer: &mut dyn Renderer,
        pass: &mut UpdatePass,
    ) {
        let cache_radius = self.config.cache_radius;

        let stale: Vec<LocationCode> = self
            .chunks
            .iter()
            .filter(|(_, chunk)| chunk.coord().chebyshev(center) > cache_radius)
            .map(|(code, _)| *code)
            .collect();

        for code in stale {
            // Remove the entry first so a disposed chunk is never
            // reachable through the map.
            if let Some(mut chunk) = self.chunks.remove(&code) {
                let coord = chunk.coord();
                debug!(%coord, "evicting chunk");

                if let Err(e) = chunk.dispose(renderer) {
                    warn!(%coord, error = %e, "resource release failed");
                    pass.failures.push(TerrainError::Release {
                        coord,
                        reason: e.to_string(),
                    });
                }
                pass.evicted += 1;
            }
        }
    }

    /// Generates every missing chunk inside the generate window.
    fn generate_missing(&mut self, center: ChunkCoord, pass: &mut UpdatePass) {
        let radius = self.config.generate_radius;
        let stride = self.config.chunk_stride();

        for x in (center.x - radius)..=(center.x + radius) {
            for z in (center.z - radius)..=(center.z + radius) {
                let coord = ChunkCoord::new(x, z);
                let code = coord.code();

                if self.chunks.contains_key(&code) {
                    continue;
                }

                match self.generator.generate(coord) {
                    Ok(mesh) => {
                        debug!(%coord, "generated chunk");
                        let offset = (coord.x as f32 * stride, coord.z as f32 * stride);
                        self.chunks.insert(code, TerrainChunk::new(coord, mesh, offset));
                        pass.generated += 1;
                    }
                    Err(e) => pass.failures.push(e),
                }
            }
        }
    }
}

impl std::fmt::Debug for TerrainStreamer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerrainStreamer")
            .field("cached_chunks", &self.chunks.len())
            .field("last_center", &self.last_center)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
