//! Error types for Horizon terrain streaming.

use thiserror::Error;

use crate::coords::ChunkCoord;

/// Top-level error type for terrain streaming operations.
#[derive(Debug, Error)]
pub enum TerrainError {
    /// Invalid streamer configuration, rejected at construction
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Draw requested chunks that are not in the cache
    #[error("missing chunks in render window around {center}: {missing:?}")]
    MissingChunks {
        /// Chunk coordinate of the viewer at draw time
        center: ChunkCoord,
        /// Render-window coordinates with no cache entry
        missing: Vec<ChunkCoord>,
    },

    /// Mesh generation failed for one chunk
    #[error("generation failed for {coord}: {reason}")]
    Generation {
        /// Chunk that failed to generate
        coord: ChunkCoord,
        /// What went wrong
        reason: String,
    },

    /// Renderer failed to release resources for an evicted chunk
    #[error("resource release failed for {coord}: {reason}")]
    Release {
        /// Chunk whose resources could not be released
        coord: ChunkCoord,
        /// Renderer-reported reason
        reason: String,
    },

    /// Renderer failed to load or draw a chunk's mesh
    #[error("render failed for {coord}: {reason}")]
    Render {
        /// Chunk that could not be drawn
        coord: ChunkCoord,
        /// Renderer-reported reason
        reason: String,
    },
}

/// Result type alias for terrain operations.
pub type TerrainResult<T> = Result<T, TerrainError>;
