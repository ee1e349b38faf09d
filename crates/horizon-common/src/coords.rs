//! Coordinate types for chunk indices and packed location codes.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Chunk coordinate (identifies one chunk in the terrain grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct ChunkCoord {
    /// X index in chunk grid space
    pub x: i32,
    /// Z index in chunk grid space
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Converts a single world-space axis value to a chunk index.
    ///
    /// `stride` is the chunk edge length in the same units as `value`
    /// (render units). Rounding is half-away-from-zero. A rounded index of
    /// exactly 0 is remapped to 1: chunk index 0 is never addressable and
    /// the grid is asymmetric around the origin.
    #[must_use]
    pub fn axis_index(value: f32, stride: f32) -> i32 {
        let index = (value / stride).round() as i32;

        if index == 0 {
            return 1;
        }

        index
    }

    /// Returns the chunk coordinate containing the given viewer position.
    ///
    /// Both axes use [`ChunkCoord::axis_index`] with the same `stride`.
    #[must_use]
    pub fn from_world(x: f32, z: f32, stride: f32) -> Self {
        Self {
            x: Self::axis_index(x, stride),
            z: Self::axis_index(z, stride),
        }
    }

    /// Packs this coordinate into its location code.
    #[must_use]
    pub const fn code(self) -> LocationCode {
        LocationCode(((self.x as u32 as u64) << 32) | (self.z as u32 as u64))
    }

    /// Chebyshev (L-infinity) distance to another chunk coordinate.
    ///
    /// All streaming windows are squares under this metric.
    #[must_use]
    pub fn chebyshev(self, other: Self) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chunk({}, {})", self.x, self.z)
    }
}

/// Packed form of a [`ChunkCoord`]: high 32 bits hold `x`, low 32 bits
/// hold `z`. Used as the streaming cache's lookup key.
///
/// The packing is injective over all representable coordinates, so two
/// distinct chunk coordinates never share a code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Pod, Zeroable,
)]
#[repr(transparent)]
pub struct LocationCode(u64);

impl LocationCode {
    /// Unpacks the code back into a chunk coordinate.
    ///
    /// Production code only ever packs; decoding exists for diagnostics
    /// and tests.
    #[must_use]
    pub const fn decode(self) -> ChunkCoord {
        ChunkCoord {
            x: (self.0 >> 32) as u32 as i32,
            z: self.0 as u32 as i32,
        }
    }

    /// Returns the raw packed value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for LocationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
