//! Height-field sampling.

use noise::{NoiseFn, Perlin};

/// A deterministic height function over the terrain plane.
///
/// Implementations must be pure: for a given field instance, the same
/// `(x, z)` always yields the same height. The mesh generator relies on
/// this to re-generate evicted chunks bit-for-bit.
pub trait HeightField {
    /// Samples the height at a terrain-unit coordinate.
    fn sample(&self, x: f32, z: f32) -> f32;
}

impl<F> HeightField for F
where
    F: Fn(f32, f32) -> f32,
{
    fn sample(&self, x: f32, z: f32) -> f32 {
        self(x, z)
    }
}

/// Perlin-noise-backed height field.
///
/// Two octaves: a base layer at `frequency` and a detail layer at four
/// times that, weighted at one tenth. Output is scaled by `amplitude`.
#[derive(Debug, Clone)]
pub struct PerlinField {
    /// Base terrain noise
    terrain_noise: Perlin,
    /// Higher-frequency detail noise
    detail_noise: Perlin,
    /// Base noise frequency in inverse terrain units
    frequency: f64,
    /// Output height scale
    amplitude: f32,
}

/// Default base frequency for [`PerlinField`].
pub const DEFAULT_FREQUENCY: f64 = 1.0;

/// Default amplitude for [`PerlinField`].
pub const DEFAULT_AMPLITUDE: f32 = 1.0;

impl PerlinField {
    /// Creates a field with the given seed and default parameters.
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self::with_params(seed, DEFAULT_FREQUENCY, DEFAULT_AMPLITUDE)
    }

    /// Creates a field with explicit frequency and amplitude.
    #[must_use]
    pub fn with_params(seed: u32, frequency: f64, amplitude: f32) -> Self {
        Self {
            terrain_noise: Perlin::new(seed),
            detail_noise: Perlin::new(seed.wrapping_add(1)),
            frequency,
            amplitude,
        }
    }
}

impl HeightField for PerlinField {
    fn sample(&self, x: f32, z: f32) -> f32 {
        let nx = f64::from(x) * self.frequency;
        let nz = f64::from(z) * self.frequency;

        let base = self.terrain_noise.get([nx, nz]);
        let detail = self.detail_noise.get([nx * 4.0, nz * 4.0]) * 0.1;

        (base + detail) as f32 * self.amplitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_samples() {
        let a = PerlinField::new(42);
        let b = PerlinField::new(42);

        for i in 0..32 {
            let x = i as f32 * 0.37;
            let z = i as f32 * -1.13;
            assert_eq!(a.sample(x, z), b.sample(x, z));
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = PerlinField::new(42);
        let b = PerlinField::new(999);

        let differing = (0..32)
            .filter(|i| {
                let x = *i as f32 * 0.37;
                a.sample(x, x) != b.sample(x, x)
            })
            .count();
        assert!(differing > 0);
    }

    #[test]
    fn test_amplitude_scales_output() {
        let unit = PerlinField::with_params(7, 1.0, 1.0);
        let tall = PerlinField::with_params(7, 1.0, 10.0);

        let h = unit.sample(3.2, -4.7);
        assert!((tall.sample(3.2, -4.7) - h * 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_closures_are_height_fields() {
        let flat = |_: f32, _: f32| 0.25;
        assert_eq!(flat.sample(100.0, -100.0), 0.25);
    }
}
