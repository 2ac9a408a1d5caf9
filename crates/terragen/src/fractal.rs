use crate::error::TerrainError;
use crate::noise::NoiseSource;
use serde::{Deserialize, Serialize};

/// Octave layering parameters for fractal Brownian motion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractalParams {
    pub octaves: u32,
    /// Frequency multiplier applied per octave.
    pub lacunarity: f32,
    /// Amplitude multiplier applied per octave.
    pub persistence: f32,
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            octaves: 6,
            lacunarity: 2.0,
            persistence: 0.5,
        }
    }
}

impl FractalParams {
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.octaves == 0 {
            return Err(TerrainError::InvalidOctaves(self.octaves));
        }
        if !(self.persistence.is_finite() && self.persistence > 0.0) {
            return Err(TerrainError::InvalidPersistence(self.persistence));
        }
        if !(self.lacunarity.is_finite() && self.lacunarity > 0.0) {
            return Err(TerrainError::InvalidLacunarity(self.lacunarity));
        }
        Ok(())
    }
}

/// Sum `octaves` layers of noise and remap the normalised total to `[0, 1]`.
///
/// Octave `i` samples at frequency `lacunarity^i` with weight `persistence^i`.
/// The weighted sum is divided by the sum of weights, so the result never
/// leaves `[0, 1]` for a well-behaved [`NoiseSource`].
pub fn fbm<N: NoiseSource + ?Sized>(noise: &N, x: f32, y: f32, params: &FractalParams) -> f32 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..params.octaves {
        total += noise.noise(x * frequency, y * frequency) * amplitude;
        max_value += amplitude;
        amplitude *= params.persistence;
        frequency *= params.lacunarity;
    }

    // Zero octaves contribute nothing, which maps to the midpoint
    if max_value <= 0.0 {
        return 0.5;
    }

    ((total / max_value + 1.0) * 0.5).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::SimplexNoise;
    use rstest::rstest;

    /// Noise that always returns the same value.
    struct Constant(f32);

    impl NoiseSource for Constant {
        fn noise(&self, _x: f32, _y: f32) -> f32 {
            self.0
        }
    }

    #[rstest]
    #[case(1, 2.0, 0.5)]
    #[case(6, 2.0, 0.5)]
    #[case(8, 3.0, 0.9)]
    #[case(4, 1.5, 1.0)]
    #[case(12, 2.2, 0.3)]
    fn test_fbm_stays_in_unit_range(
        #[case] octaves: u32,
        #[case] lacunarity: f32,
        #[case] persistence: f32,
    ) {
        let noise = SimplexNoise::new(3);
        let params = FractalParams {
            octaves,
            lacunarity,
            persistence,
        };
        for i in 0..64 {
            for j in 0..64 {
                let x = i as f32 * 0.71 - 20.0;
                let y = j as f32 * 0.29 + 90.0;
                let value = fbm(&noise, x, y, &params);
                assert!((0.0..=1.0).contains(&value), "fbm({x}, {y}) = {value}");
            }
        }
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(12.5, -3.25)]
    #[case(-0.4, 7.9)]
    fn test_single_octave_is_remapped_noise(#[case] x: f32, #[case] y: f32) {
        let noise = SimplexNoise::new(11);
        let params = FractalParams {
            octaves: 1,
            ..Default::default()
        };
        let expected = (noise.noise(x, y) + 1.0) / 2.0;
        assert_eq!(fbm(&noise, x, y, &params), expected);
    }

    #[rstest]
    #[case(-1.0, 0.0)]
    #[case(1.0, 1.0)]
    #[case(0.0, 0.5)]
    fn test_constant_noise_maps_to_expected_value(#[case] value: f32, #[case] expected: f32) {
        let params = FractalParams::default();
        let result = fbm(&Constant(value), 1.0, 2.0, &params);
        assert!((result - expected).abs() < 1e-6, "got {result}");
    }

    #[test]
    fn test_fbm_is_deterministic() {
        let noise = SimplexNoise::new(5);
        let params = FractalParams::default();
        for i in 0..32 {
            let p = i as f32 * 0.13;
            assert_eq!(fbm(&noise, p, -p, &params), fbm(&noise, p, -p, &params));
        }
    }

    #[rstest]
    #[case(FractalParams { octaves: 0, ..Default::default() }, TerrainError::InvalidOctaves(0))]
    #[case(FractalParams { persistence: 0.0, ..Default::default() }, TerrainError::InvalidPersistence(0.0))]
    #[case(FractalParams { lacunarity: -2.0, ..Default::default() }, TerrainError::InvalidLacunarity(-2.0))]
    fn test_validate_rejects_bad_params(#[case] params: FractalParams, #[case] expected: TerrainError) {
        assert_eq!(params.validate(), Err(expected));
    }

    #[test]
    fn test_default_params_are_valid() {
        assert!(FractalParams::default().validate().is_ok());
    }
}
