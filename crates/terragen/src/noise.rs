use ::noise::{NoiseFn, Simplex};

/// Deterministic, continuous 2D noise field with output in `[-1, 1]`.
pub trait NoiseSource {
    fn noise(&self, x: f32, y: f32) -> f32;
}

impl<N: NoiseSource + ?Sized> NoiseSource for &N {
    fn noise(&self, x: f32, y: f32) -> f32 {
        (**self).noise(x, y)
    }
}

/// Seeded 2D simplex gradient noise.
#[derive(Debug, Clone)]
pub struct SimplexNoise {
    simplex: Simplex,
    seed: u32,
}

impl SimplexNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            simplex: Simplex::new(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Default for SimplexNoise {
    fn default() -> Self {
        Self::new(0)
    }
}

impl NoiseSource for SimplexNoise {
    fn noise(&self, x: f32, y: f32) -> f32 {
        // The underlying field can overshoot its nominal range by a hair
        let value = self.simplex.get([x as f64, y as f64]) as f32;
        value.clamp(-1.0, 1.0)
    }
}
