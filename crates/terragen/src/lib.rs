pub mod config;
pub mod error;
pub mod fractal;
pub mod heightmap;
pub mod noise;
pub mod normal_map;

pub use crate::config::HeightmapSettings;
pub use crate::error::TerrainError;
pub use crate::fractal::{FractalParams, fbm};
pub use crate::heightmap::Heightmap;
pub use crate::noise::{NoiseSource, SimplexNoise};
pub use crate::normal_map::{BorderPolicy, Normalmap};
