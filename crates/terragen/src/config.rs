use crate::error::TerrainError;
use crate::fractal::FractalParams;
use serde::{Deserialize, Serialize};

/// Parameters for synthesising a square heightmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightmapSettings {
    /// Width and height in samples.
    pub size: usize,
    /// Maps a sample index to noise space.
    pub scale: f32,
    pub octaves: u32,
    pub persistence: f32,
    pub lacunarity: f32,
    pub seed: u32,
}

impl Default for HeightmapSettings {
    fn default() -> Self {
        Self {
            size: 512,
            scale: 0.005,
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.0,
            seed: 0,
        }
    }
}

impl HeightmapSettings {
    pub fn fractal(&self) -> FractalParams {
        FractalParams {
            octaves: self.octaves,
            lacunarity: self.lacunarity,
            persistence: self.persistence,
        }
    }

    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.size == 0 {
            return Err(TerrainError::InvalidSize(self.size));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(TerrainError::InvalidScale(self.scale));
        }
        self.fractal().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_demo_terrain() {
        let settings = HeightmapSettings::default();
        assert_eq!(settings.size, 512);
        assert_eq!(settings.scale, 0.005);
        assert_eq!(settings.fractal(), FractalParams::default());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let settings = HeightmapSettings {
            size: 0,
            ..Default::default()
        };
        assert_eq!(settings.validate(), Err(TerrainError::InvalidSize(0)));
    }

    #[test]
    fn test_non_finite_scale_is_rejected() {
        let settings = HeightmapSettings {
            scale: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(TerrainError::InvalidScale(_))));
    }
}
