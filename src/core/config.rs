use crate::post::settings::StarburstDrift;
use crate::sun::logic::SunSettings;
use bevy::log::{info, warn};
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use terragen::{BorderPolicy, HeightmapSettings};
use thiserror::Error;

pub const CONFIG_PATH: &str = "sunset_config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialise config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Every tunable of the demo. Missing tables and keys fall back to defaults.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub terrain: TerrainConfig,
    pub lighting: LightingConfig,
    pub sun: SunSettings,
    pub post: PostConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Sunset Terrain".into(),
            width: 1920,
            height: 1080,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    /// Degrees around +Y, measured from +X.
    pub yaw: f32,
    /// Degrees above the horizon.
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub speed: f32,
    pub sprint_speed: f32,
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [-3.08, 3.07, 3.26],
            yaw: -45.0,
            pitch: -45.0,
            fov: 50.0,
            near: 0.1,
            far: 100.0,
            speed: 2.5,
            sprint_speed: 10.0,
            sensitivity: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub generation: HeightmapSettings,
    pub border_policy: BorderPolicy,
    /// Uniform scale applied to the 2x2 terrain quad.
    pub extent: f32,
    pub height_scale: f32,
    pub snow_threshold: f32,
    pub fog_density: f32,
    pub fog_color: [f32; 3],
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            generation: HeightmapSettings::default(),
            border_policy: BorderPolicy::default(),
            extent: 2.0,
            height_scale: 0.15,
            snow_threshold: 0.69,
            fog_density: 0.1,
            fog_color: [0.8, 0.8, 0.8],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub ambient: [f32; 3],
    /// Multiplied by the sun's bloom factor before use.
    pub specular: [f32; 3],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient: [0.1, 0.05, 0.35],
            specular: [0.9, 0.7, 0.4],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostConfig {
    /// Divisor applied to the window size for the bloom source target.
    pub down_sample_factor: u32,
    /// Number of separable blur passes per frame.
    pub blur_amount: u32,
    pub starburst_drift: StarburstDrift,
    /// Radians per second for [`StarburstDrift::Accumulated`].
    pub starburst_rate: f32,
    pub skybox_brightness: f32,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            down_sample_factor: 4,
            blur_amount: 100,
            starburst_drift: StarburstDrift::default(),
            starburst_rate: 0.02,
            skybox_brightness: 1000.0,
        }
    }
}

impl DemoConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

/// Where the active [`DemoConfig`] came from.
#[derive(Resource, Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
    Fallback { path: PathBuf, reason: String },
}

/// Configuration resolved before the app starts.
///
/// Logging is not up yet at that point, so the outcome is kept and reported
/// from a startup system.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: DemoConfig,
    pub source: ConfigSource,
}

impl LoadedConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self {
                config: DemoConfig::default(),
                source: ConfigSource::Defaults,
            };
        }

        match DemoConfig::load_from_file(path) {
            Ok(config) => Self {
                config,
                source: ConfigSource::File(path.to_path_buf()),
            },
            Err(err) => Self {
                config: DemoConfig::default(),
                source: ConfigSource::Fallback {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                },
            },
        }
    }
}

pub(crate) fn report_config_source(source: bevy::prelude::Res<ConfigSource>) {
    match source.as_ref() {
        ConfigSource::File(path) => info!("Loaded configuration from {}", path.display()),
        ConfigSource::Defaults => info!("No {CONFIG_PATH} found, using built-in defaults"),
        ConfigSource::Fallback { path, reason } => {
            warn!("Ignoring {}: {reason}. Using built-in defaults", path.display())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = DemoConfig::from_toml_str("").unwrap();
        assert_eq!(config, DemoConfig::default());
    }

    #[test]
    fn test_partial_tables_keep_other_defaults() {
        let config = DemoConfig::from_toml_str(
            r#"
            [post]
            blur_amount = 10

            [terrain.generation]
            seed = 99
            "#,
        )
        .unwrap();

        assert_eq!(config.post.blur_amount, 10);
        assert_eq!(config.post.down_sample_factor, 4);
        assert_eq!(config.terrain.generation.seed, 99);
        assert_eq!(config.terrain.generation.size, 512);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_enum_values_parse() {
        let config = DemoConfig::from_toml_str(
            r#"
            [terrain]
            border_policy = "flat"

            [post]
            starburst_drift = "frame_scaled"
            "#,
        )
        .unwrap();

        assert_eq!(config.terrain.border_policy, BorderPolicy::Flat);
        assert_eq!(config.post.starburst_drift, StarburstDrift::FrameScaled);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        assert!(matches!(
            DemoConfig::from_toml_str("[post\nblur_amount = "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_save_then_load_from_disk() {
        let path = std::env::temp_dir().join(format!("sunset_config_{}.toml", std::process::id()));
        let mut config = DemoConfig::default();
        config.sun.stationary = true;
        config.window.title = "Dusk".into();

        config.save_to_file(&path).unwrap();
        let loaded = LoadedConfig::from_path(&path);
        fs::remove_file(&path).unwrap();

        assert_eq!(loaded.config, config);
        assert_eq!(loaded.source, ConfigSource::File(path));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let loaded = LoadedConfig::from_path("definitely/not/here.toml");
        assert_eq!(loaded.source, ConfigSource::Defaults);
        assert_eq!(loaded.config, DemoConfig::default());
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let path = std::env::temp_dir().join(format!("sunset_bad_{}.toml", std::process::id()));
        fs::write(&path, "window = 3").unwrap();
        let loaded = LoadedConfig::from_path(&path);
        fs::remove_file(&path).unwrap();

        assert_eq!(loaded.config, DemoConfig::default());
        assert!(matches!(loaded.source, ConfigSource::Fallback { .. }));
    }
}
