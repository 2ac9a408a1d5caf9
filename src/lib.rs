mod core;
mod loading;
mod post;
mod sky;
mod sun;
mod terrain;
mod ui;

pub use crate::core::config::{CONFIG_PATH, ConfigError, ConfigSource, DemoConfig, LoadedConfig};

use crate::core::camera::CameraPlugin;
use crate::core::config::report_config_source;
use crate::core::state::AppState;
use crate::loading::LoadingPlugin;
use crate::post::PostProcessPlugin;
use crate::sky::SkyPlugin;
use crate::sun::SunPlugin;
use crate::terrain::TerrainPlugin;
use crate::ui::TuningPanelPlugin;
use bevy::app::App;
#[cfg(debug_assertions)]
use bevy::diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin};
use bevy::prelude::*;

pub struct SunsetTerrainPlugin {
    config: LoadedConfig,
}

impl SunsetTerrainPlugin {
    pub fn new(config: LoadedConfig) -> Self {
        Self { config }
    }
}

impl Plugin for SunsetTerrainPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.config.clone())
            .insert_resource(self.config.source.clone())
            .init_state::<AppState>()
            .add_plugins((
                CameraPlugin,
                LoadingPlugin,
                SunPlugin,
                TerrainPlugin,
                SkyPlugin,
                PostProcessPlugin,
                TuningPanelPlugin,
            ))
            .add_systems(Startup, report_config_source);

        #[cfg(debug_assertions)]
        {
            app.add_plugins((
                FrameTimeDiagnosticsPlugin::default(),
                LogDiagnosticsPlugin::default(),
            ));
        }
    }
}
