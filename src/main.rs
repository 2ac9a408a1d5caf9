// disable console on windows for release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use bevy::DefaultPlugins;
use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};
use sunset_terrain::{CONFIG_PATH, DemoConfig, LoadedConfig, SunsetTerrainPlugin};

fn main() -> AppExit {
    // `--write-config` dumps the defaults as a starting point and exits
    if std::env::args().any(|arg| arg == "--write-config") {
        return match DemoConfig::default().save_to_file(CONFIG_PATH) {
            Ok(()) => {
                println!("Wrote default configuration to {CONFIG_PATH}");
                AppExit::Success
            }
            Err(err) => {
                eprintln!("Could not write {CONFIG_PATH}: {err}");
                AppExit::error()
            }
        };
    }

    let loaded = LoadedConfig::from_path(CONFIG_PATH);
    let window = loaded.config.window.clone();

    App::new()
        .insert_resource(ClearColor(Color::linear_rgb(0.05, 0.05, 0.08)))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: window.title,
                resolution: WindowResolution::new(window.width, window.height),
                present_mode: PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(SunsetTerrainPlugin::new(loaded))
        .run()
}
