pub(crate) mod cubemap;

use crate::core::camera::components::MainCamera;
use crate::core::config::DemoConfig;
use crate::core::state::AppState;
use crate::loading::SkyboxTextures;
use crate::sky::cubemap::stack_cube_faces;
use bevy::core_pipeline::Skybox;
use bevy::log::{info, warn};
use bevy::prelude::*;

pub(crate) struct SkyPlugin;

impl Plugin for SkyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Running), attach_skybox);
    }
}

fn attach_skybox(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    config: Res<DemoConfig>,
    faces: Option<Res<SkyboxTextures>>,
    camera_q: Query<Entity, With<MainCamera>>,
) {
    let Some(faces) = faces else {
        warn!("Skybox faces unavailable, rendering without a sky");
        return;
    };
    let Ok(camera) = camera_q.single() else {
        return;
    };

    let loaded: Option<Vec<&Image>> = faces.faces.iter().map(|handle| images.get(handle)).collect();
    let Some(loaded) = loaded else {
        warn!("Skybox faces not loaded, rendering without a sky");
        return;
    };

    let cube = match stack_cube_faces(&loaded) {
        Ok(cube) => cube,
        Err(err) => {
            warn!("Could not build skybox: {err}");
            return;
        }
    };

    let image = images.add(cube);
    commands.entity(camera).insert(Skybox {
        image,
        brightness: config.post.skybox_brightness,
        ..default()
    });
    info!("Skybox attached");
}
