pub(crate) mod components;
pub(crate) mod logic;
pub(crate) mod systems;

use crate::core::camera::components::*;
use crate::core::camera::systems::*;
use crate::core::state::AppState;
use bevy::prelude::*;

pub(crate) struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<MainCamera>()
            .register_type::<FlyCamera>()
            .add_systems(Startup, (spawn_camera, capture_cursor))
            .add_systems(Update, exit_on_escape)
            .add_systems(
                Update,
                camera_control
                    .in_set(CameraSystems)
                    .run_if(in_state(AppState::Running)),
            );
    }
}

/// Camera input handling; systems reading the camera pose run after it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CameraSystems;
