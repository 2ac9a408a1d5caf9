pub(crate) mod logic;
mod material;
mod systems;

use crate::core::state::AppState;
use crate::sun::material::SunMaterial;
use crate::sun::systems::*;
use bevy::prelude::*;

pub(crate) use crate::sun::logic::LightState;

pub(crate) struct SunPlugin;

impl Plugin for SunPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<SunMaterial>::default())
            .add_systems(Startup, (init_light_state, spawn_sun).chain())
            .add_systems(
                Update,
                (tick_sun.run_if(in_state(AppState::Running)), sync_sun)
                    .chain()
                    .in_set(SunSystems),
            );
    }
}

/// Light animation; consumers of [`LightState`] run after it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct SunSystems;
