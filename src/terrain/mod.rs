mod material;
mod systems;
pub(crate) mod textures;

use crate::core::state::AppState;
use crate::sun::SunSystems;
use crate::terrain::material::TerrainMaterial;
use crate::terrain::systems::*;
use bevy::prelude::*;

pub(crate) struct TerrainPlugin;

impl Plugin for TerrainPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<TerrainMaterial>::default())
            .add_systems(Startup, generate_terrain_maps)
            .add_systems(OnEnter(AppState::Running), spawn_terrain)
            .add_systems(
                Update,
                update_terrain_lighting
                    .after(SunSystems)
                    .run_if(in_state(AppState::Running)),
            );
    }
}
