use crate::core::state::AppState;
use crate::terrain::textures::{TextureWrap, sampler};
use bevy::log::{info, warn};
use bevy::prelude::*;
use bevy_asset_loader::prelude::*;

/// A failed load still enters [`AppState::Running`]; consumers treat missing
/// collections as optional.
pub struct LoadingPlugin;

impl Plugin for LoadingPlugin {
    fn build(&self, app: &mut App) {
        app.add_loading_state(
            LoadingState::new(AppState::Loading)
                .continue_to_state(AppState::Running)
                .on_failure_continue_to_state(AppState::Running)
                .load_collection::<TerrainTextures>()
                .load_collection::<SkyboxTextures>()
                .load_collection::<LensFlareTextures>(),
        )
        .add_systems(OnEnter(AppState::Running), configure_samplers);
    }
}

#[derive(AssetCollection, Resource)]
pub struct TerrainTextures {
    #[asset(path = "textures/aerial_rocks/aerial_rocks_04_diff_8k.jpg")]
    pub rock: Handle<Image>,
    #[asset(path = "textures/snow/snow_field_aerial_diff_8k.jpg")]
    pub snow: Handle<Image>,
}

/// Cube-map faces, in +X, -X, +Y, -Y, +Z, -Z order.
#[derive(AssetCollection, Resource)]
pub struct SkyboxTextures {
    #[asset(
        paths(
            "textures/skybox/right.png",
            "textures/skybox/left.png",
            "textures/skybox/up.png",
            "textures/skybox/down.png",
            "textures/skybox/front.png",
            "textures/skybox/back.png"
        ),
        collection(typed)
    )]
    pub faces: Vec<Handle<Image>>,
}

#[derive(AssetCollection, Resource)]
pub struct LensFlareTextures {
    #[asset(path = "textures/lens_flare/colorGradient.png")]
    pub color_gradient: Handle<Image>,
    #[asset(path = "textures/lens_flare/lensDirt.png")]
    pub lens_dirt: Handle<Image>,
    #[asset(path = "textures/lens_flare/starBurst.png")]
    pub star_burst: Handle<Image>,
}

fn configure_samplers(
    mut images: ResMut<Assets<Image>>,
    terrain: Option<Res<TerrainTextures>>,
    flare: Option<Res<LensFlareTextures>>,
) {
    let mut wraps: Vec<(&Handle<Image>, TextureWrap)> = Vec::new();
    match &terrain {
        Some(terrain) => {
            wraps.push((&terrain.rock, TextureWrap::Repeat));
            wraps.push((&terrain.snow, TextureWrap::Repeat));
        }
        None => warn!("Terrain textures failed to load"),
    }
    match &flare {
        Some(flare) => {
            wraps.push((&flare.color_gradient, TextureWrap::ClampToEdge));
            wraps.push((&flare.lens_dirt, TextureWrap::ClampToEdge));
            wraps.push((&flare.star_burst, TextureWrap::Repeat));
        }
        None => warn!("Lens flare textures failed to load"),
    }

    for (handle, wrap) in wraps {
        if let Some(image) = images.get_mut(handle) {
            image.sampler = sampler(wrap);
        }
    }
    info!("Assets ready");
}
