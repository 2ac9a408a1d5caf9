use crate::core::config::DemoConfig;
use crate::loading::TerrainTextures;
use crate::post::BRIGHT_PASS_LAYER;
use crate::sun::LightState;
use crate::sun::logic::SunSettings;
use crate::terrain::material::{TerrainMaterial, TerrainUniforms};
use crate::terrain::textures::{heightmap_image, normalmap_image};
use bevy::camera::visibility::RenderLayers;
use bevy::log::{info, warn};
use bevy::prelude::*;
use terragen::{Heightmap, HeightmapSettings, Normalmap, SimplexNoise};

/// GPU copies of the generated maps.
#[derive(Resource)]
pub struct TerrainMaps {
    pub height_map: Handle<Image>,
    pub normal_map: Handle<Image>,
}

#[derive(Component)]
pub struct Terrain;

/// Black stand-in for the terrain in the bright-pass view.
#[derive(Component)]
pub struct TerrainOccluder;

pub fn generate_terrain_maps(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    config: Res<DemoConfig>,
) {
    let mut settings = config.terrain.generation.clone();
    if let Err(err) = settings.validate() {
        warn!("Invalid terrain generation settings ({err}), using defaults");
        settings = HeightmapSettings::default();
    }

    let noise = SimplexNoise::new(settings.seed);
    let heightmap = match Heightmap::generate(&noise, &settings) {
        Ok(heightmap) => heightmap,
        Err(err) => {
            warn!("Heightmap generation failed ({err}), terrain disabled");
            return;
        }
    };
    let normals = Normalmap::generate(&heightmap, config.terrain.border_policy);
    info!(
        "Built {0}x{0} normal map ({1:?} borders)",
        normals.size(),
        config.terrain.border_policy
    );

    commands.insert_resource(TerrainMaps {
        height_map: images.add(heightmap_image(&heightmap)),
        normal_map: images.add(normalmap_image(&normals)),
    });
}

pub fn terrain_uniforms(config: &DemoConfig, sun: &SunSettings, light: &LightState) -> TerrainUniforms {
    let terrain = &config.terrain;
    let lighting = &config.lighting;
    TerrainUniforms {
        light_position: light.position.extend(1.0),
        light_ambient: Vec3::from_array(lighting.ambient).extend(1.0),
        light_diffuse: light.diffuse.extend(1.0),
        light_specular: (Vec3::from_array(lighting.specular) * sun.bloom_factor).extend(1.0),
        fog_color: Vec3::from_array(terrain.fog_color).extend(1.0),
        height_scale: terrain.height_scale,
        snow_threshold: terrain.snow_threshold,
        fog_density: terrain.fog_density,
    }
}

pub fn spawn_terrain(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut terrain_materials: ResMut<Assets<TerrainMaterial>>,
    mut standard_materials: ResMut<Assets<StandardMaterial>>,
    config: Res<DemoConfig>,
    sun: Res<SunSettings>,
    light: Res<LightState>,
    maps: Option<Res<TerrainMaps>>,
    textures: Option<Res<TerrainTextures>>,
) {
    let Some(maps) = maps else {
        warn!("No terrain maps, skipping terrain");
        return;
    };
    if textures.is_none() {
        warn!("Terrain textures unavailable, rendering untextured terrain");
    }

    let material = terrain_materials.add(TerrainMaterial {
        uniforms: terrain_uniforms(&config, &sun, &light),
        rock_texture: textures.as_ref().map(|t| t.rock.clone()),
        snow_texture: textures.as_ref().map(|t| t.snow.clone()),
        normal_map: maps.normal_map.clone(),
        height_map: maps.height_map.clone(),
    });

    let mesh = meshes.add(Plane3d::new(Vec3::Y, Vec2::ONE).mesh());
    let transform = Transform::from_scale(Vec3::splat(config.terrain.extent));

    commands.spawn((
        Mesh3d(mesh.clone()),
        MeshMaterial3d(material),
        transform,
        Terrain,
    ));

    let occluder = standard_materials.add(StandardMaterial {
        base_color: Color::BLACK,
        unlit: true,
        ..default()
    });
    commands.spawn((
        Mesh3d(mesh),
        MeshMaterial3d(occluder),
        transform,
        RenderLayers::layer(BRIGHT_PASS_LAYER),
        TerrainOccluder,
    ));

    info!("Terrain spawned with extent {}", config.terrain.extent * 2.0);
}

pub fn update_terrain_lighting(
    light: Res<LightState>,
    sun: Res<SunSettings>,
    config: Res<DemoConfig>,
    terrain_q: Query<&MeshMaterial3d<TerrainMaterial>, With<Terrain>>,
    mut materials: ResMut<Assets<TerrainMaterial>>,
) {
    if !light.is_changed() && !sun.is_changed() {
        return;
    }
    for handle in &terrain_q {
        if let Some(material) = materials.get_mut(&handle.0) {
            material.uniforms = terrain_uniforms(&config, &sun, &light);
        }
    }
}
