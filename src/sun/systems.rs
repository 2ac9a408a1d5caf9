use crate::core::config::DemoConfig;
use crate::post::BRIGHT_PASS_LAYER;
use crate::sun::logic::{LightState, SunSettings, SunTransition};
use crate::sun::material::SunMaterial;
use bevy::camera::visibility::RenderLayers;
use bevy::log::{debug, info};
use bevy::prelude::*;

#[derive(Component)]
pub struct Sun;

const SUN_SIZE: f32 = 0.1;

pub fn init_light_state(mut commands: Commands, config: Res<DemoConfig>) {
    let settings = config.sun.clone();
    commands.insert_resource(LightState::new(&settings));
    commands.insert_resource(settings);
}

pub fn spawn_sun(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<SunMaterial>>,
    config: Res<DemoConfig>,
    light: Res<LightState>,
) {
    let material = materials.add(SunMaterial::new(
        light.diffuse,
        Vec3::from_array(config.terrain.fog_color),
        config.terrain.fog_density,
    ));

    // Drawn by both the main view and the bright-pass view
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(1.0).mesh().uv(32, 18))),
        MeshMaterial3d(material),
        Transform::from_translation(light.position).with_scale(Vec3::splat(SUN_SIZE)),
        RenderLayers::from_layers(&[0, BRIGHT_PASS_LAYER]),
        Sun,
    ));

    info!("Sun spawned at {}", light.position);
}

pub fn tick_sun(time: Res<Time>, settings: Res<SunSettings>, mut light: ResMut<LightState>) {
    match light.tick(&settings, time.delta_secs()) {
        Some(SunTransition::StartedWaiting { resume }) => {
            debug!("Sun below horizon, resuming {resume:?} after {}s", settings.idle_time)
        }
        Some(SunTransition::ResumedMoving(direction)) => debug!("Sun moving {direction:?}"),
        None => {}
    }
}

pub fn sync_sun(
    light: Res<LightState>,
    mut sun_q: Query<(&mut Transform, &MeshMaterial3d<SunMaterial>), With<Sun>>,
    mut materials: ResMut<Assets<SunMaterial>>,
) {
    if !light.is_changed() {
        return;
    }
    for (mut transform, material) in &mut sun_q {
        transform.translation = light.position;
        if let Some(material) = materials.get_mut(&material.0) {
            material.set_glow(light.diffuse);
        }
    }
}
