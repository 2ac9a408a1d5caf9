use crate::core::camera::components::MainCamera;
use crate::core::config::DemoConfig;
use crate::loading::LensFlareTextures;
use crate::post::BRIGHT_PASS_LAYER;
use crate::post::settings::{
    PostProcessConfig, PostProcessImages, PostProcessSettings, StarburstClock, aspect_ratio,
    sun_alignment,
};
use crate::sun::LightState;
use bevy::asset::RenderAssetUsages;
use bevy::camera::visibility::RenderLayers;
use bevy::camera::{ClearColorConfig, RenderTarget};
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::log::{info, warn};
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat, TextureUsages};
use bevy::render::view::Hdr;
use bevy::window::PrimaryWindow;

/// Renders the sun and black terrain silhouettes into the bright-pass image.
#[derive(Component)]
pub struct BrightPassCamera;

pub fn init_post_process_config(
    mut commands: Commands,
    config: Res<DemoConfig>,
    window_q: Query<&Window, With<PrimaryWindow>>,
) {
    let full_size = window_q
        .single()
        .map(|window| window.physical_size())
        .unwrap_or(UVec2::new(config.window.width, config.window.height));

    commands.insert_resource(PostProcessConfig {
        blur_amount: config.post.blur_amount,
        down_sample_factor: config.post.down_sample_factor,
        full_size,
    });
    commands.init_resource::<StarburstClock>();
}

/// Offscreen HDR image the bright-pass camera renders into.
pub fn bright_pass_image(size: UVec2) -> Image {
    let mut image = Image::new_fill(
        Extent3d {
            width: size.x.max(1),
            height: size.y.max(1),
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[0; 8],
        TextureFormat::Rgba16Float,
        RenderAssetUsages::RENDER_WORLD,
    );
    image.texture_descriptor.usage = TextureUsages::TEXTURE_BINDING
        | TextureUsages::COPY_DST
        | TextureUsages::RENDER_ATTACHMENT;
    image
}

pub fn spawn_bright_pass_view(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    config: Res<PostProcessConfig>,
    camera_q: Query<(Entity, &Projection), Added<MainCamera>>,
) {
    for (camera, projection) in &camera_q {
        let target = images.add(bright_pass_image(config.full_size));

        commands.entity(camera).insert(PostProcessSettings::default());
        // Child with an identity transform, so it always shares the main pose
        commands.entity(camera).with_child((
            Camera3d::default(),
            Camera {
                order: -1,
                target: RenderTarget::Image(target.clone().into()),
                clear_color: ClearColorConfig::Custom(Color::BLACK),
                ..default()
            },
            Hdr,
            Tonemapping::None,
            projection.clone(),
            Transform::IDENTITY,
            RenderLayers::layer(BRIGHT_PASS_LAYER),
            BrightPassCamera,
        ));

        commands.insert_resource(PostProcessImages {
            bright_pass: target,
            color_gradient: None,
            lens_dirt: None,
            star_burst: None,
        });
        info!("Bright-pass view attached at {}", config.full_size);
    }
}

pub fn attach_lens_flare_textures(
    flare: Option<Res<LensFlareTextures>>,
    images: Option<ResMut<PostProcessImages>>,
) {
    let Some(mut images) = images else {
        return;
    };
    let Some(flare) = flare else {
        warn!("Lens flare textures unavailable, compositing without them");
        return;
    };
    images.color_gradient = Some(flare.color_gradient.clone());
    images.lens_dirt = Some(flare.lens_dirt.clone());
    images.star_burst = Some(flare.star_burst.clone());
}

pub fn update_post_process_settings(
    time: Res<Time>,
    config: Res<DemoConfig>,
    light: Res<LightState>,
    mut clock: ResMut<StarburstClock>,
    mut camera_q: Query<(&GlobalTransform, &Camera, &mut PostProcessSettings), With<MainCamera>>,
) {
    let offset = clock.advance(
        config.post.starburst_drift,
        config.post.starburst_rate,
        time.elapsed_secs(),
        time.delta_secs(),
    );

    for (transform, camera, mut settings) in &mut camera_q {
        settings.exposure = light.exposure;
        settings.starburst_offset = offset;
        settings.aspect_ratio = camera
            .logical_viewport_size()
            .map_or(1.0, aspect_ratio);
        settings.sun_alignment = sun_alignment(
            transform.translation(),
            transform.forward().as_vec3(),
            light.position,
        );
    }
}
