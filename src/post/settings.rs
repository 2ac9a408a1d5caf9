use bevy::math::{UVec2, Vec3};
use bevy::prelude::*;
use bevy::render::extract_component::ExtractComponent;
use bevy::render::extract_resource::ExtractResource;
use bevy::render::render_resource::ShaderType;
use serde::{Deserialize, Serialize};

/// Per-view uniforms of the composite pass.
#[derive(Component, Debug, Default, Clone, Copy, ExtractComponent, ShaderType)]
pub struct PostProcessSettings {
    pub exposure: f32,
    /// Rotation of the starburst mask, in radians.
    pub starburst_offset: f32,
    pub aspect_ratio: f32,
    /// How directly the view faces the sun, in `[0, 1]`.
    pub sun_alignment: f32,
}

/// How the starburst rotation evolves over time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarburstDrift {
    /// Steady rotation at a configured rate.
    #[default]
    Accumulated,
    /// Elapsed time multiplied by the frame delta; jitters with frame pacing.
    FrameScaled,
}

/// Chain parameters shared with the render world.
#[derive(Resource, Debug, Clone, PartialEq, ExtractResource)]
pub struct PostProcessConfig {
    pub blur_amount: u32,
    pub down_sample_factor: u32,
    /// Physical size of the main view when the targets were sized.
    pub full_size: UVec2,
}

/// Images produced or loaded in the main world and sampled by the chain.
///
/// Missing lens-flare textures fall back to a blank image in the render node.
#[derive(Resource, Debug, Clone, ExtractResource)]
pub struct PostProcessImages {
    pub bright_pass: Handle<Image>,
    pub color_gradient: Option<Handle<Image>>,
    pub lens_dirt: Option<Handle<Image>>,
    pub star_burst: Option<Handle<Image>>,
}

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct StarburstClock {
    pub offset: f32,
}

impl StarburstClock {
    pub fn advance(&mut self, drift: StarburstDrift, rate: f32, elapsed: f32, dt: f32) -> f32 {
        self.offset = match drift {
            StarburstDrift::Accumulated => (self.offset + rate * dt) % std::f32::consts::TAU,
            StarburstDrift::FrameScaled => elapsed * dt,
        };
        self.offset
    }
}

pub fn aspect_ratio(size: Vec2) -> f32 {
    if size.y > 0.0 { size.x / size.y } else { 1.0 }
}

/// `max(dot(forward, direction to sun), 0)`.
pub fn sun_alignment(camera_position: Vec3, camera_forward: Vec3, sun_position: Vec3) -> f32 {
    let to_sun = (sun_position - camera_position).normalize_or_zero();
    camera_forward.normalize_or_zero().dot(to_sun).max(0.0)
}
