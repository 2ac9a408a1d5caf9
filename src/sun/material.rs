use bevy::prelude::*;
use bevy::render::render_resource::{AsBindGroup, ShaderType};
use bevy::shader::ShaderRef;

#[derive(ShaderType, Debug, Clone, Copy)]
pub struct SunUniforms {
    pub glow_color: Vec4,
    pub fog_color: Vec4,
    pub fog_density: f32,
}

/// Unlit HDR sphere for the sun, fogged like the terrain.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct SunMaterial {
    #[uniform(0)]
    pub uniforms: SunUniforms,
}

impl SunMaterial {
    pub fn new(glow: Vec3, fog_color: Vec3, fog_density: f32) -> Self {
        Self {
            uniforms: SunUniforms {
                glow_color: glow.extend(1.0),
                fog_color: fog_color.extend(1.0),
                fog_density,
            },
        }
    }

    pub fn set_glow(&mut self, glow: Vec3) {
        self.uniforms.glow_color = glow.extend(1.0);
    }
}

impl Material for SunMaterial {
    fn fragment_shader() -> ShaderRef {
        "shaders/sun.wgsl".into()
    }
}
