use bevy::prelude::*;
use bevy::render::render_resource::{AsBindGroup, ShaderType};
use bevy::shader::ShaderRef;

#[derive(ShaderType, Debug, Clone, Copy)]
pub struct TerrainUniforms {
    pub light_position: Vec4,
    pub light_ambient: Vec4,
    pub light_diffuse: Vec4,
    pub light_specular: Vec4,
    pub fog_color: Vec4,
    /// Depth of the parallax displacement in UV units.
    pub height_scale: f32,
    /// Normalised height above which snow replaces rock.
    pub snow_threshold: f32,
    pub fog_density: f32,
}

/// Parallax-mapped terrain lit by the animated sun.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct TerrainMaterial {
    #[uniform(0)]
    pub uniforms: TerrainUniforms,
    #[texture(1)]
    #[sampler(2)]
    pub rock_texture: Option<Handle<Image>>,
    #[texture(3)]
    #[sampler(4)]
    pub snow_texture: Option<Handle<Image>>,
    #[texture(5)]
    #[sampler(6)]
    pub normal_map: Handle<Image>,
    #[texture(7)]
    #[sampler(8)]
    pub height_map: Handle<Image>,
}

impl Material for TerrainMaterial {
    fn fragment_shader() -> ShaderRef {
        "shaders/terrain.wgsl".into()
    }
}
