use bevy::asset::RenderAssetUsages;
use bevy::image::{ImageAddressMode, ImageFilterMode, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use terragen::{Heightmap, Normalmap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureWrap {
    Repeat,
    ClampToEdge,
}

/// Linear, mipmapped sampling with the given wrap mode on both axes.
pub fn sampler(wrap: TextureWrap) -> ImageSampler {
    let address_mode = match wrap {
        TextureWrap::Repeat => ImageAddressMode::Repeat,
        TextureWrap::ClampToEdge => ImageAddressMode::ClampToEdge,
    };
    ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        mag_filter: ImageFilterMode::Linear,
        min_filter: ImageFilterMode::Linear,
        mipmap_filter: ImageFilterMode::Linear,
        ..default()
    })
}

fn square_extent(size: usize) -> Extent3d {
    Extent3d {
        width: size as u32,
        height: size as u32,
        depth_or_array_layers: 1,
    }
}

/// Single-channel texture with heights normalised to `[0, 1]`.
pub fn heightmap_image(heightmap: &Heightmap) -> Image {
    let mut image = Image::new(
        square_extent(heightmap.size()),
        TextureDimension::D2,
        heightmap.samples().to_vec(),
        TextureFormat::R8Unorm,
        RenderAssetUsages::default(),
    );
    image.sampler = sampler(TextureWrap::Repeat);
    image
}

/// RGBA8 tangent-space normal texture; alpha is unused.
pub fn normalmap_image(normals: &Normalmap) -> Image {
    let mut image = Image::new(
        square_extent(normals.size()),
        TextureDimension::D2,
        normals.to_rgba8(),
        TextureFormat::Rgba8Unorm,
        RenderAssetUsages::default(),
    );
    image.sampler = sampler(TextureWrap::Repeat);
    image
}
