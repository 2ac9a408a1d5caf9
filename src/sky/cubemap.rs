use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{
    Extent3d, TextureDimension, TextureFormat, TextureViewDescriptor, TextureViewDimension,
};
use thiserror::Error;

/// Faces in cube-map layer order: +X, -X, +Y, -Y, +Z, -Z.
pub const FACE_NAMES: [&str; 6] = ["right", "left", "up", "down", "front", "back"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkyboxError {
    #[error("a cube map needs 6 faces, got {0}")]
    FaceCount(usize),
    #[error("{} face has no pixel data", face_name(.0))]
    MissingData(usize),
    #[error("{} face cannot be converted to RGBA8", face_name(.0))]
    Unconvertible(usize),
    #[error("{} face is {actual}, expected {expected}", face_name(.face))]
    SizeMismatch {
        face: usize,
        expected: UVec2,
        actual: UVec2,
    },
    #[error("{} face must be square, got {size}", face_name(.face))]
    NotSquare { face: usize, size: UVec2 },
}

fn face_name(index: &usize) -> &'static str {
    FACE_NAMES.get(*index).copied().unwrap_or("unknown")
}

/// Stack six equally sized square faces into one cube-map image.
pub fn stack_cube_faces(faces: &[&Image]) -> Result<Image, SkyboxError> {
    if faces.len() != 6 {
        return Err(SkyboxError::FaceCount(faces.len()));
    }

    let expected = faces[0].size();
    if expected.x != expected.y {
        return Err(SkyboxError::NotSquare {
            face: 0,
            size: expected,
        });
    }

    let mut data = Vec::with_capacity((expected.x * expected.y * 4 * 6) as usize);
    for (index, face) in faces.iter().enumerate() {
        let actual = face.size();
        if actual != expected {
            return Err(SkyboxError::SizeMismatch {
                face: index,
                expected,
                actual,
            });
        }
        let converted = face
            .convert(TextureFormat::Rgba8UnormSrgb)
            .ok_or(SkyboxError::Unconvertible(index))?;
        let bytes = converted.data.ok_or(SkyboxError::MissingData(index))?;
        data.extend_from_slice(&bytes);
    }

    let mut image = Image::new(
        Extent3d {
            width: expected.x,
            height: expected.y,
            depth_or_array_layers: 6,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    );
    image.texture_view_descriptor = Some(TextureViewDescriptor {
        dimension: Some(TextureViewDimension::Cube),
        ..default()
    });
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn face(size: u32, value: u8) -> Image {
        Image::new_fill(
            Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            &[value, value, value, 255],
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::default(),
        )
    }

    #[test]
    fn test_six_faces_stack_in_order() {
        let faces: Vec<Image> = (0..6).map(|i| face(4, i * 10)).collect();
        let refs: Vec<&Image> = faces.iter().collect();

        let cube = stack_cube_faces(&refs).unwrap();

        assert_eq!(cube.texture_descriptor.size.depth_or_array_layers, 6);
        assert_eq!(cube.width(), 4);
        let data = cube.data.unwrap();
        assert_eq!(data.len(), 4 * 4 * 4 * 6);
        for layer in 0..6 {
            assert_eq!(data[layer * 64], layer as u8 * 10);
        }
        assert_eq!(
            cube.texture_view_descriptor.and_then(|d| d.dimension),
            Some(TextureViewDimension::Cube)
        );
    }

    #[rstest]
    #[case(0)]
    #[case(5)]
    #[case(7)]
    fn test_wrong_face_count(#[case] count: usize) {
        let faces: Vec<Image> = (0..count).map(|_| face(2, 0)).collect();
        let refs: Vec<&Image> = faces.iter().collect();
        assert_eq!(
            stack_cube_faces(&refs).unwrap_err(),
            SkyboxError::FaceCount(count)
        );
    }

    #[test]
    fn test_mismatched_face_is_reported() {
        let mut faces: Vec<Image> = (0..6).map(|_| face(4, 0)).collect();
        faces[3] = face(8, 0);
        let refs: Vec<&Image> = faces.iter().collect();

        assert_eq!(
            stack_cube_faces(&refs).unwrap_err(),
            SkyboxError::SizeMismatch {
                face: 3,
                expected: UVec2::splat(4),
                actual: UVec2::splat(8),
            }
        );
    }
}
