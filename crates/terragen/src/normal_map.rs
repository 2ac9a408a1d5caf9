use crate::error::TerrainError;
use crate::heightmap::Heightmap;
use glam::Vec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Encoded normal of a level surface.
pub const FLAT_NORMAL: [f32; 3] = [0.5, 0.5, 1.0];

/// How texels on the outermost ring of the map get their normals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderPolicy {
    /// Missing neighbours repeat the nearest edge sample.
    #[default]
    ClampToEdge,
    /// Border texels are written as [`FLAT_NORMAL`].
    Flat,
}

/// Tangent-space normals derived from a [`Heightmap`], encoded into `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalmap {
    size: usize,
    texels: Vec<[f32; 3]>,
}

impl Normalmap {
    pub fn generate(heightmap: &Heightmap, border: BorderPolicy) -> Self {
        let size = heightmap.size();
        let mut texels = vec![FLAT_NORMAL; size * size];

        texels
            .par_chunks_mut(size)
            .enumerate()
            .for_each(|(y, row)| fill_row(heightmap, border, y, row));

        Self { size, texels }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn texels(&self) -> &[[f32; 3]] {
        &self.texels
    }

    pub fn get(&self, x: usize, y: usize) -> [f32; 3] {
        self.texels[y * self.size + x]
    }

    /// Pack into RGBA8 with opaque alpha, for upload as a filterable texture.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.texels.len() * 4);
        for texel in &self.texels {
            for channel in texel {
                bytes.push((channel.clamp(0.0, 1.0) * 255.0).round() as u8);
            }
            bytes.push(u8::MAX);
        }
        bytes
    }
}

/// Compute normals for rows `rows` into `out` (`rows.len() * size` texels).
pub fn fill_rows(
    heightmap: &Heightmap,
    border: BorderPolicy,
    rows: Range<usize>,
    out: &mut [[f32; 3]],
) -> Result<(), TerrainError> {
    let size = heightmap.size();
    if rows.start > rows.end || rows.end > size {
        return Err(TerrainError::RowsOutOfBounds {
            start: rows.start,
            end: rows.end,
            size,
        });
    }
    let expected = rows.len() * size;
    if out.len() != expected {
        return Err(TerrainError::BufferSize {
            expected,
            actual: out.len(),
        });
    }

    for (row, y) in out.chunks_mut(size).zip(rows) {
        fill_row(heightmap, border, y, row);
    }
    Ok(())
}

/// Unit surface normal at `(x, y)` from central differences.
///
/// Neighbours that fall off the grid are clamped to the edge.
pub fn surface_normal(heightmap: &Heightmap, x: usize, y: usize) -> Vec3 {
    let (x, y) = (x as isize, y as isize);
    let sample = |sx: isize, sy: isize| heightmap.get_clamped(sx, sy) as f32 / 255.0;

    let left = sample(x - 1, y);
    let right = sample(x + 1, y);
    let up = sample(x, y - 1);
    let down = sample(x, y + 1);

    Vec3::new(left - right, up - down, 1.0).normalize()
}

pub fn encode(normal: Vec3) -> [f32; 3] {
    let encoded = (normal * 0.5 + Vec3::splat(0.5)).clamp(Vec3::ZERO, Vec3::ONE);
    encoded.to_array()
}

fn is_border(size: usize, x: usize, y: usize) -> bool {
    x == 0 || y == 0 || x + 1 == size || y + 1 == size
}

fn fill_row(heightmap: &Heightmap, border: BorderPolicy, y: usize, row: &mut [[f32; 3]]) {
    let size = heightmap.size();
    for (x, texel) in row.iter_mut().enumerate() {
        *texel = if border == BorderPolicy::Flat && is_border(size, x, y) {
            FLAT_NORMAL
        } else {
            encode(surface_normal(heightmap, x, y))
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeightmapSettings;
    use crate::noise::SimplexNoise;
    use rstest::rstest;

    fn decode(texel: [f32; 3]) -> Vec3 {
        Vec3::from_array(texel) * 2.0 - Vec3::ONE
    }

    fn noisy_heightmap(size: usize) -> Heightmap {
        let settings = HeightmapSettings {
            size,
            scale: 0.09,
            ..Default::default()
        };
        Heightmap::generate(&SimplexNoise::new(17), &settings).unwrap()
    }

    /// Height rises by `step` per column.
    fn ramp(size: usize, step: u8) -> Heightmap {
        let samples = (0..size * size).map(|i| (i % size) as u8 * step).collect();
        Heightmap::from_samples(size, samples).unwrap()
    }

    #[rstest]
    #[case(BorderPolicy::ClampToEdge)]
    #[case(BorderPolicy::Flat)]
    fn test_normals_are_unit_and_encoded(#[case] border: BorderPolicy) {
        let heightmap = noisy_heightmap(48);
        let normals = Normalmap::generate(&heightmap, border);

        assert_eq!(normals.size(), 48);
        assert_eq!(normals.texels().len(), 48 * 48);
        for texel in normals.texels() {
            assert!(texel.iter().all(|c| (0.0..=1.0).contains(c)), "{texel:?}");
            let length = decode(*texel).length();
            assert!((length - 1.0).abs() < 1e-3, "length {length}");
        }
    }

    #[test]
    fn test_interior_matches_central_differences() {
        let heightmap = noisy_heightmap(16);
        let normals = Normalmap::generate(&heightmap, BorderPolicy::Flat);

        let (x, y) = (7, 9);
        let h = |x: usize, y: usize| heightmap.get(x, y) as f32 / 255.0;
        let expected = Vec3::new(h(x - 1, y) - h(x + 1, y), h(x, y - 1) - h(x, y + 1), 1.0)
            .normalize();
        let actual = decode(normals.get(x, y));
        assert!((actual - expected).length() < 1e-5);
    }

    #[test]
    fn test_flat_policy_writes_flat_border() {
        let heightmap = ramp(6, 40);
        let normals = Normalmap::generate(&heightmap, BorderPolicy::Flat);

        for i in 0..6 {
            assert_eq!(normals.get(i, 0), FLAT_NORMAL);
            assert_eq!(normals.get(i, 5), FLAT_NORMAL);
            assert_eq!(normals.get(0, i), FLAT_NORMAL);
            assert_eq!(normals.get(5, i), FLAT_NORMAL);
        }
        assert_ne!(normals.get(2, 2), FLAT_NORMAL);
    }

    #[test]
    fn test_clamped_border_follows_slope() {
        let heightmap = ramp(6, 40);
        let normals = Normalmap::generate(&heightmap, BorderPolicy::ClampToEdge);

        // Height grows with x, so every normal leans towards -x
        for y in 0..6 {
            for x in 0..6 {
                let normal = decode(normals.get(x, y));
                assert!(normal.x < 0.0, "({x}, {y}) -> {normal}");
                assert!(normal.y.abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_level_map_is_flat_everywhere() {
        let heightmap = Heightmap::from_samples(5, vec![100; 25]).unwrap();
        let normals = Normalmap::generate(&heightmap, BorderPolicy::ClampToEdge);
        assert!(normals.texels().iter().all(|t| *t == FLAT_NORMAL));
    }

    #[test]
    fn test_single_sample_map() {
        let heightmap = Heightmap::from_samples(1, vec![200]).unwrap();
        let normals = Normalmap::generate(&heightmap, BorderPolicy::ClampToEdge);
        assert_eq!(normals.texels(), &[FLAT_NORMAL]);
    }

    #[test]
    fn test_row_ranges_reproduce_full_map() {
        let heightmap = noisy_heightmap(12);
        let full = Normalmap::generate(&heightmap, BorderPolicy::ClampToEdge);

        let mut pieced = vec![[0.0; 3]; 12 * 12];
        let (top, bottom) = pieced.split_at_mut(4 * 12);
        fill_rows(&heightmap, BorderPolicy::ClampToEdge, 0..4, top).unwrap();
        fill_rows(&heightmap, BorderPolicy::ClampToEdge, 4..12, bottom).unwrap();

        assert_eq!(full.texels(), pieced.as_slice());
    }

    #[test]
    fn test_rgba8_packing() {
        let heightmap = Heightmap::from_samples(2, vec![0; 4]).unwrap();
        let bytes = Normalmap::generate(&heightmap, BorderPolicy::Flat).to_rgba8();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[..4], &[128, 128, 255, 255]);
    }
}
