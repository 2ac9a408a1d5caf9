use crate::config::HeightmapSettings;
use crate::error::TerrainError;
use crate::fractal::{FractalParams, fbm};
use crate::noise::NoiseSource;
use log::info;
use rayon::prelude::*;
use std::ops::Range;
use std::time::Instant;

/// Square grid of 8-bit elevation samples, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heightmap {
    size: usize,
    samples: Vec<u8>,
}

impl Heightmap {
    /// Fill a `size * size` grid with quantised fBm, one row per rayon task.
    pub fn generate<N>(noise: &N, settings: &HeightmapSettings) -> Result<Self, TerrainError>
    where
        N: NoiseSource + Sync + ?Sized,
    {
        settings.validate()?;
        let start = Instant::now();
        let size = settings.size;
        let fractal = settings.fractal();
        let mut samples = vec![0u8; size * size];

        samples
            .par_chunks_mut(size)
            .enumerate()
            .for_each(|(y, row)| fill_row(noise, settings.scale, &fractal, y, row));

        info!(
            "Generated {size}x{size} heightmap ({} octaves) in {:.2?}",
            settings.octaves,
            start.elapsed()
        );
        Ok(Self { size, samples })
    }

    pub fn from_samples(size: usize, samples: Vec<u8>) -> Result<Self, TerrainError> {
        if size == 0 {
            return Err(TerrainError::InvalidSize(size));
        }
        if samples.len() != size * size {
            return Err(TerrainError::BufferSize {
                expected: size * size,
                actual: samples.len(),
            });
        }
        Ok(Self { size, samples })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.samples[y * self.size + x]
    }

    /// Sample at a signed position, clamped onto the grid.
    pub fn get_clamped(&self, x: isize, y: isize) -> u8 {
        let last = self.size as isize - 1;
        self.get(x.clamp(0, last) as usize, y.clamp(0, last) as usize)
    }
}

/// Compute rows `rows` of the heightmap described by `settings` into `out`.
///
/// `out` must hold exactly `rows.len() * settings.size` samples. Writing
/// disjoint ranges from several threads reproduces [`Heightmap::generate`].
pub fn fill_rows<N>(
    noise: &N,
    settings: &HeightmapSettings,
    rows: Range<usize>,
    out: &mut [u8],
) -> Result<(), TerrainError>
where
    N: NoiseSource + ?Sized,
{
    settings.validate()?;
    let size = settings.size;
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

    let fractal = settings.fractal();
    for (row, y) in out.chunks_mut(size).zip(rows) {
        fill_row(noise, settings.scale, &fractal, y, row);
    }
    Ok(())
}

/// Map an fBm value in `[0, 1]` to a byte, rounding to nearest.
pub fn quantize(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn fill_row<N>(noise: &N, scale: f32, fractal: &FractalParams, y: usize, row: &mut [u8])
where
    N: NoiseSource + ?Sized,
{
    let ny = y as f32 * scale;
    for (x, sample) in row.iter_mut().enumerate() {
        *sample = quantize(fbm(noise, x as f32 * scale, ny, fractal));
    }
}
