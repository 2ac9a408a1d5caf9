use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TerrainError {
    #[error("heightmap size must be at least 1, got {0}")]
    InvalidSize(usize),
    #[error("octave count must be at least 1, got {0}")]
    InvalidOctaves(u32),
    #[error("persistence must be positive and finite, got {0}")]
    InvalidPersistence(f32),
    #[error("lacunarity must be positive and finite, got {0}")]
    InvalidLacunarity(f32),
    #[error("sampling scale must be positive and finite, got {0}")]
    InvalidScale(f32),
    #[error("rows {start}..{end} do not fit a map of size {size}")]
    RowsOutOfBounds { start: usize, end: usize, size: usize },
    #[error("output buffer holds {actual} elements, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}
