use bevy::math::UVec2;
use thiserror::Error;

/// Size of one offscreen target in the post-process chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetLayout {
    /// Scene, bright-pass and ping-pong targets.
    pub full: UVec2,
    /// Bloom source after downsampling.
    pub reduced: UVec2,
    pub factor: u32,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    #[error("target extent {0} has a zero dimension")]
    ZeroExtent(UVec2),
    #[error("downsample factor must be at least 1")]
    ZeroFactor,
    #[error("downsample factor {factor} leaves nothing of a {full} target")]
    FactorTooLarge { factor: u32, full: UVec2 },
}

impl TargetLayout {
    pub fn new(full: UVec2, factor: u32) -> Result<Self, TargetError> {
        if full.x == 0 || full.y == 0 {
            return Err(TargetError::ZeroExtent(full));
        }
        if factor == 0 {
            return Err(TargetError::ZeroFactor);
        }
        let reduced = full / factor;
        if reduced.x == 0 || reduced.y == 0 {
            return Err(TargetError::FactorTooLarge { factor, full });
        }
        Ok(Self {
            full,
            reduced,
            factor,
        })
    }

    /// Same as [`TargetLayout::new`] but every extent is forced to at least 1x1.
    pub fn clamped(full: UVec2, factor: u32) -> Self {
        let full = full.max(UVec2::ONE);
        let factor = factor.max(1);
        Self {
            full,
            reduced: (full / factor).max(UVec2::ONE),
            factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(UVec2::new(1920, 1080), 4, UVec2::new(480, 270))]
    #[case(UVec2::new(1920, 1080), 1, UVec2::new(1920, 1080))]
    #[case(UVec2::new(1001, 7), 2, UVec2::new(500, 3))]
    fn test_reduced_size(#[case] full: UVec2, #[case] factor: u32, #[case] expected: UVec2) {
        let layout = TargetLayout::new(full, factor).unwrap();
        assert_eq!(layout.reduced, expected);
        assert_eq!(layout.full, full);
    }

    #[rstest]
    #[case(UVec2::new(0, 1080), 4, TargetError::ZeroExtent(UVec2::new(0, 1080)))]
    #[case(UVec2::new(1920, 1080), 0, TargetError::ZeroFactor)]
    #[case(UVec2::new(3, 3), 4, TargetError::FactorTooLarge { factor: 4, full: UVec2::new(3, 3) })]
    fn test_invalid_layouts(#[case] full: UVec2, #[case] factor: u32, #[case] expected: TargetError) {
        assert_eq!(TargetLayout::new(full, factor), Err(expected));
    }

    #[test]
    fn test_clamped_never_degenerates() {
        let layout = TargetLayout::clamped(UVec2::new(3, 0), 0);
        assert_eq!(layout.full, UVec2::new(3, 1));
        assert_eq!(layout.reduced, UVec2::new(3, 1));
        assert_eq!(layout.factor, 1);

        let layout = TargetLayout::clamped(UVec2::new(3, 3), 8);
        assert_eq!(layout.reduced, UVec2::ONE);
    }
}
