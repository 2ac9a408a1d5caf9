//! Pass sequencing for the bloom and lens-flare chain.
//!
//! [`PostProcessChain::record`] only decides which fullscreen draws happen and
//! which targets they read and write. Issuing them is left to a
//! [`PassEncoder`], so the GPU node and the tests share one sequence.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PingPongSlot {
    A,
    B,
}

impl PingPongSlot {
    pub fn index(self) -> usize {
        match self {
            PingPongSlot::A => 0,
            PingPongSlot::B => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetRole {
    /// HDR colour of the main view.
    SceneColor,
    /// Bright-only render of the sun with occluding terrain.
    BrightPass,
    /// Reduced copy of the bright pass.
    Downsample,
    PingPong(PingPongSlot),
    /// Final tonemapped output.
    Display,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurAxis {
    Horizontal,
    Vertical,
}

impl BlurAxis {
    pub fn flipped(self) -> Self {
        match self {
            BlurAxis::Horizontal => BlurAxis::Vertical,
            BlurAxis::Vertical => BlurAxis::Horizontal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenPass {
    Downsample {
        source: TargetRole,
        target: TargetRole,
    },
    Blur {
        axis: BlurAxis,
        source: TargetRole,
        target: TargetRole,
    },
    Composite {
        scene: TargetRole,
        bloom: TargetRole,
        flare: TargetRole,
        target: TargetRole,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PassError {
    #[error("{0:?} cannot be sampled")]
    NotReadable(TargetRole),
    #[error("{0:?} cannot be rendered to")]
    NotWritable(TargetRole),
    #[error("pass reads and writes {0:?}")]
    Feedback(TargetRole),
}

/// Issues one fullscreen draw.
pub trait PassEncoder {
    fn draw_fullscreen(&mut self, pass: &FullscreenPass) -> Result<(), PassError>;
}

/// Alternates blur direction and target slot across iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingPong {
    axis: BlurAxis,
    iterations: u32,
}

impl Default for PingPong {
    fn default() -> Self {
        Self::new()
    }
}

impl PingPong {
    pub fn new() -> Self {
        Self {
            axis: BlurAxis::Horizontal,
            iterations: 0,
        }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Slot the next blur writes into.
    pub fn write_slot(&self) -> PingPongSlot {
        match self.axis {
            BlurAxis::Horizontal => PingPongSlot::B,
            BlurAxis::Vertical => PingPongSlot::A,
        }
    }

    /// Target holding the most recent blur result.
    ///
    /// Before any blur has run this is the downsampled bright pass.
    pub fn current_read(&self) -> TargetRole {
        match self.iterations {
            0 => TargetRole::Downsample,
            n if n % 2 == 1 => TargetRole::PingPong(PingPongSlot::B),
            _ => TargetRole::PingPong(PingPongSlot::A),
        }
    }

    pub fn step(&mut self) -> FullscreenPass {
        let pass = FullscreenPass::Blur {
            axis: self.axis,
            source: self.current_read(),
            target: TargetRole::PingPong(self.write_slot()),
        };
        self.iterations += 1;
        self.axis = self.axis.flipped();
        pass
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub blur_passes: u32,
    pub draws: u32,
    pub bloom_source: TargetRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostProcessChain {
    blur_amount: u32,
}

impl PostProcessChain {
    pub fn new(blur_amount: u32) -> Self {
        Self { blur_amount }
    }

    /// Downsample, blur `blur_amount` times, then composite to the display.
    pub fn record<E: PassEncoder + ?Sized>(&self, encoder: &mut E) -> Result<FrameReport, PassError> {
        encoder.draw_fullscreen(&FullscreenPass::Downsample {
            source: TargetRole::BrightPass,
            target: TargetRole::Downsample,
        })?;

        let mut ping_pong = PingPong::new();
        for _ in 0..self.blur_amount {
            encoder.draw_fullscreen(&ping_pong.step())?;
        }

        let bloom_source = ping_pong.current_read();
        encoder.draw_fullscreen(&FullscreenPass::Composite {
            scene: TargetRole::SceneColor,
            bloom: bloom_source,
            flare: TargetRole::Downsample,
            target: TargetRole::Display,
        })?;

        Ok(FrameReport {
            blur_passes: self.blur_amount,
            draws: self.blur_amount + 2,
            bloom_source,
        })
    }
}

/// Targets the chain may sample from.
pub fn is_readable(role: TargetRole) -> bool {
    !matches!(role, TargetRole::Display)
}

/// Targets the chain may render into.
pub fn is_writable(role: TargetRole) -> bool {
    matches!(
        role,
        TargetRole::Downsample | TargetRole::PingPong(_) | TargetRole::Display
    )
}

/// Check the read/write rules every encoder has to uphold.
pub fn validate_pass(pass: &FullscreenPass) -> Result<(), PassError> {
    let (sources, target) = match *pass {
        FullscreenPass::Downsample { source, target } => ([Some(source), None, None], target),
        FullscreenPass::Blur { source, target, .. } => ([Some(source), None, None], target),
        FullscreenPass::Composite {
            scene,
            bloom,
            flare,
            target,
        } => ([Some(scene), Some(bloom), Some(flare)], target),
    };

    if !is_writable(target) {
        return Err(PassError::NotWritable(target));
    }
    for source in sources.into_iter().flatten() {
        if !is_readable(source) {
            return Err(PassError::NotReadable(source));
        }
        if source == target {
            return Err(PassError::Feedback(target));
        }
    }
    Ok(())
}
