use crate::foundation::error::{MagicWishError, MagicWishResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Absolute 0-based frame index in animation timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// Normalized progress of this frame within a clip of `total` frames.
    ///
    /// `total == 0` yields `0.0`.
    pub fn progress(self, total: u64) -> f64 {
        if total == 0 {
            return 0.0;
        }
        self.0 as f64 / total as f64
    }
}

/// Half-open frame range `[start, end)` in timeline space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// Inclusive range start.
    pub start: FrameIndex,
    /// Exclusive range end.
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    /// Create a validated range with `start <= end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> MagicWishResult<Self> {
        if start.0 > end.0 {
            return Err(MagicWishError::validation(
                "FrameRange start must be <= end",
            ));
        }
        Ok(Self { start, end })
    }

    /// Range covering a whole clip of `total` frames.
    pub fn whole(total: u64) -> Self {
        Self {
            start: FrameIndex(0),
            end: FrameIndex(total),
        }
    }

    /// Number of frames contained in the range.
    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    /// Return `true` when the range has no frames.
    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    /// Return `true` when `f` is inside `[start, end)`.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }

    /// Iterate the frame indices of this range in increasing order.
    pub fn iter(self) -> impl Iterator<Item = FrameIndex> {
        (self.start.0..self.end.0).map(FrameIndex)
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a canvas, rejecting zero or out-of-range dimensions.
    ///
    /// The CPU rasterizer addresses pixels with `u16`, and the GIF container with `u16` as well.
    pub fn new(width: u32, height: u32) -> MagicWishResult<Self> {
        let c = Self { width, height };
        c.validate()?;
        Ok(c)
    }

    /// Validate dimensions for both rendering and encoding.
    pub fn validate(self) -> MagicWishResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(MagicWishError::validation("canvas width/height must be > 0"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(MagicWishError::validation(format!(
                "canvas {}x{} exceeds {}x{}",
                self.width,
                self.height,
                u16::MAX,
                u16::MAX
            )));
        }
        Ok(())
    }

    /// Shorter side in pixels, used to scale typography.
    pub fn min_side(self) -> f64 {
        f64::from(self.width.min(self.height))
    }

    /// Number of RGBA8 bytes in one frame.
    pub fn rgba_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
