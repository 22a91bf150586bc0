use crate::{
    foundation::{
        core::FrameIndex,
        error::{MagicWishError, MagicWishResult},
    },
    render::surface::FrameRGBA,
};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Per-frame display delay in milliseconds.
    pub delay_ms: u32,
}

/// Animated-image encoding capability.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order, each
/// frame carrying the same delay. Any error rejects the whole encode; no partial output is kept.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> MagicWishResult<()>;
    /// Submit one frame and its display delay.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA, delay_ms: u32)
    -> MagicWishResult<()>;
    /// Finish the stream and hand back the encoded bytes.
    fn finish(&mut self) -> MagicWishResult<Vec<u8>>;
    /// Drop a partially written stream after a failed encode. The sink must accept a fresh
    /// `begin` afterwards.
    fn abort(&mut self) {}
}

/// In-memory sink for tests and debugging; `finish` yields an empty blob.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    /// Frames in submission order.
    pub(crate) frames: Vec<(FrameIndex, FrameRGBA)>,
    delays: Vec<u32>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Delay submitted with each frame.
    pub fn delays(&self) -> &[u32] {
        &self.delays
    }

    /// Whether `finish` was called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> MagicWishResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.delays.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(
        &mut self,
        idx: FrameIndex,
        frame: &FrameRGBA,
        delay_ms: u32,
    ) -> MagicWishResult<()> {
        if self.cfg.is_none() {
            return Err(MagicWishError::encode("push_frame called before begin"));
        }
        self.frames.push((idx, frame.clone()));
        self.delays.push(delay_ms);
        Ok(())
    }

    fn finish(&mut self) -> MagicWishResult<Vec<u8>> {
        self.finished = true;
        Ok(Vec::new())
    }

    // Captured frames stay readable until the next `begin`.
    fn abort(&mut self) {
        self.cfg = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
