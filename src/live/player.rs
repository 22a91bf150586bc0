use crate::{
    foundation::{
        core::{FrameIndex, Point},
        error::{MagicWishError, MagicWishResult},
    },
    particles::systems::ParticleSystems,
    render::{painter::Painter, surface::Surface},
    timeline::engine::Timeline,
};

/// Looping playback state: a wrapping frame counter, its own particle pools and its own surface.
///
/// Never share this with an encode pass; the encoder builds fresh pools and a fresh target.
#[derive(Debug)]
pub struct LivePlayer {
    frame: u64,
    total: u64,
    loops: u64,
    particles: ParticleSystems,
    surface: Surface,
}

impl LivePlayer {
    /// Player positioned at frame 0 of `timeline`.
    pub fn new(timeline: &Timeline) -> MagicWishResult<Self> {
        let total = timeline.config().total_frames;
        if total == 0 {
            return Err(MagicWishError::validation("live loop needs at least one frame"));
        }
        Ok(Self {
            frame: 0,
            total,
            loops: 0,
            particles: timeline.new_particles(),
            surface: Surface::for_canvas(timeline.config().canvas)?,
        })
    }

    /// Index of the frame the next `tick` renders.
    pub fn frame_index(&self) -> FrameIndex {
        FrameIndex(self.frame)
    }

    /// Completed passes through the clip.
    pub fn loops(&self) -> u64 {
        self.loops
    }

    /// Live particle pools.
    pub fn particles(&self) -> &ParticleSystems {
        &self.particles
    }

    /// Last rendered frame.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Render the current frame, then advance modulo the clip length.
    ///
    /// On wraparound the transient pools (confetti, crackers) are reset so their one-shot
    /// bursts fire again on the next pass. Returns the index that was rendered.
    pub fn tick(
        &mut self,
        timeline: &Timeline,
        painter: &mut Painter,
        pointer: Option<Point>,
    ) -> MagicWishResult<FrameIndex> {
        let idx = FrameIndex(self.frame);
        timeline.render(
            painter,
            &mut self.surface,
            idx,
            self.total,
            &mut self.particles,
            pointer,
        )?;

        self.frame = (self.frame + 1) % self.total;
        if self.frame == 0 {
            self.loops += 1;
            self.particles.reset_transient();
            tracing::debug!(loops = self.loops, "live loop wrapped");
        }
        Ok(idx)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/live/player.rs"]
mod tests;
