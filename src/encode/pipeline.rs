use crate::{
    assets::color::Rgba8,
    encode::sink::{FrameSink, SinkConfig},
    foundation::{
        core::{Canvas, FrameIndex},
        error::{MagicWishError, MagicWishResult},
    },
    render::{painter::Painter, surface::Surface},
    timeline::engine::Timeline,
};

/// Render `total_frames` frames with `render` and submit them to `sink` in order.
///
/// The pass owns its own [`Surface`]. Each frame starts from a transparent target, and every
/// frame is submitted with the same `delay_ms`. The first failure from `render` or `sink` rejects
/// the whole encode, nothing is returned and the sink is aborted so it can be reused.
#[tracing::instrument(skip(render, sink), fields(frames = total_frames))]
pub fn encode<F>(
    mut render: F,
    width: u32,
    height: u32,
    total_frames: u64,
    delay_ms: u32,
    sink: &mut dyn FrameSink,
) -> MagicWishResult<Vec<u8>>
where
    F: FnMut(&mut Surface, FrameIndex, u64) -> MagicWishResult<()>,
{
    Canvas::new(width, height)?;
    if total_frames == 0 {
        return Err(MagicWishError::validation("encode needs at least one frame"));
    }
    if delay_ms == 0 {
        return Err(MagicWishError::validation("encode delay_ms must be > 0"));
    }

    let mut surface = Surface::new(width, height)?;
    sink.begin(SinkConfig {
        width,
        height,
        delay_ms,
    })?;

    let streamed = (0..total_frames).try_for_each(|i| {
        let idx = FrameIndex(i);
        surface.clear(Rgba8::rgba(0, 0, 0, 0));
        render(&mut surface, idx, total_frames)?;
        sink.push_frame(idx, &surface.frame(), delay_ms)
    });
    let bytes = match streamed.and_then(|()| sink.finish()) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "encode failed; discarding partial stream");
            sink.abort();
            return Err(e);
        }
    };
    tracing::info!(frames = total_frames, bytes = bytes.len(), "encode finished");
    Ok(bytes)
}

/// Encode the full clip of `timeline` into `sink`.
///
/// Uses fresh particle pools and no pointer, so the output only depends on the wish and the
/// configuration (plus the backdrop, if it is ready when the pass starts).
pub fn encode_wish(
    timeline: &Timeline,
    painter: &mut Painter,
    sink: &mut dyn FrameSink,
) -> MagicWishResult<Vec<u8>> {
    let cfg = timeline.config();
    let mut particles = timeline.new_particles();
    if !timeline.backdrop().is_ready() {
        tracing::debug!("backdrop not ready; encoding without it");
    }
    encode(
        |surface, idx, total| timeline.render(painter, surface, idx, total, &mut particles, None),
        cfg.canvas.width,
        cfg.canvas.height,
        cfg.total_frames,
        cfg.delay_ms,
        sink,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/encode/pipeline.rs"]
mod tests;
