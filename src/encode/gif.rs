use std::{
    sync::mpsc,
    thread::{self, JoinHandle},
};

use crate::{
    assets::color::Rgba8,
    encode::sink::{FrameSink, SinkConfig},
    foundation::{
        core::{Canvas, FrameIndex},
        error::{MagicWishError, MagicWishResult},
    },
    render::surface::{FrameRGBA, flatten_to_opaque_rgba8},
};

/// Frames buffered between the caller and the encoder thread.
const QUEUE_DEPTH: usize = 4;

/// Default NeuQuant sampling speed (1 = best quality, 30 = fastest).
pub const DEFAULT_GIF_SPEED: i32 = 10;

struct GifJob {
    rgba: Vec<u8>,
    delay_cs: u16,
}

struct Worker {
    tx: Option<mpsc::SyncSender<GifJob>>,
    handle: JoinHandle<MagicWishResult<Vec<u8>>>,
}

impl Worker {
    fn join(mut self) -> MagicWishResult<Vec<u8>> {
        drop(self.tx.take());
        self.handle
            .join()
            .map_err(|_| MagicWishError::encode("gif encoder thread panicked"))?
    }
}

/// Animated GIF sink.
///
/// Palette quantization and LZW compression run on a dedicated thread fed through a bounded
/// channel, so rendering the next frame overlaps with encoding the previous one. The stream loops
/// forever. Translucent pixels are flattened over `background` since GIF has no partial alpha.
pub struct GifSink {
    background: Rgba8,
    speed: i32,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    frames_pushed: u64,
    worker: Option<Worker>,
}

impl std::fmt::Debug for GifSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GifSink")
            .field("background", &self.background)
            .field("speed", &self.speed)
            .field("cfg", &self.cfg)
            .field("frames_pushed", &self.frames_pushed)
            .finish_non_exhaustive()
    }
}

impl GifSink {
    /// Sink flattening onto `background`.
    pub fn new(background: Rgba8) -> Self {
        Self {
            background: Rgba8 { a: 255, ..background },
            speed: DEFAULT_GIF_SPEED,
            cfg: None,
            last_idx: None,
            frames_pushed: 0,
            worker: None,
        }
    }

    /// Override the quantizer speed; clamped to `1..=30`.
    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed.clamp(1, 30);
        self
    }

    fn worker_error(&mut self) -> MagicWishError {
        match self.worker.take().map(Worker::join) {
            Some(Err(e)) => e,
            _ => MagicWishError::encode("gif encoder thread stopped unexpectedly"),
        }
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> MagicWishResult<()> {
        if self.worker.is_some() {
            tracing::debug!("discarding unfinished gif stream");
            self.abort();
        }
        Canvas::new(cfg.width, cfg.height)?;
        if cfg.delay_ms == 0 {
            return Err(MagicWishError::validation("gif frame delay must be > 0"));
        }
        let width = cfg.width as u16;
        let height = cfg.height as u16;
        let speed = self.speed;

        let (tx, rx) = mpsc::sync_channel::<GifJob>(QUEUE_DEPTH);
        let handle = thread::Builder::new()
            .name("magicwish-gif".to_string())
            .spawn(move || run_worker(rx, width, height, speed))
            .map_err(|e| MagicWishError::encode(format!("spawn gif encoder thread: {e}")))?;

        tracing::debug!(
            width = cfg.width,
            height = cfg.height,
            delay_ms = cfg.delay_ms,
            speed,
            "gif encoder started"
        );

        self.cfg = Some(cfg);
        self.last_idx = None;
        self.frames_pushed = 0;
        self.worker = Some(Worker {
            tx: Some(tx),
            handle,
        });
        Ok(())
    }

    fn push_frame(
        &mut self,
        idx: FrameIndex,
        frame: &FrameRGBA,
        delay_ms: u32,
    ) -> MagicWishResult<()> {
        let Some(cfg) = self.cfg else {
            return Err(MagicWishError::encode("push_frame called before begin"));
        };
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(MagicWishError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.data.len() != cfg.width as usize * cfg.height as usize * 4 {
            return Err(MagicWishError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(MagicWishError::encode(format!(
                "frames must be pushed in increasing order (got {} after {})",
                idx.0, last.0
            )));
        }

        let mut rgba = vec![0u8; frame.data.len()];
        flatten_to_opaque_rgba8(&mut rgba, &frame.data, frame.premultiplied, self.background)?;

        let Some(tx) = self.worker.as_ref().and_then(|w| w.tx.as_ref()) else {
            return Err(MagicWishError::encode("gif sink is already finished"));
        };
        let job = GifJob {
            rgba,
            delay_cs: delay_centis(delay_ms),
        };
        if tx.send(job).is_err() {
            return Err(self.worker_error());
        }

        self.last_idx = Some(idx);
        self.frames_pushed += 1;
        Ok(())
    }

    fn finish(&mut self) -> MagicWishResult<Vec<u8>> {
        let Some(worker) = self.worker.take() else {
            return Err(MagicWishError::encode("finish called before begin"));
        };
        let bytes = worker.join()?;
        tracing::debug!(
            frames = self.frames_pushed,
            bytes = bytes.len(),
            "gif encoder finished"
        );
        self.cfg = None;
        Ok(bytes)
    }

    fn abort(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        self.cfg = None;
        self.last_idx = None;
        self.frames_pushed = 0;
    }
}

impl Drop for GifSink {
    fn drop(&mut self) {
        self.abort();
    }
}

/// GIF delays are stored in hundredths of a second.
pub(crate) fn delay_centis(delay_ms: u32) -> u16 {
    (delay_ms.saturating_add(5) / 10).clamp(1, u32::from(u16::MAX)) as u16
}

fn run_worker(
    rx: mpsc::Receiver<GifJob>,
    width: u16,
    height: u16,
    speed: i32,
) -> MagicWishResult<Vec<u8>> {
    let mut encoder = ::gif::Encoder::new(Vec::new(), width, height, &[])
        .map_err(|e| MagicWishError::encode(format!("create gif encoder: {e}")))?;
    encoder
        .set_repeat(::gif::Repeat::Infinite)
        .map_err(|e| MagicWishError::encode(format!("set gif repeat: {e}")))?;

    for mut job in rx {
        let mut frame = ::gif::Frame::from_rgba_speed(width, height, &mut job.rgba, speed);
        frame.delay = job.delay_cs;
        encoder
            .write_frame(&frame)
            .map_err(|e| MagicWishError::encode(format!("write gif frame: {e}")))?;
    }

    encoder
        .into_inner()
        .map_err(|e| MagicWishError::encode(format!("finish gif stream: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
