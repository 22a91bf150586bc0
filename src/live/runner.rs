use std::{
    path::PathBuf,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use crate::{
    foundation::{
        core::{FrameIndex, Point},
        error::{MagicWishError, MagicWishResult},
    },
    live::player::LivePlayer,
    render::{painter::Painter, surface::Surface},
    timeline::engine::Timeline,
};

/// Cooperative cancellation flag for [`run_live`], checked at every frame boundary.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// A handle that is not stopped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the loop to stop after the current frame.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether a stop was requested.
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Last known pointer position, written by the host and read once per live frame.
#[derive(Clone, Debug, Default)]
pub struct SharedPointer(Arc<Mutex<Option<Point>>>);

impl SharedPointer {
    /// Detached pointer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update (or clear) the position.
    pub fn set(&self, pos: Option<Point>) {
        let mut guard = self.0.lock().unwrap_or_else(|e| e.into_inner());
        *guard = pos;
    }

    /// Current position.
    pub fn get(&self) -> Option<Point> {
        *self.0.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Receives each live frame once it is rendered.
pub trait Presenter {
    /// Show `surface`, which holds frame `idx`.
    fn present(&mut self, idx: FrameIndex, surface: &Surface) -> MagicWishResult<()>;
}

/// Presenter that overwrites a PNG file every `every` presented frames.
#[derive(Clone, Debug)]
pub struct PngPresenter {
    path: PathBuf,
    every: u64,
    seen: u64,
    written: u64,
}

impl PngPresenter {
    /// Write to `path` every `every` frames (`0` is treated as `1`).
    pub fn new(path: impl Into<PathBuf>, every: u64) -> Self {
        Self {
            path: path.into(),
            every: every.max(1),
            seen: 0,
            written: 0,
        }
    }

    /// Number of PNG writes so far.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl Presenter for PngPresenter {
    fn present(&mut self, idx: FrameIndex, surface: &Surface) -> MagicWishResult<()> {
        let due = self.seen.is_multiple_of(self.every);
        self.seen += 1;
        if !due {
            return Ok(());
        }
        surface.frame().write_png(&self.path)?;
        self.written += 1;
        tracing::trace!(frame = idx.0, path = %self.path.display(), "presented frame");
        Ok(())
    }
}

/// Bounds and pacing of a [`run_live`] session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LiveOptions {
    /// Target frames per second.
    pub fps: u32,
    /// Stop after this many frames.
    pub max_frames: Option<u64>,
    /// Stop after this much wall-clock time.
    pub max_duration: Option<Duration>,
}

impl LiveOptions {
    /// Unbounded session at `fps`.
    pub fn at_fps(fps: u32) -> Self {
        Self {
            fps,
            max_frames: None,
            max_duration: None,
        }
    }
}

/// Summary of a finished [`run_live`] session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiveReport {
    /// Frames rendered and presented.
    pub frames: u64,
    /// Completed passes through the clip.
    pub loops: u64,
    /// Wall-clock time spent.
    pub elapsed: Duration,
}

/// Drive the live loop until `stop` is set or a bound in `opts` is hit.
///
/// Frames are paced against the wall clock; when rendering falls behind, the schedule is
/// re-anchored instead of bursting to catch up. The particle state lives in a [`LivePlayer`]
/// created for this session.
pub fn run_live(
    timeline: &Timeline,
    painter: &mut Painter,
    presenter: &mut dyn Presenter,
    pointer: &SharedPointer,
    stop: &StopHandle,
    opts: LiveOptions,
) -> MagicWishResult<LiveReport> {
    if opts.fps == 0 {
        return Err(MagicWishError::validation("live fps must be > 0"));
    }
    let interval = Duration::from_secs_f64(1.0 / f64::from(opts.fps));
    let mut player = LivePlayer::new(timeline)?;

    let start = Instant::now();
    let mut next_deadline = start;
    let mut frames = 0u64;

    tracing::debug!(fps = opts.fps, "live loop started");
    loop {
        if stop.is_stopped() {
            break;
        }
        if opts.max_frames.is_some_and(|max| frames >= max) {
            break;
        }
        if opts.max_duration.is_some_and(|max| start.elapsed() >= max) {
            break;
        }

        let idx = player.tick(timeline, painter, pointer.get())?;
        presenter.present(idx, player.surface())?;
        frames += 1;

        next_deadline += interval;
        let now = Instant::now();
        if next_deadline > now {
            std::thread::sleep(next_deadline - now);
        } else {
            next_deadline = now;
        }
    }

    let report = LiveReport {
        frames,
        loops: player.loops(),
        elapsed: start.elapsed(),
    };
    tracing::debug!(
        frames = report.frames,
        loops = report.loops,
        "live loop stopped"
    );
    Ok(report)
}

#[cfg(test)]
#[path = "../../tests/unit/live/runner.rs"]
mod tests;
