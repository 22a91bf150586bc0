use crate::foundation::{
    core::{Canvas, FrameIndex},
    error::{MagicWishError, MagicWishResult},
};

/// Half-open progress window `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Window {
    /// Window start, as a progress fraction.
    pub start: f64,
    /// Window end, as a progress fraction.
    pub end: f64,
}

impl Window {
    /// Construct a window.
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Window length.
    pub fn span(self) -> f64 {
        self.end - self.start
    }

    /// Map `p` into the window, unclamped.
    pub fn local(self, p: f64) -> f64 {
        let span = self.span();
        if span <= 0.0 {
            return if p >= self.end { 1.0 } else { 0.0 };
        }
        (p - self.start) / span
    }

    fn validate(self, name: &str) -> MagicWishResult<()> {
        check_fraction(&format!("{name}.start"), self.start)?;
        check_fraction(&format!("{name}.end"), self.end)?;
        if self.start >= self.end {
            return Err(MagicWishError::validation(format!(
                "{name} window must satisfy start < end (got {}..{})",
                self.start, self.end
            )));
        }
        Ok(())
    }
}

/// Stage boundaries, gates and per-cell timing, all as progress fractions.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StageTimings {
    /// Progress window mapped onto the square sub-progress.
    pub reveal: Window,
    /// The square is drawn while progress is below this.
    pub reveal_visible_until: f64,
    /// Row opacity ramps to zero across this window.
    pub row_fade: Window,
    /// Grid line opacity ramps to zero across this window.
    pub grid_fade: Window,
    /// Stagger between cells of a row, in square sub-progress.
    pub cell_stagger: f64,
    /// Time for one cell to animate in, in square sub-progress.
    pub cell_duration: f64,
    /// How early the row sum appears before its slice ends, in square sub-progress.
    pub sum_lead: f64,
    /// Opacity of completed non-date rows.
    pub completed_row_opacity: f64,
    /// Proof sub-progress window.
    pub proof: Window,
    /// Proof overlay is drawn while progress is below this.
    pub proof_visible_until: f64,
    /// Proof opacity ramps to zero across this window.
    pub proof_fade: Window,
    /// Proof sub-progress after which column lines show.
    pub proof_column_gate: f64,
    /// Proof sub-progress after which column sums show.
    pub proof_label_gate: f64,
    /// Proof sub-progress after which diagonals show.
    pub proof_diagonal_gate: f64,
    /// Finale (image and message) starts here and runs to 1.0.
    pub finale_start: f64,
    /// Confetti fires once progress reaches this.
    pub confetti_gate: f64,
}

impl StageTimings {
    /// Timings of the standard cut.
    pub const STANDARD: Self = Self {
        reveal: Window::new(0.0, 0.5),
        reveal_visible_until: 0.8,
        row_fade: Window::new(0.7, 1.0),
        grid_fade: Window::new(0.7, 0.8),
        cell_stagger: 0.05,
        cell_duration: 0.05,
        sum_lead: 0.05,
        completed_row_opacity: 0.6,
        proof: Window::new(0.5, 0.75),
        proof_visible_until: 0.8,
        proof_fade: Window::new(0.75, 1.0),
        proof_column_gate: 0.2,
        proof_label_gate: 0.3,
        proof_diagonal_gate: 0.5,
        finale_start: 0.7,
        confetti_gate: 0.6,
    };

    /// Timings of the slower cinematic cut.
    pub const CINEMATIC: Self = Self {
        reveal: Window::new(0.0, 0.55),
        reveal_visible_until: 0.85,
        row_fade: Window::new(0.75, 1.0),
        grid_fade: Window::new(0.75, 0.85),
        proof: Window::new(0.55, 0.8),
        proof_visible_until: 0.85,
        proof_fade: Window::new(0.8, 1.0),
        finale_start: 0.75,
        confetti_gate: 0.65,
        ..Self::STANDARD
    };

    /// Check ranges and stage ordering.
    pub fn validate(&self) -> MagicWishResult<()> {
        self.reveal.validate("reveal")?;
        self.row_fade.validate("row_fade")?;
        self.grid_fade.validate("grid_fade")?;
        self.proof.validate("proof")?;
        self.proof_fade.validate("proof_fade")?;
        for (name, v) in [
            ("reveal_visible_until", self.reveal_visible_until),
            ("proof_visible_until", self.proof_visible_until),
            ("finale_start", self.finale_start),
            ("confetti_gate", self.confetti_gate),
            ("completed_row_opacity", self.completed_row_opacity),
            ("cell_stagger", self.cell_stagger),
            ("sum_lead", self.sum_lead),
        ] {
            check_fraction(name, v)?;
        }
        if !(self.cell_duration > 0.0 && self.cell_duration <= 1.0) {
            return Err(MagicWishError::validation("cell_duration must be in (0, 1]"));
        }
        // Three cell staggers plus one duration must fit in a quarter row slice.
        if self.cell_stagger * 3.0 + self.cell_duration > 0.25 + 1e-9 {
            return Err(MagicWishError::validation(
                "cell_stagger * 3 + cell_duration must fit in one row slice (0.25)",
            ));
        }
        if !(self.reveal.end <= self.proof.start && self.proof.start < self.reveal_visible_until) {
            return Err(MagicWishError::validation(
                "stage order requires reveal.end <= proof.start < reveal_visible_until",
            ));
        }
        if !(self.proof.start < self.finale_start && self.finale_start < self.proof_visible_until) {
            return Err(MagicWishError::validation(
                "stage order requires proof.start < finale_start < proof_visible_until",
            ));
        }
        if !(self.proof_column_gate < self.proof_label_gate
            && self.proof_label_gate < self.proof_diagonal_gate)
        {
            return Err(MagicWishError::validation(
                "proof gates must increase: column < label < diagonal",
            ));
        }
        if self.finale_start >= 1.0 {
            return Err(MagicWishError::validation("finale_start must be < 1"));
        }
        Ok(())
    }
}

impl Default for StageTimings {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Text/line contrast policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light ink on a dark background.
    #[default]
    Dark,
    /// Dark ink on a light background. A wish without `colorBg` gets a light default.
    Light,
    /// Pick from the wish background luminance.
    Auto,
}

/// Optional decorative effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EffectFeatures {
    /// Pointer-trail particles.
    pub aura: bool,
    /// One-shot confetti burst.
    pub confetti: bool,
    /// Row-completion bursts.
    pub crackers: bool,
    /// Drifting star glyphs over the finale.
    pub floating_glyphs: bool,
    /// Twinkling glitter over the finale.
    pub glitter: bool,
}

impl Default for EffectFeatures {
    fn default() -> Self {
        Self {
            aura: true,
            confetti: true,
            crackers: true,
            floating_glyphs: false,
            glitter: false,
        }
    }
}

/// Everything that shapes the animation apart from the wish itself.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Output size.
    pub canvas: Canvas,
    /// Grid inset on each side, as a fraction of the shorter canvas side.
    pub padding_frac: f64,
    /// Frames in one loop / in the encoded clip.
    pub total_frames: u64,
    /// Per-frame display delay of the encoded clip.
    pub delay_ms: u32,
    /// Pace of the live preview loop.
    pub live_fps: u32,
    /// Stage timings.
    pub timings: StageTimings,
    /// Contrast policy.
    pub theme: Theme,
    /// Decorative effects.
    pub effects: EffectFeatures,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl TimelineConfig {
    /// 480 frames at 50 ms, dark theme.
    pub fn standard() -> Self {
        Self {
            canvas: Canvas::default(),
            padding_frac: 0.125,
            total_frames: 480,
            delay_ms: 50,
            live_fps: 60,
            timings: StageTimings::STANDARD,
            theme: Theme::Dark,
            effects: EffectFeatures::default(),
        }
    }

    /// 600 frames at 60 ms, light theme, finale glyphs and glitter on.
    pub fn cinematic() -> Self {
        Self {
            total_frames: 600,
            delay_ms: 60,
            timings: StageTimings::CINEMATIC,
            theme: Theme::Light,
            effects: EffectFeatures {
                floating_glyphs: true,
                glitter: true,
                ..EffectFeatures::default()
            },
            ..Self::standard()
        }
    }

    /// Look a preset up by name (`standard` or `cinematic`).
    pub fn preset(name: &str) -> MagicWishResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::standard()),
            "cinematic" | "slow" => Ok(Self::cinematic()),
            other => Err(MagicWishError::validation(format!(
                "unknown preset \"{other}\" (expected standard or cinematic)"
            ))),
        }
    }

    /// Parse a JSON config; missing fields take the standard values.
    pub fn from_json(s: &str) -> MagicWishResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every field.
    pub fn validate(&self) -> MagicWishResult<()> {
        self.canvas.validate()?;
        if !(self.padding_frac >= 0.0 && self.padding_frac < 0.5) {
            return Err(MagicWishError::validation("padding_frac must be in [0, 0.5)"));
        }
        if self.total_frames == 0 {
            return Err(MagicWishError::validation("total_frames must be > 0"));
        }
        if self.delay_ms == 0 {
            return Err(MagicWishError::validation("delay_ms must be > 0"));
        }
        if self.live_fps == 0 {
            return Err(MagicWishError::validation("live_fps must be > 0"));
        }
        self.timings.validate()
    }

    /// Normalized progress of `frame` within `total_frames`.
    pub fn progress(&self, frame: FrameIndex) -> f64 {
        frame.progress(self.total_frames)
    }
}

fn check_fraction(name: &str, v: f64) -> MagicWishResult<()> {
    if !(0.0..=1.0).contains(&v) {
        return Err(MagicWishError::validation(format!(
            "{name} must be in [0, 1] (got {v})"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/config.rs"]
mod tests;
