use std::f64::consts::{PI, TAU};

use crate::{
    assets::{color::Rgba8, provider::BackdropSlot},
    foundation::{
        core::{Canvas, FrameIndex, Point, Rect},
        error::MagicWishResult,
        math::hash_unit,
    },
    particles::systems::{ParticleSettings, ParticleStep, ParticleSystems},
    render::{painter::Painter, surface::Surface},
    square::builder::{MagicGrid, build_from_date},
    timeline::{
        config::{Theme, TimelineConfig},
        display::{DrawOp, FrameDescriptor, TextAlign, TextBaseline, TextRole},
        stages::{self, FinaleState, GRID_DIM, ProofState, RowPhase},
    },
    wish::model::WishSpec,
};

/// Lengths below are tuned for an 800px canvas and scaled from there.
pub(crate) const REFERENCE_SIDE: f64 = 800.0;

/// Pixel geometry of the square on the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    /// Top-left corner of the grid.
    pub origin: Point,
    /// Grid side length.
    pub size: f64,
    /// Cell side length.
    pub cell: f64,
}

impl GridLayout {
    /// Centre a square grid on `canvas`, inset by `padding_frac` of the shorter side.
    pub fn for_canvas(canvas: Canvas, padding_frac: f64) -> Self {
        let side = canvas.min_side();
        let size = side - 2.0 * side * padding_frac;
        Self {
            origin: Point::new(
                (f64::from(canvas.width) - size) / 2.0,
                (f64::from(canvas.height) - size) / 2.0,
            ),
            size,
            cell: size / GRID_DIM as f64,
        }
    }

    /// Horizontal centre of column `c`.
    pub fn col_center_x(&self, c: usize) -> f64 {
        self.origin.x + (c as f64 + 0.5) * self.cell
    }

    /// Vertical centre of row `r`.
    pub fn row_center_y(&self, r: usize) -> f64 {
        self.origin.y + (r as f64 + 0.5) * self.cell
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.origin.x + self.size
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.origin.y + self.size
    }

    fn row_band(&self, r: usize) -> Rect {
        let y = self.origin.y + r as f64 * self.cell;
        Rect::new(self.origin.x, y, self.right(), y + self.cell)
    }
}

/// Theme-resolved colours.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Palette {
    background: Rgba8,
    highlight: Rgba8,
    ink: Rgba8,
    shade: Rgba8,
}

const SLATE: Rgba8 = Rgba8::rgb(0x1e, 0x29, 0x3b);
/// Background of the light theme when the wish brings none.
const PAPER: Rgba8 = Rgba8::rgb(0xf8, 0xfa, 0xfc);

impl Palette {
    fn resolve(theme: Theme, wish: &WishSpec) -> Self {
        let background = match (theme, wish.color_bg) {
            (Theme::Light, None) => PAPER,
            _ => wish.background(),
        };
        let light = match theme {
            Theme::Dark => false,
            Theme::Light => true,
            Theme::Auto => background.luminance() > 0.5,
        };
        let (ink, shade) = if light {
            (SLATE, Rgba8::WHITE)
        } else {
            (Rgba8::WHITE, Rgba8::BLACK)
        };
        Self {
            background,
            highlight: wish.highlight(),
            ink,
            shade,
        }
    }
}

/// The animation: one wish, one square, one configuration.
///
/// [`Timeline::describe`] is a pure function of the frame index. [`Timeline::render`] adds
/// the externally owned particle pools and paints into a surface.
#[derive(Clone, Debug)]
pub struct Timeline {
    config: TimelineConfig,
    wish: WishSpec,
    grid: MagicGrid,
    layout: GridLayout,
    palette: Palette,
    backdrop: BackdropSlot,
    seed: u64,
}

impl Timeline {
    /// Validate the wish and config and build the square from the wish date.
    pub fn new(wish: WishSpec, config: TimelineConfig) -> MagicWishResult<Self> {
        wish.validate()?;
        let grid = build_from_date(wish.date_quadruple()?);
        Self::with_grid(grid, wish, config)
    }

    /// Use a prebuilt square instead of the wish date.
    pub fn with_grid(
        grid: MagicGrid,
        wish: WishSpec,
        config: TimelineConfig,
    ) -> MagicWishResult<Self> {
        config.validate()?;
        let layout = GridLayout::for_canvas(config.canvas, config.padding_frac);
        let palette = Palette::resolve(config.theme, &wish);
        let seed = wish.seed();
        tracing::debug!(
            magic_constant = grid.magic_constant(),
            offset = grid.offset(),
            total_frames = config.total_frames,
            "timeline ready"
        );
        Ok(Self {
            config,
            wish,
            grid,
            layout,
            palette,
            backdrop: BackdropSlot::empty(),
            seed,
        })
    }

    /// Attach the slot the finale reads its backdrop from.
    pub fn with_backdrop(mut self, backdrop: BackdropSlot) -> Self {
        self.backdrop = backdrop;
        self
    }

    /// Configuration.
    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Square.
    pub fn grid(&self) -> &MagicGrid {
        &self.grid
    }

    /// Wish.
    pub fn wish(&self) -> &WishSpec {
        &self.wish
    }

    /// Grid geometry.
    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    /// Resolved canvas background colour.
    pub fn background(&self) -> Rgba8 {
        self.palette.background
    }

    /// Backdrop slot.
    pub fn backdrop(&self) -> &BackdropSlot {
        &self.backdrop
    }

    /// Fresh, empty particle pools seeded for this wish.
    pub fn new_particles(&self) -> ParticleSystems {
        ParticleSystems::new(
            self.seed,
            ParticleSettings {
                canvas: self.config.canvas,
                effects: self.config.effects,
                highlight: self.palette.highlight,
                confetti_gate: self.config.timings.confetti_gate,
            },
        )
    }

    /// Particle pools in the state a full pass leaves them in just before painting `frame`.
    ///
    /// Replays the steps of frames `0..frame` without painting, so rendering `frame` with the
    /// result matches that frame of [`crate::encode_wish`].
    pub fn particles_at(&self, frame: FrameIndex, total: u64) -> ParticleSystems {
        let mut particles = self.new_particles();
        for i in 0..frame.0 {
            self.step_particles(&mut particles, FrameIndex(i).progress(total), None);
        }
        particles
    }

    fn step_particles(
        &self,
        particles: &mut ParticleSystems,
        progress: f64,
        pointer: Option<Point>,
    ) {
        particles.advance(&ParticleStep {
            progress,
            rows_completed: stages::rows_completed(&self.config.timings, progress),
            row_centers: std::array::from_fn(|r| self.layout.row_center_y(r)),
            pointer,
        });
    }

    /// Describe frame `frame` of `total`.
    pub fn describe(&self, frame: FrameIndex, total: u64) -> FrameDescriptor {
        self.describe_progress(frame.progress(total))
    }

    /// Describe the frame at normalized progress `p`.
    pub fn describe_progress(&self, p: f64) -> FrameDescriptor {
        let mut ops = vec![DrawOp::Clear {
            color: self.palette.background,
        }];
        let t = &self.config.timings;
        if stages::reveal_visible(t, p) {
            self.push_reveal(&mut ops, p);
        }
        if let Some(proof) = stages::proof_state(t, p) {
            self.push_proof(&mut ops, proof);
        }
        if let Some(finale) = stages::finale_state(t, p) {
            self.push_finale(&mut ops, p, finale);
        }
        FrameDescriptor { progress: p, ops }
    }

    /// Overwrite `surface` with frame `frame` of `total`.
    ///
    /// `particles` is advanced by one step; pass a fresh set per independent pass.
    pub fn render(
        &self,
        painter: &mut Painter,
        surface: &mut Surface,
        frame: FrameIndex,
        total: u64,
        particles: &mut ParticleSystems,
        pointer: Option<Point>,
    ) -> MagicWishResult<()> {
        let mut desc = self.describe(frame, total);
        self.step_particles(particles, desc.progress, pointer);
        desc.ops.extend(particles.draw_ops());
        painter.paint(surface, &desc, self.backdrop.get())
    }

    fn unit(&self) -> f64 {
        self.config.canvas.min_side() / REFERENCE_SIDE
    }

    fn push_reveal(&self, ops: &mut Vec<DrawOp>, p: f64) {
        let t = &self.config.timings;
        let l = &self.layout;
        let u = self.unit();
        let pal = &self.palette;

        let grid_alpha = stages::grid_opacity(t, p);
        if grid_alpha > 0.0 {
            let color = pal.ink.fade(0.15 * grid_alpha);
            for i in 0..=GRID_DIM {
                let off = i as f64 * l.cell;
                ops.push(DrawOp::Line {
                    from: Point::new(l.origin.x, l.origin.y + off),
                    to: Point::new(l.right(), l.origin.y + off),
                    width: 2.0 * u,
                    color,
                });
                ops.push(DrawOp::Line {
                    from: Point::new(l.origin.x + off, l.origin.y),
                    to: Point::new(l.origin.x + off, l.bottom()),
                    width: 2.0 * u,
                    color,
                });
            }
        }

        let sum_label = format!("= {}", self.grid.magic_constant());
        for (r, row) in self.grid.rows().iter().enumerate() {
            let state = stages::reveal_row(t, p, r);
            if state.opacity <= 0.0 {
                continue;
            }
            if state.highlighted {
                ops.push(DrawOp::Rect {
                    rect: l.row_band(r),
                    color: pal.highlight.fade(0.1),
                });
            }
            for (c, value) in row.iter().enumerate() {
                let cell = stages::reveal_cell(t, p, r, c);
                if cell.progress <= 0.0 {
                    continue;
                }
                let color = if r == 0 {
                    pal.highlight
                } else if state.phase == RowPhase::Completed {
                    pal.ink.fade(0.6)
                } else {
                    pal.ink
                };
                // Popping cells use the regular face at the scaled size.
                let (role, size) = if cell.scale > 1.0 {
                    (TextRole::Body, 0.35 * cell.scale)
                } else if r == 0 {
                    (TextRole::Bold, 0.4)
                } else {
                    (TextRole::Body, 0.35)
                };
                ops.push(DrawOp::Text {
                    text: value.to_string(),
                    role,
                    size_px: l.cell * size,
                    anchor: Point::new(l.col_center_x(c), l.row_center_y(r)),
                    align: TextAlign::Center,
                    baseline: TextBaseline::Middle,
                    color: color.fade(state.opacity * cell.progress),
                });
            }
            if state.show_sum {
                ops.push(DrawOp::Text {
                    text: sum_label.clone(),
                    role: TextRole::Bold,
                    size_px: l.cell * 0.25,
                    anchor: Point::new(l.right() + 40.0 * u, l.row_center_y(r)),
                    align: TextAlign::Center,
                    baseline: TextBaseline::Middle,
                    color: pal.highlight.fade(state.opacity),
                });
            }
        }
    }

    fn push_proof(&self, ops: &mut Vec<DrawOp>, proof: ProofState) {
        if proof.opacity <= 0.0 {
            return;
        }
        let l = &self.layout;
        let u = self.unit();
        let color = self.palette.highlight.fade(proof.opacity);
        if proof.columns {
            for c in 0..GRID_DIM {
                let x = l.col_center_x(c);
                ops.push(DrawOp::Line {
                    from: Point::new(x, l.origin.y),
                    to: Point::new(x, l.bottom()),
                    width: 2.0 * u,
                    color,
                });
                if proof.labels {
                    ops.push(DrawOp::Text {
                        text: format!("= {}", self.grid.magic_constant()),
                        role: TextRole::Bold,
                        size_px: l.cell * 0.25,
                        anchor: Point::new(x, l.bottom() + 30.0 * u),
                        align: TextAlign::Center,
                        baseline: TextBaseline::Middle,
                        color,
                    });
                }
            }
        }
        if proof.diagonals {
            ops.push(DrawOp::Line {
                from: l.origin,
                to: Point::new(l.right(), l.bottom()),
                width: 2.0 * u,
                color,
            });
            ops.push(DrawOp::Line {
                from: Point::new(l.right(), l.origin.y),
                to: Point::new(l.origin.x, l.bottom()),
                width: 2.0 * u,
                color,
            });
        }
    }

    fn push_finale(&self, ops: &mut Vec<DrawOp>, p: f64, finale: FinaleState) {
        let canvas = self.config.canvas;
        let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
        let side = canvas.min_side();
        let u = self.unit();
        let pal = &self.palette;

        if self.backdrop.is_ready() {
            ops.push(DrawOp::Backdrop {
                opacity: finale.image_alpha,
            });
            ops.push(DrawOp::VerticalGradient {
                y0: h / 2.0,
                y1: h,
                stops: vec![
                    (0.0, pal.shade.fade(0.0)),
                    (0.8, pal.shade.fade(0.8 * finale.image_alpha)),
                ],
            });
        }

        if self.config.effects.glitter {
            self.push_glitter(ops, p, finale, w, h);
        }
        if self.config.effects.floating_glyphs {
            self.push_floating_glyphs(ops, finale, w, h);
        }

        let alpha = finale.text_alpha;
        let dy = finale.text_rise * 30.0 * u;
        let cx = w / 2.0;
        let text = |text: String, role: TextRole, size_px: f64, y: f64, color: Rgba8| DrawOp::Text {
            text,
            role,
            size_px,
            anchor: Point::new(cx, y + dy),
            align: TextAlign::Center,
            baseline: TextBaseline::Middle,
            color: color.fade(alpha),
        };

        ops.push(text(self.wish.title(), TextRole::Title, side * 0.09, h * 0.55, pal.ink));
        for (i, line) in self.wish.message_lines().into_iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            ops.push(text(
                line.to_owned(),
                TextRole::Message,
                side * 0.04,
                h * 0.65 + i as f64 * 50.0 * u,
                pal.ink,
            ));
        }
        ops.push(text(self.wish.attribution(), TextRole::Bold, side * 0.03, h * 0.85, pal.highlight));
        if let Some(sender) = self.wish.sender_line() {
            ops.push(text(sender, TextRole::Body, side * 0.025, h * 0.85 + 36.0 * u, pal.ink));
        }
    }

    fn push_glitter(&self, ops: &mut Vec<DrawOp>, p: f64, finale: FinaleState, w: f64, h: f64) {
        const COUNT: u64 = 40;
        let u = self.unit();
        for i in 0..COUNT {
            let rate = 3.0 + 6.0 * hash_unit(self.seed, i, 12);
            let twinkle = 0.5 + 0.5 * (TAU * (p * rate + hash_unit(self.seed, i, 13))).sin();
            let base = if i % 3 == 0 {
                self.palette.highlight
            } else {
                Rgba8::WHITE
            };
            ops.push(DrawOp::Circle {
                center: Point::new(hash_unit(self.seed, i, 10) * w, hash_unit(self.seed, i, 11) * h),
                radius: (1.0 + 2.0 * hash_unit(self.seed, i, 14)) * u,
                color: base.fade(twinkle * finale.text_alpha),
            });
        }
    }

    fn push_floating_glyphs(&self, ops: &mut Vec<DrawOp>, finale: FinaleState, w: f64, h: f64) {
        const COUNT: u64 = 10;
        let u = self.unit();
        for i in 0..COUNT {
            let speed = 0.3 + 0.7 * hash_unit(self.seed, i, 1);
            let lap = (hash_unit(self.seed, i, 2) + finale.progress * speed).fract();
            let spin = (hash_unit(self.seed, i, 4) - 0.5) * 2.0 * PI;
            ops.push(DrawOp::Star {
                center: Point::new(hash_unit(self.seed, i, 0) * w, h * (1.1 - 1.2 * lap)),
                outer: (8.0 + 10.0 * hash_unit(self.seed, i, 3)) * u,
                inner: (4.0 + 4.0 * hash_unit(self.seed, i, 3)) * u,
                points: 5,
                rotation: spin * finale.progress,
                color: Rgba8::from_hsla(hash_unit(self.seed, i, 5) * 360.0, 0.9, 0.7, 1.0)
                    .fade(0.8 * finale.text_alpha),
            });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/engine.rs"]
mod tests;
