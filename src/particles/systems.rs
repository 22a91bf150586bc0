use std::f64::consts::TAU;

use crate::{
    assets::color::Rgba8,
    foundation::{
        core::{Canvas, Point, Rect, Vec2},
        rng::SeededRng,
    },
    particles::pool::{Particle, ParticlePool, PoolKind},
    timeline::{
        config::EffectFeatures, display::DrawOp, engine::REFERENCE_SIDE, stages::GRID_DIM,
    },
};

/// Most aura particles alive at once.
pub const AURA_CAP: usize = 60;
/// Aura particles emitted per step while below the cap.
pub const AURA_PER_STEP: usize = 2;
/// Size of the confetti burst.
pub const CONFETTI_BURST: usize = 100;
/// Size of each cracker burst.
pub const CRACKER_BURST: usize = 45;

/// Fixed inputs of the particle systems.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSettings {
    /// Canvas the particles live on.
    pub canvas: Canvas,
    /// Which pools may spawn.
    pub effects: EffectFeatures,
    /// Wish highlight colour.
    pub highlight: Rgba8,
    /// Progress at which confetti fires.
    pub confetti_gate: f64,
}

/// Per-step inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleStep {
    /// Frame progress.
    pub progress: f64,
    /// Rows whose reveal slice is over.
    pub rows_completed: [bool; GRID_DIM],
    /// Vertical centre of each row, where crackers launch.
    pub row_centers: [f64; GRID_DIM],
    /// Last known pointer position, if a pointer is attached.
    pub pointer: Option<Point>,
}

/// Live particle counts per pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParticleCounts {
    /// Aura pool size.
    pub aura: usize,
    /// Confetti pool size.
    pub confetti: usize,
    /// Crackers pool size.
    pub crackers: usize,
}

/// The three pools plus the one-shot bookkeeping that drives their bursts.
///
/// Owned by whoever drives the timeline; the live loop and the encode pass each hold their own.
#[derive(Clone, Debug)]
pub struct ParticleSystems {
    settings: ParticleSettings,
    seed: u64,
    unit: f64,
    rng: SeededRng,
    aura: ParticlePool,
    confetti: ParticlePool,
    crackers: ParticlePool,
    confetti_fired: bool,
    crackers_fired: u8,
}

impl ParticleSystems {
    /// Empty pools with a generator seeded from `seed`.
    ///
    /// Spawn sizes, offsets and speeds are tuned for an 800px canvas and scaled from there.
    pub fn new(seed: u64, settings: ParticleSettings) -> Self {
        let unit = settings.canvas.min_side() / REFERENCE_SIDE;
        Self {
            settings,
            seed,
            unit,
            rng: SeededRng::new(seed),
            aura: ParticlePool::scaled(PoolKind::Aura, unit),
            confetti: ParticlePool::scaled(PoolKind::Confetti, unit),
            crackers: ParticlePool::scaled(PoolKind::Crackers, unit),
            confetti_fired: false,
            crackers_fired: 0,
        }
    }

    /// Current pool sizes.
    pub fn counts(&self) -> ParticleCounts {
        ParticleCounts {
            aura: self.aura.len(),
            confetti: self.confetti.len(),
            crackers: self.crackers.len(),
        }
    }

    /// Pool of `kind`.
    pub fn pool(&self, kind: PoolKind) -> &ParticlePool {
        match kind {
            PoolKind::Aura => &self.aura,
            PoolKind::Confetti => &self.confetti,
            PoolKind::Crackers => &self.crackers,
        }
    }

    /// Spawn what the step calls for, then advance and cull every pool.
    pub fn advance(&mut self, step: &ParticleStep) {
        let fx = self.settings.effects;

        if fx.aura
            && let Some(at) = step.pointer
        {
            for _ in 0..AURA_PER_STEP {
                if self.aura.len() >= AURA_CAP {
                    break;
                }
                self.spawn_aura(at);
            }
        }

        if fx.confetti
            && !self.confetti_fired
            && step.progress >= self.settings.confetti_gate
            && self.confetti.is_empty()
        {
            self.confetti_fired = true;
            tracing::debug!(progress = step.progress, "confetti burst");
            for _ in 0..CONFETTI_BURST {
                self.spawn_confetti();
            }
        }

        if fx.crackers {
            for (row, &done) in step.rows_completed.iter().enumerate() {
                let bit = 1u8 << row;
                if done && self.crackers_fired & bit == 0 {
                    self.crackers_fired |= bit;
                    for _ in 0..CRACKER_BURST {
                        self.spawn_cracker(row, step.row_centers[row]);
                    }
                }
            }
        }

        self.aura.step();
        self.confetti.step();
        self.crackers.step();
    }

    /// Clear the burst pools and re-arm their triggers; the aura trail is kept.
    ///
    /// The generator is re-seeded so every loop replays the same bursts.
    pub fn reset_transient(&mut self) {
        self.confetti.clear();
        self.crackers.clear();
        self.confetti_fired = false;
        self.crackers_fired = 0;
        self.rng = SeededRng::new(self.seed);
    }

    /// Paint instructions for every live particle, aura first.
    pub fn draw_ops(&self) -> Vec<DrawOp> {
        let mut ops = Vec::with_capacity(self.aura.len() + self.confetti.len() + self.crackers.len());
        for p in self.aura.particles() {
            ops.push(DrawOp::Circle {
                center: p.pos,
                radius: p.radius * (0.5 + 0.5 * p.life),
                color: p.color.fade(p.life * 0.8),
            });
        }
        for p in self.crackers.particles() {
            ops.push(DrawOp::Circle {
                center: p.pos,
                radius: p.radius,
                color: p.color.fade(p.life),
            });
        }
        for p in self.confetti.particles() {
            ops.push(DrawOp::Rect {
                rect: Rect::from_center_size(p.pos, (p.radius * 1.2, p.radius * 2.0)),
                color: p.color.fade(p.life),
            });
        }
        ops
    }

    fn spawn_aura(&mut self, at: Point) {
        let u = self.unit;
        let jitter = Vec2::new(self.rng.range(-10.0, 10.0), self.rng.range(-10.0, 10.0)) * u;
        let angle = self.rng.range(0.0, TAU);
        let speed = self.rng.range(0.2, 1.2) * u;
        let tint = self.rng.range(0.0, 0.5);
        self.aura.spawn(Particle {
            pos: at + jitter,
            vel: Vec2::from_angle(angle) * speed,
            life: 1.0,
            radius: self.rng.range(2.0, 5.0) * u,
            color: self.settings.highlight.mix(Rgba8::WHITE, tint),
        });
    }

    fn spawn_confetti(&mut self) {
        let (w, h) = (
            f64::from(self.settings.canvas.width),
            f64::from(self.settings.canvas.height),
        );
        let origin = Point::new(w / 2.0, h * 0.6);
        let u = self.unit;
        let vel = Vec2::new(self.rng.range(-8.0, 8.0), self.rng.range(-14.0, -4.0)) * u;
        let hue = self.rng.range(0.0, 360.0);
        self.confetti.spawn(Particle {
            pos: origin,
            vel,
            life: 1.0,
            radius: self.rng.range(3.0, 6.0) * u,
            color: Rgba8::from_hsla(hue, 0.9, 0.6, 1.0),
        });
    }

    fn spawn_cracker(&mut self, row: usize, y: f64) {
        let w = f64::from(self.settings.canvas.width);
        // Even rows fire from the left edge, odd rows from the right.
        let (x, dir) = if row % 2 == 0 { (0.0, 1.0) } else { (w, -1.0) };
        let u = self.unit;
        let vel = Vec2::new(dir * self.rng.range(3.0, 10.0), self.rng.range(-6.0, 2.0)) * u;
        let color = if self.rng.next_f64() < 0.5 {
            self.settings.highlight
        } else {
            Rgba8::from_hsla(self.rng.range(30.0, 60.0), 1.0, 0.6, 1.0)
        };
        self.crackers.spawn(Particle {
            pos: Point::new(x, y + self.rng.range(-8.0, 8.0) * u),
            vel,
            life: 1.0,
            radius: self.rng.range(1.5, 3.5) * u,
            color,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/systems.rs"]
mod tests;
