use crate::{
    assets::color::Rgba8,
    foundation::core::{Point, Vec2},
};

/// Which pool a particle belongs to; decides physics and shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PoolKind {
    /// Pointer trail.
    Aura,
    /// One-shot celebratory burst.
    Confetti,
    /// Row-completion sparks.
    Crackers,
}

/// Per-step physics constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Physics {
    /// Added to vertical velocity each step.
    pub gravity: f64,
    /// Velocity multiplier each step.
    pub friction: f64,
    /// Life lost each step.
    pub decay: f64,
}

impl PoolKind {
    /// Physics of this pool.
    pub fn physics(self) -> Physics {
        match self {
            Self::Aura => Physics {
                gravity: 0.0,
                friction: 0.95,
                decay: 0.02,
            },
            Self::Confetti => Physics {
                gravity: 0.15,
                friction: 0.99,
                decay: 0.008,
            },
            Self::Crackers => Physics {
                gravity: 0.08,
                friction: 0.96,
                decay: 0.02,
            },
        }
    }
}

/// A single simulated particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Position in canvas pixels.
    pub pos: Point,
    /// Velocity in pixels per step.
    pub vel: Vec2,
    /// Remaining life in `(0, 1]`; also the paint opacity.
    pub life: f64,
    /// Radius (or half-size for confetti) in pixels.
    pub radius: f64,
    /// Base colour.
    pub color: Rgba8,
}

/// Ordered, growable set of particles sharing one physics model.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticlePool {
    kind: PoolKind,
    scale: f64,
    particles: Vec<Particle>,
}

impl ParticlePool {
    /// Empty pool of `kind` at the reference scale.
    pub fn new(kind: PoolKind) -> Self {
        Self::scaled(kind, 1.0)
    }

    /// Empty pool whose gravity is multiplied by `scale` (canvas side / 800).
    pub fn scaled(kind: PoolKind, scale: f64) -> Self {
        Self {
            kind,
            scale,
            particles: Vec::new(),
        }
    }

    /// Pool kind.
    pub fn kind(&self) -> PoolKind {
        self.kind
    }

    /// Live particles, oldest first.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of live particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// `true` when no particle is alive.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Append a particle.
    pub fn spawn(&mut self, p: Particle) {
        self.particles.push(p);
    }

    /// Drop every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Advance one step, then remove particles whose life ran out.
    pub fn step(&mut self) {
        let ph = self.kind.physics();
        for p in &mut self.particles {
            p.pos += p.vel;
            p.vel.y += ph.gravity * self.scale;
            p.vel *= ph.friction;
            p.life -= ph.decay;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/pool.rs"]
mod tests;
