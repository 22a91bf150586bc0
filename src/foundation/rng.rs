use crate::foundation::math::Fnv1a64;

/// Small deterministic PRNG (xorshift64) for particle spawning.
///
/// Two generators built from the same seed yield the same sequence on every platform, which is
/// what lets the encode pass replay the live loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a generator from a seed; zero is remapped since xorshift never leaves it.
    pub fn new(seed: u64) -> Self {
        let mut h = Fnv1a64::new_default();
        h.write_u64(seed);
        let state = h.finish();
        Self {
            state: if state == 0 { 0x1234_5678_9ABC_DEF0 } else { state },
        }
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform value in `[min, max)`.
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next_f64()
    }

    /// Uniform index in `[0, n)`; `n == 0` yields `0`.
    pub fn index(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        (self.next_u64() % n as u64) as usize
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/rng.rs"]
mod tests;
