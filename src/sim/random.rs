//! Injectable random source
//!
//! Simulation code never touches a global RNG. Production runs use a seeded
//! PCG stream; tests script exact draws.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform draws used by spawning and damage rolls
pub trait RandomSource {
    /// Uniform in [0, 1)
    fn next_f32(&mut self) -> f32;

    /// Uniform index in [0, len); `len` must be non-zero
    fn next_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        ((self.next_f32() * len as f32) as usize).min(len.saturating_sub(1))
    }
}

/// Seeded PCG stream
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: Pcg32,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f32(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

/// Replays a fixed list of draws, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    /// Values are clamped into [0, 1); an empty script always yields 0
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        let values = values
            .into()
            .into_iter()
            .map(|v| v.clamp(0.0, 0.999_999))
            .collect();
        Self { values, cursor: 0 }
    }

    /// Every draw returns `value`
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f32(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
