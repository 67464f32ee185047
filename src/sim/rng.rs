//! Seeded random source for cave generation
//!
//! PCG32 seeded from a single integer. The same seed yields the same stream
//! on every platform, which is what makes a seed replayable elsewhere.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Deterministic random source for one generator run
#[derive(Debug, Clone)]
pub struct CaveRng {
    seed: u64,
    rng: Pcg32,
}

impl CaveRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform value in [min, max); `min` if the range is empty
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        if min < max {
            self.rng.random_range(min..max)
        } else {
            min
        }
    }

    /// Fair coin flip
    pub fn coin(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }
}
