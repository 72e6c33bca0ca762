//! Uniform integer readings

use super::{SignalGenerator, SignalKind};
use decibel_shared::signal::{UNIFORM_MAX_DB, UNIFORM_MIN_DB};
use rand::rngs::StdRng;
use rand::Rng;

/// Independent integer readings in `UNIFORM_MIN_DB..=UNIFORM_MAX_DB`
pub struct UniformGenerator {
    rng: StdRng,
}

impl UniformGenerator {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }
}

impl SignalGenerator for UniformGenerator {
    fn next_reading(&mut self) -> f64 {
        self.rng.gen_range(UNIFORM_MIN_DB..=UNIFORM_MAX_DB) as f64
    }

    fn kind(&self) -> SignalKind {
        SignalKind::Uniform
    }
}
