//! Sine-walk readings
//!
//! A sine wave around `BASE_DB` whose amplitude, frequency and phase are
//! redrawn every `RERANDOMIZE_EVERY` ticks, plus a small random walk. The
//! result is clamped to `MIN_DB..=MAX_DB` and rounded to one decimal.

use super::{SignalGenerator, SignalKind};
use decibel_shared::signal::{
    BASE_DB, MAX_DB, MIN_DB, OFFSET_BOUND, OFFSET_STEP, RERANDOMIZE_EVERY,
};
use rand::rngs::StdRng;
use rand::Rng;
use std::f64::consts::TAU;

/// Current sine parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineParams {
    /// Peak deviation, in [10, 20)
    pub amplitude: f64,
    /// Ticks per radian, in [20, 60)
    pub frequency: f64,
    /// Phase offset in ticks, in [0, 2π)
    pub phase: f64,
}

impl SineParams {
    fn random(rng: &mut StdRng) -> Self {
        Self {
            amplitude: rng.gen_range(10.0..20.0),
            frequency: rng.gen_range(20.0..60.0),
            phase: rng.gen_range(0.0..TAU),
        }
    }

    fn sample(&self, tick: u64) -> f64 {
        self.amplitude * ((tick as f64 + self.phase) / self.frequency).sin()
    }
}

/// Noisy sine generator
pub struct SineWalkGenerator {
    rng: StdRng,
    params: SineParams,
    offset: f64,
    tick: u64,
}

impl SineWalkGenerator {
    pub fn new(mut rng: StdRng) -> Self {
        let params = SineParams::random(&mut rng);
        Self {
            rng,
            params,
            offset: 0.0,
            tick: 0,
        }
    }

    /// Parameters currently in effect
    #[cfg(test)]
    pub fn params(&self) -> SineParams {
        self.params
    }

    /// Current random-walk offset
    #[cfg(test)]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Number of readings produced so far
    #[cfg(test)]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    fn step_offset(&mut self) {
        let step = self.rng.gen_range(-OFFSET_STEP..OFFSET_STEP);
        self.offset = (self.offset + step).clamp(-OFFSET_BOUND, OFFSET_BOUND);
    }
}

impl SignalGenerator for SineWalkGenerator {
    fn next_reading(&mut self) -> f64 {
        if self.tick % RERANDOMIZE_EVERY == 0 {
            self.params = SineParams::random(&mut self.rng);
        }

        let sine = self.params.sample(self.tick);
        self.step_offset();

        let value = (BASE_DB + sine + self.offset).clamp(MIN_DB, MAX_DB);
        self.tick += 1;

        (value * 10.0).round() / 10.0
    }

    fn kind(&self) -> SignalKind {
        SignalKind::SineWalk
    }
}
