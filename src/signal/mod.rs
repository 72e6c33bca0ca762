//! Synthetic Signal Module
//!
//! Produces decibel readings for the simulated sensor. Two interchangeable
//! generators are provided:
//! - Uniform: independent integer readings
//! - Sine-walk: slowly drifting sine wave with a bounded random walk

mod sine_walk;
mod uniform;

pub use sine_walk::SineWalkGenerator;
pub use uniform::UniformGenerator;

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::str::FromStr;
use std::time::Duration;

/// Source of decibel readings
pub trait SignalGenerator: Send {
    /// Produce the next reading
    fn next_reading(&mut self) -> f64;

    /// Which variant this is
    fn kind(&self) -> SignalKind;
}

/// Available signal variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalKind {
    /// Integer readings drawn uniformly from 55..=65
    Uniform,
    /// Noisy sine wave bounded to 50.0..=80.0
    #[default]
    SineWalk,
}

impl SignalKind {
    /// Cycle period the variant was designed around
    pub fn default_interval(&self) -> Duration {
        match self {
            SignalKind::Uniform => Duration::from_millis(1000),
            SignalKind::SineWalk => Duration::from_millis(100),
        }
    }

    /// Build a generator seeded from OS entropy
    pub fn build(&self) -> Box<dyn SignalGenerator> {
        self.build_with_rng(StdRng::from_entropy())
    }

    /// Build a generator driven by the given RNG
    pub fn build_with_rng(&self, rng: StdRng) -> Box<dyn SignalGenerator> {
        match self {
            SignalKind::Uniform => Box::new(UniformGenerator::new(rng)),
            SignalKind::SineWalk => Box::new(SineWalkGenerator::new(rng)),
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalKind::Uniform => write!(f, "uniform"),
            SignalKind::SineWalk => write!(f, "sine"),
        }
    }
}

impl FromStr for SignalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" | "random" => Ok(SignalKind::Uniform),
            "sine" | "sine-walk" | "sine_walk" => Ok(SignalKind::SineWalk),
            other => Err(format!("unknown signal kind: {}", other)),
        }
    }
}
