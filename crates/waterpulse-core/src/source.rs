//! Reading sources
//!
//! Producers of normalized water-quality readings. The simulated source
//! stands in for the sensor feed until the device streams real values.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geometry::clamp_unit;

/// Something that yields normalized readings in `[0, 1]`
pub trait ReadingSource: Send {
    /// Produce the next reading
    fn next_reading(&mut self) -> f64;
}

/// Uniformly random readings
pub struct SimulatedSource {
    rng: StdRng,
}

impl SimulatedSource {
    /// Seed from the OS entropy source
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sequence for tests and demos
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SimulatedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingSource for SimulatedSource {
    fn next_reading(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}

/// Replays a fixed list of readings, wrapping around at the end
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    readings: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    /// Create from a list of readings. Values are clamped into `[0, 1]`;
    /// an empty list yields zeros.
    pub fn new(readings: impl IntoIterator<Item = f64>) -> Self {
        Self {
            readings: readings.into_iter().map(clamp_unit).collect(),
            cursor: 0,
        }
    }

    /// How many readings have been produced
    pub fn produced(&self) -> usize {
        self.cursor
    }
}

impl ReadingSource for ScriptedSource {
    fn next_reading(&mut self) -> f64 {
        if self.readings.is_empty() {
            return 0.0;
        }
        let value = self.readings[self.cursor % self.readings.len()];
        self.cursor += 1;
        value
    }
}
