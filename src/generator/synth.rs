use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    config::{GeneratorConfig, ValueRange},
    db::{models::round_one_decimal, Reading},
};

/// Draws uniformly distributed readings inside the configured ranges.
pub struct ReadingSynth {
    rng: StdRng,
    temperature: ValueRange,
    humidity: ValueRange,
}

impl ReadingSynth {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Reproducible sequence, for tests.
    pub fn seeded(config: &GeneratorConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GeneratorConfig, rng: StdRng) -> Self {
        Self {
            rng,
            temperature: config.temperature,
            humidity: config.humidity,
        }
    }

    pub fn next_reading(&mut self, timestamp: DateTime<Utc>) -> Reading {
        let temperature = sample(&mut self.rng, self.temperature);
        let humidity = sample(&mut self.rng, self.humidity);
        Reading::new(timestamp, temperature, humidity)
    }
}

// Rounding can step just outside the range, so clamp afterwards.
fn sample(rng: &mut StdRng, range: ValueRange) -> f64 {
    let raw = if range.min < range.max {
        rng.gen_range(range.min..=range.max)
    } else {
        range.min
    };
    round_one_decimal(raw).clamp(range.min, range.max)
}
