//! Pink noise stimulus (Voss-McCartney)
//!
//! Sixteen rows of white noise, each refreshed at half the rate of the
//! previous one, summed with one fresh white sample per output. The row
//! schedule follows the bits that change between consecutive counters.

use super::buffer::AudioBuffer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of Voss-McCartney rows
const NUM_ROWS: usize = 16;

const KEY_MASK: u32 = (1 << NUM_ROWS) - 1;

/// Pink noise generator over an injected random source
pub struct PinkNoiseGenerator<R: Rng> {
    rng: R,
}

impl PinkNoiseGenerator<StdRng> {
    /// Generator seeded from OS entropy (fresh draw per session)
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible generator for fixtures
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PinkNoiseGenerator<R> {
    /// Wrap a random source
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn white(&mut self) -> f32 {
        self.rng.gen_range(-1.0f32..=1.0)
    }

    /// Generate `floor(sample_rate * duration_seconds)` samples (at least one)
    pub fn generate_samples(&mut self, sample_rate: u32, duration_seconds: f32) -> Vec<f32> {
        let length = ((sample_rate as f64 * duration_seconds as f64).floor() as usize).max(1);

        let mut rows = [0.0f32; NUM_ROWS];
        let mut running_sum = 0.0f32;
        for row in rows.iter_mut() {
            *row = self.white();
            running_sum += *row;
        }

        let scale = 1.0 / (NUM_ROWS as f32 + 1.0);
        let mut samples = Vec::with_capacity(length);
        let mut key: u32 = 0;

        for _ in 0..length {
            let last_key = key;
            key = (key + 1) & KEY_MASK;
            let mut diff = (last_key ^ key) & KEY_MASK;

            while diff != 0 {
                let bit = diff.trailing_zeros() as usize;
                let value = self.white();
                running_sum += value - rows[bit];
                rows[bit] = value;
                diff &= diff - 1;
            }

            samples.push((running_sum + self.white()) * scale);
        }

        samples
    }

    /// Generate a labelled stimulus buffer
    pub fn generate(&mut self, sample_rate: u32, duration_seconds: f32) -> AudioBuffer {
        let samples = self.generate_samples(sample_rate, duration_seconds);
        AudioBuffer::new(samples, sample_rate, "Pink noise")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_and_range() {
        let mut generator = PinkNoiseGenerator::seeded(7);
        let buffer = generator.generate(48000, 0.5);

        assert_eq!(buffer.len(), 24000);
        assert_eq!(buffer.sample_rate, 48000);
        assert!(buffer.samples.iter().all(|s| s.abs() <= 1.0));
    }

    #[test]
    fn test_minimum_one_sample() {
        let mut generator = PinkNoiseGenerator::seeded(1);
        assert_eq!(generator.generate_samples(48000, 0.0).len(), 1);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = PinkNoiseGenerator::seeded(42).generate_samples(8000, 1.0);
        let b = PinkNoiseGenerator::seeded(42).generate_samples(8000, 1.0);
        let c = PinkNoiseGenerator::seeded(43).generate_samples(8000, 1.0);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_low_frequencies_dominate() {
        // 1/f power: a long moving average keeps far more energy than white noise would
        let samples = PinkNoiseGenerator::seeded(3).generate_samples(48000, 2.0);

        let total: f64 = samples.iter().map(|&s| (s as f64).powi(2)).sum::<f64>() / samples.len() as f64;
        let smoothed: Vec<f64> = samples
            .chunks(64)
            .map(|c| c.iter().map(|&s| s as f64).sum::<f64>() / c.len() as f64)
            .collect();
        let low: f64 = smoothed.iter().map(|s| s * s).sum::<f64>() / smoothed.len() as f64;

        // White noise would keep ~1/64 of its power after a 64-sample average
        assert!(low / total > 4.0 / 64.0, "low/total = {}", low / total);
    }
}
