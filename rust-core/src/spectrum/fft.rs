//! Real-input FFT engine using realfft
//!
//! Plans are created once per transform size and reused.

use crate::error::{AnalysisError, Result};
use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use std::collections::HashMap;
use std::sync::Arc;

/// Size-indexed real-to-complex FFT plans
pub struct FftEngine {
    planner: RealFftPlanner<f32>,
    plans: HashMap<usize, Arc<dyn RealToComplex<f32>>>,
}

impl Default for FftEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FftEngine {
    pub fn new() -> Self {
        Self {
            planner: RealFftPlanner::<f32>::new(),
            plans: HashMap::new(),
        }
    }

    /// Get (or plan) the forward transform for `fft_size`
    pub fn plan(&mut self, fft_size: usize) -> Arc<dyn RealToComplex<f32>> {
        let planner = &mut self.planner;
        Arc::clone(
            self.plans
                .entry(fft_size)
                .or_insert_with(|| planner.plan_fft_forward(fft_size)),
        )
    }

    /// Forward transform of `input` into `output`
    ///
    /// `input` is used as scratch space and is overwritten. `output` must hold
    /// `input.len() / 2 + 1` bins.
    pub fn forward(&mut self, input: &mut [f32], output: &mut [Complex<f32>]) -> Result<()> {
        let r2c = self.plan(input.len());
        r2c.process(input, output)
            .map_err(|e| AnalysisError::Transform(e.to_string()))
    }

    /// Number of bins for a real transform of `fft_size` samples
    pub fn num_bins(fft_size: usize) -> usize {
        fft_size / 2 + 1
    }

    /// Bin center frequencies in Hz: k * sample_rate / fft_size
    pub fn frequency_axis_hz(fft_size: usize, sample_rate: u32) -> Vec<f32> {
        let bin_width = sample_rate as f64 / fft_size as f64;
        (0..Self::num_bins(fft_size))
            .map(|k| (k as f64 * bin_width) as f32)
            .collect()
    }

    /// Number of cached plans
    pub fn cached_sizes(&self) -> usize {
        self.plans.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_fft_dc_signal() {
        let mut fft = FftEngine::new();

        let mut signal = vec![0.0; 1024];
        signal[..100].fill(1.0);
        let mut spectrum = vec![Complex::new(0.0, 0.0); FftEngine::num_bins(1024)];
        fft.forward(&mut signal, &mut spectrum).unwrap();

        // DC bin holds the sum of the samples
        assert!((spectrum[0].norm() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_fft_sine_wave() {
        let mut fft = FftEngine::new();

        // Bin-centered sine at bin 64
        let mut signal: Vec<f32> = (0..1024)
            .map(|n| (2.0 * PI * 64.0 * n as f32 / 1024.0).sin())
            .collect();
        let mut spectrum = vec![Complex::new(0.0, 0.0); 513];
        fft.forward(&mut signal, &mut spectrum).unwrap();

        let (peak_bin, peak) = spectrum
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.norm().partial_cmp(&b.norm()).unwrap())
            .unwrap();

        assert_eq!(peak_bin, 64);
        // Peak magnitude is N/2 for a unit sine
        assert!((peak.norm() - 512.0).abs() < 1.0);
    }

    #[test]
    fn test_frequency_axis() {
        let freqs = FftEngine::frequency_axis_hz(1024, 48000);

        assert_eq!(freqs.len(), 513);
        assert_eq!(freqs[0], 0.0);
        assert!((freqs[512] - 24000.0).abs() < 1e-3);
    }

    #[test]
    fn test_wrong_output_length_is_error() {
        let mut fft = FftEngine::new();
        let mut signal = vec![0.0; 64];
        let mut spectrum = vec![Complex::new(0.0, 0.0); 10];

        assert!(matches!(
            fft.forward(&mut signal, &mut spectrum),
            Err(AnalysisError::Transform(_))
        ));
    }
}
