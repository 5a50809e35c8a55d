//! FFT-based linear convolution
//!
//! Zero-pads both operands to the next power of two >= len(x) + len(h) - 1,
//! multiplies spectra and inverse-transforms. Plans are cached by size.
//! Complexity: O(N log N) vs O(N*M) for time-domain

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Forward/inverse plan pair for one transform size
struct PlanPair {
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
}

/// Full linear convolution with a size-indexed plan cache
pub struct FftConvolver {
    planner: FftPlanner<f32>,
    plans: HashMap<usize, PlanPair>,
}

impl Default for FftConvolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FftConvolver {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
            plans: HashMap::new(),
        }
    }

    fn plans_for(&mut self, fft_size: usize) -> (Arc<dyn Fft<f32>>, Arc<dyn Fft<f32>>) {
        let planner = &mut self.planner;
        let pair = self.plans.entry(fft_size).or_insert_with(|| PlanPair {
            forward: planner.plan_fft_forward(fft_size),
            inverse: planner.plan_fft_inverse(fft_size),
        });
        (Arc::clone(&pair.forward), Arc::clone(&pair.inverse))
    }

    /// Convolve `signal` with `ir`
    ///
    /// # Returns
    /// `signal.len() + ir.len() - 1` samples, or an empty vector if either
    /// operand is empty
    pub fn convolve(&mut self, signal: &[f32], ir: &[f32]) -> Vec<f32> {
        if signal.is_empty() || ir.is_empty() {
            return Vec::new();
        }

        let output_len = signal.len() + ir.len() - 1;
        let fft_size = output_len.next_power_of_two();
        let (fft, ifft) = self.plans_for(fft_size);
        debug!(output_len, fft_size, "fft convolution");

        // 1. Zero-pad both operands
        let mut x = vec![Complex::new(0.0f32, 0.0); fft_size];
        for (dst, &s) in x.iter_mut().zip(signal) {
            dst.re = s;
        }
        let mut h = vec![Complex::new(0.0f32, 0.0); fft_size];
        for (dst, &s) in h.iter_mut().zip(ir) {
            dst.re = s;
        }

        // 2. Forward transforms
        fft.process(&mut x);
        fft.process(&mut h);

        // 3. Multiply in frequency domain (convolution in time domain)
        for (a, b) in x.iter_mut().zip(h.iter()) {
            *a *= *b;
        }

        // 4. Inverse transform, 5. scale by 1/N (rustfft does not normalize)
        ifft.process(&mut x);
        let scale = 1.0 / fft_size as f32;

        x[..output_len].iter().map(|c| c.re * scale).collect()
    }

    /// Number of cached transform sizes
    pub fn cached_sizes(&self) -> usize {
        self.plans.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn direct(signal: &[f32], ir: &[f32]) -> Vec<f32> {
        let mut out = vec![0.0; signal.len() + ir.len() - 1];
        for (i, &s) in signal.iter().enumerate() {
            for (j, &h) in ir.iter().enumerate() {
                out[i + j] += s * h;
            }
        }
        out
    }

    #[test]
    fn test_impulse_response_recovered() {
        let h = vec![0.1, 0.2, 0.4, 0.2, 0.1];
        let mut input = vec![0.0; 32];
        input[0] = 1.0;

        let output = FftConvolver::new().convolve(&input, &h);

        assert_eq!(output.len(), 36);
        for (i, &expected) in h.iter().enumerate() {
            assert!((output[i] - expected).abs() < 1e-6,
                    "Mismatch at {}: {} vs {}", i, output[i], expected);
        }
    }

    #[test]
    fn test_unit_impulse_is_identity() {
        let signal: Vec<f32> = (0..1000).map(|i| (i as f32 * 0.01).sin()).collect();
        let output = FftConvolver::new().convolve(&signal, &[1.0]);

        assert_eq!(output.len(), signal.len());
        for (a, b) in output.iter().zip(&signal) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_matches_direct_convolution() {
        let signal: Vec<f32> = (0..300).map(|i| (i as f32 * 0.37).sin()).collect();
        let ir: Vec<f32> = (0..41).map(|i| (-(i as f32) / 8.0).exp()).collect();

        let fast = FftConvolver::new().convolve(&signal, &ir);
        let slow = direct(&signal, &ir);

        assert_eq!(fast.len(), slow.len());
        for i in 0..fast.len() {
            let diff = (fast[i] - slow[i]).abs();
            assert!(diff < 1e-4, "Mismatch at {}: diff = {}", i, diff);
        }
    }

    #[test]
    fn test_plans_cached_by_size() {
        let mut convolver = FftConvolver::new();
        convolver.convolve(&[1.0; 100], &[0.5; 10]);
        convolver.convolve(&[2.0; 90], &[0.5; 20]);
        assert_eq!(convolver.cached_sizes(), 1);

        convolver.convolve(&[1.0; 1000], &[0.5; 10]);
        assert_eq!(convolver.cached_sizes(), 2);
    }

    #[test]
    fn test_empty_operand() {
        let mut convolver = FftConvolver::new();
        assert!(convolver.convolve(&[], &[1.0]).is_empty());
        assert!(convolver.convolve(&[1.0], &[]).is_empty());
    }

    proptest! {
        #[test]
        fn prop_full_convolution_length(n in 1usize..600, m in 1usize..200) {
            let out = FftConvolver::new().convolve(&vec![0.5; n], &vec![0.25; m]);
            prop_assert_eq!(out.len(), n + m - 1);
        }
    }
}
