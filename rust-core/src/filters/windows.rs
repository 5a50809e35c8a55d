//! Hann window coefficients and a size-indexed window cache

use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::Arc;

/// Generate Hann window coefficients
///
/// w[n] = 0.5 - 0.5*cos(2πn/(M-1)) for n = 0..M-1
pub fn hann_window(length: usize) -> Vec<f32> {
    if length <= 1 {
        return vec![1.0; length];
    }

    let m = length as f64;
    (0..length)
        .map(|n| {
            let angle = 2.0 * PI * n as f64 / (m - 1.0);
            (0.5 - 0.5 * angle.cos()) as f32
        })
        .collect()
}

/// Window coefficients with their mean squared value
#[derive(Debug)]
pub struct Window {
    pub coefficients: Vec<f32>,

    /// mean(w[n]^2), the PSD normalization term
    pub power: f32,
}

impl Window {
    /// Build a Hann window of the given length
    pub fn hann(length: usize) -> Self {
        let coefficients = hann_window(length);
        let power = if length == 0 {
            0.0
        } else {
            let sum_sq: f64 = coefficients.iter().map(|&w| (w as f64) * (w as f64)).sum();
            (sum_sq / length as f64) as f32
        };

        Self { coefficients, power }
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }
}

/// Hann windows computed once per size
#[derive(Debug, Default)]
pub struct WindowCache {
    windows: HashMap<usize, Arc<Window>>,
}

impl WindowCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or build) the Hann window of `length`
    pub fn hann(&mut self, length: usize) -> Arc<Window> {
        Arc::clone(
            self.windows
                .entry(length)
                .or_insert_with(|| Arc::new(Window::hann(length))),
        )
    }

    /// Number of cached sizes
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_shape() {
        let length = 161;
        let window = hann_window(length);

        assert_eq!(window.len(), length);
        assert!(window[0].abs() < 1e-7);
        assert!((window[0] - window[length - 1]).abs() < 1e-7);
        assert!((window[length / 2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_hann_power() {
        // mean(w^2) of a Hann window tends to 3/8
        let window = Window::hann(65536);
        assert!((window.power - 0.375).abs() < 1e-3);
    }

    #[test]
    fn test_cache_reuses_windows() {
        let mut cache = WindowCache::new();
        let a = cache.hann(1024);
        let b = cache.hann(1024);
        let c = cache.hann(2048);

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(c.len(), 2048);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_degenerate_lengths() {
        assert!(hann_window(0).is_empty());
        assert_eq!(hann_window(1), vec![1.0]);
    }
}
