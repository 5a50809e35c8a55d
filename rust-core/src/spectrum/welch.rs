//! Welch PSD and cross-spectral estimation
//!
//! Hann-windowed segments with 50% overlap, averaged periodograms.
//! With a second signal the cross spectrum Sxy = conj(X)·Y is accumulated
//! as well and the transfer magnitude |Sxy| / Sxx is reported.

use super::fft::FftEngine;
use crate::audio::level::EPS;
use crate::error::{AnalysisError, Result};
use crate::filters::windows::WindowCache;
use num_complex::Complex;
use tracing::debug;

/// Default largest segment size
pub const MAX_SEGMENT_SIZE: usize = 65536;

/// Default smallest usable segment size
pub const MIN_SEGMENT_SIZE: usize = 32;

/// Result of a Welch estimate
#[derive(Debug, Clone, PartialEq)]
pub struct WelchEstimate {
    /// Bin frequencies in Hz, 0..=sample_rate/2
    pub freqs: Vec<f32>,

    /// Auto spectrum of the first signal
    pub psd_x: Vec<f32>,

    /// Auto spectrum of the second signal (paired estimation only)
    pub psd_y: Option<Vec<f32>>,

    /// |Sxy| / Sxx (paired estimation only)
    pub transfer: Option<Vec<f32>>,

    pub segment_size: usize,
    pub num_segments: usize,
}

/// Largest power of two <= n (n >= 1)
fn prev_power_of_two(n: usize) -> usize {
    1 << (usize::BITS - 1 - n.leading_zeros())
}

/// Welch estimator owning its window and FFT plan caches
pub struct WelchEstimator {
    max_segment: usize,
    min_segment: usize,
    windows: WindowCache,
    fft: FftEngine,
}

impl Default for WelchEstimator {
    fn default() -> Self {
        Self::new(MAX_SEGMENT_SIZE, MIN_SEGMENT_SIZE)
    }
}

impl WelchEstimator {
    /// Create an estimator with the given segment size limits
    pub fn new(max_segment: usize, min_segment: usize) -> Self {
        Self {
            max_segment: max_segment.max(1),
            min_segment,
            windows: WindowCache::new(),
            fft: FftEngine::new(),
        }
    }

    /// Segment size used for a signal of `length` samples
    pub fn segment_size(&self, length: usize) -> Result<usize> {
        if length < 2 {
            return Err(AnalysisError::SignalTooShort { length, segment: 0 });
        }
        let segment = prev_power_of_two(length.min(self.max_segment));
        if segment < self.min_segment {
            return Err(AnalysisError::SignalTooShort { length, segment });
        }
        Ok(segment)
    }

    /// Estimate the PSD of `x`, and optionally of `y` with the transfer magnitude
    pub fn estimate(&mut self, x: &[f32], y: Option<&[f32]>, sample_rate: u32) -> Result<WelchEstimate> {
        let segment = self.segment_size(x.len())?;
        if let Some(y) = y {
            if y.len() < segment {
                return Err(AnalysisError::SignalTooShort { length: y.len(), segment });
            }
        }

        let length = y.map_or(x.len(), |y| x.len().min(y.len()));
        let step = (segment / 2).max(1);
        let num_segments = (length - segment) / step + 1;
        let num_bins = FftEngine::num_bins(segment);
        debug!(segment, step, num_segments, paired = y.is_some(), "welch estimate");

        let window = self.windows.hann(segment);

        let mut psd_x = vec![0.0f64; num_bins];
        let mut psd_y = vec![0.0f64; if y.is_some() { num_bins } else { 0 }];
        let mut cross_re = psd_y.clone();
        let mut cross_im = psd_y.clone();

        let mut x_frame = vec![0.0f32; segment];
        let mut y_frame = vec![0.0f32; segment];
        let mut x_spec = vec![Complex::new(0.0f32, 0.0); num_bins];
        let mut y_spec = vec![Complex::new(0.0f32, 0.0); num_bins];

        for s in 0..num_segments {
            let start = s * step;
            let range = start..start + segment;

            for ((dst, &v), &w) in x_frame.iter_mut().zip(&x[range.clone()]).zip(&window.coefficients) {
                *dst = v * w;
            }
            self.fft.forward(&mut x_frame, &mut x_spec)?;

            for (acc, c) in psd_x.iter_mut().zip(&x_spec) {
                *acc += c.norm_sqr() as f64;
            }

            if let Some(y) = y {
                for ((dst, &v), &w) in y_frame.iter_mut().zip(&y[range]).zip(&window.coefficients) {
                    *dst = v * w;
                }
                self.fft.forward(&mut y_frame, &mut y_spec)?;

                for k in 0..num_bins {
                    let (xr, xi) = (x_spec[k].re as f64, x_spec[k].im as f64);
                    let (yr, yi) = (y_spec[k].re as f64, y_spec[k].im as f64);
                    psd_y[k] += yr * yr + yi * yi;
                    cross_re[k] += xr * yr + xi * yi;
                    cross_im[k] += yi * xr - yr * xi;
                }
            }
        }

        let scale = 1.0 / (window.power as f64 * num_segments as f64 * segment as f64);
        let finish = |acc: &[f64]| -> Vec<f32> { acc.iter().map(|&v| (v * scale) as f32).collect() };

        let freqs = FftEngine::frequency_axis_hz(segment, sample_rate);
        let psd_x_out = finish(&psd_x);

        let (psd_y_out, transfer) = if y.is_some() {
            let transfer = (0..num_bins)
                .map(|k| {
                    let cross = (cross_re[k] * scale).hypot(cross_im[k] * scale);
                    (cross / (psd_x[k] * scale + EPS as f64)) as f32
                })
                .collect();
            (Some(finish(&psd_y)), Some(transfer))
        } else {
            (None, None)
        };

        Ok(WelchEstimate {
            freqs,
            psd_x: psd_x_out,
            psd_y: psd_y_out,
            transfer,
            segment_size: segment,
            num_segments,
        })
    }
}
