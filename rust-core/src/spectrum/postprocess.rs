//! Spectrum post-processing: band limiting, dB conversion, fractional-octave
//! smoothing and display normalization

use crate::audio::level::EPS;
use crate::error::AnalysisError;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Supported fractional-octave smoothing widths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Smoothing {
    /// 1/3 octave
    Third,
    /// 1/6 octave
    Sixth,
    /// 1/12 octave
    Twelfth,
}

impl Smoothing {
    pub const ALL: [Smoothing; 3] = [Smoothing::Third, Smoothing::Sixth, Smoothing::Twelfth];

    /// Octave divisions N (bandwidth = 1/N octave)
    pub fn fraction(self) -> f32 {
        match self {
            Smoothing::Third => 3.0,
            Smoothing::Sixth => 6.0,
            Smoothing::Twelfth => 12.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Smoothing::Third => "1/3",
            Smoothing::Sixth => "1/6",
            Smoothing::Twelfth => "1/12",
        }
    }
}

impl fmt::Display for Smoothing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Smoothing {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1/3" => Ok(Smoothing::Third),
            "1/6" => Ok(Smoothing::Sixth),
            "1/12" => Ok(Smoothing::Twelfth),
            other => Err(AnalysisError::InvalidSmoothing(other.to_string())),
        }
    }
}

/// Index range of `freqs` (ascending) that falls inside [min_hz, max_hz]
///
/// Empty when no frequency lies in the band.
pub fn band_range(freqs: &[f32], min_hz: f32, max_hz: f32) -> Range<usize> {
    let start = freqs.partition_point(|&f| f < min_hz);
    let end = freqs.partition_point(|&f| f <= max_hz);
    if start >= end {
        return 0..0;
    }
    start..end
}

/// Power quantity to dB: 10*log10(max(p, EPS))
pub fn power_to_db(power: &[f32]) -> Vec<f32> {
    power.iter().map(|&p| 10.0 * p.max(EPS).log10()).collect()
}

/// Amplitude quantity to dB: 20*log10(max(a, EPS))
pub fn amplitude_to_db(amplitude: &[f32]) -> Vec<f32> {
    amplitude.iter().map(|&a| 20.0 * a.max(EPS).log10()).collect()
}

/// Fractional-octave smoothing of a dB curve
///
/// Averages linear magnitudes over [f·2^(-1/2N), f·2^(1/2N)] around every
/// bin with a two-pointer running sum (one pass over the ascending axis).
/// `fraction <= 0` or empty input returns a copy.
pub fn smooth_fractional_octave(freqs: &[f32], db: &[f32], fraction: f32) -> Vec<f32> {
    let n = freqs.len().min(db.len());
    if fraction <= 0.0 || n == 0 {
        return db.to_vec();
    }

    let linear: Vec<f64> = db[..n].iter().map(|&v| 10f64.powf(v as f64 / 20.0)).collect();
    let half_width = 2f64.powf(0.5 / fraction as f64);

    let mut smoothed = Vec::with_capacity(n);
    let mut left = 0;
    let mut right = 0;
    let mut sum = 0.0f64;

    for i in 0..n {
        let center = freqs[i] as f64;
        let lo = center / half_width;
        let hi = center * half_width;

        while right < n && freqs[right] as f64 <= hi {
            sum += linear[right];
            right += 1;
        }
        while left < right && (freqs[left] as f64) < lo {
            sum -= linear[left];
            left += 1;
        }

        let count = right - left;
        if count == 0 {
            smoothed.push(db[i]);
            continue;
        }
        let mean = (sum / count as f64).max(EPS as f64);
        smoothed.push((20.0 * mean.log10()) as f32);
    }

    smoothed
}

/// Shift dB series for display
///
/// Subtracts the global finite peak, then offsets everything so the global
/// finite minimum lands at 0 dB, clamping below 0. Non-finite values become NaN.
pub fn normalize_display_series(series: &[Vec<f32>]) -> Vec<Vec<f32>> {
    let finite = || series.iter().flatten().copied().filter(|v| v.is_finite());

    let peak = finite().fold(f32::NEG_INFINITY, f32::max);
    let peak = if peak.is_finite() { peak } else { 0.0 };

    let min = finite().map(|v| v - peak).fold(f32::INFINITY, f32::min);
    let offset = if min.is_finite() { -min } else { 0.0 };

    series
        .iter()
        .map(|values| {
            values
                .iter()
                .map(|&v| {
                    if v.is_finite() {
                        (v - peak + offset).max(0.0)
                    } else {
                        f32::NAN
                    }
                })
                .collect()
        })
        .collect()
}
