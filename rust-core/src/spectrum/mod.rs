//! Spectral estimation and post-processing

pub mod fft;
pub mod welch;
pub mod postprocess;

pub use fft::FftEngine;
pub use welch::{WelchEstimate, WelchEstimator};
pub use postprocess::{
    amplitude_to_db, band_range, normalize_display_series, power_to_db,
    smooth_fractional_octave, Smoothing,
};
