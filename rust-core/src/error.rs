//! Error types for the analysis engine

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// A required buffer has no samples (e.g. "Music")
    #[error("{0} buffer is empty.")]
    EmptyInput(&'static str),

    #[error("Signal too short for spectral analysis ({length} samples, segment size {segment})")]
    SignalTooShort { length: usize, segment: usize },

    /// Paired estimation returned without the second PSD or cross spectrum
    #[error("Welch estimate is missing the paired spectra")]
    WelchPairIncomplete,

    #[error("FFT processing failed: {0}")]
    Transform(String),

    #[error("Unsupported smoothing '{0}' (expected 1/3, 1/6 or 1/12)")]
    InvalidSmoothing(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
