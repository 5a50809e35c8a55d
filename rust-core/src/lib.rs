//! FR Spectra - Frequency-Response Analysis Core
//! 
//! Pink-noise and music spectra, optionally through an impulse response,
//! with Welch estimation, fractional-octave smoothing and fingerprint caching.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![cfg_attr(feature = "python", allow(non_local_definitions))]

pub mod audio;
pub mod config;
pub mod engine;
pub mod error;
pub mod filters;
pub mod spectrum;
#[cfg(feature = "python")]
pub mod python_bindings;

pub use audio::AudioBuffer;
pub use config::EngineConfig;
pub use engine::{AnalysisEngine, AnalysisRequest, AnalysisResponse, AnalysisWorker};
pub use error::{AnalysisError, Result};
pub use spectrum::Smoothing;
