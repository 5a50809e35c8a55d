//! Cached analysis engine and its request/response boundary

pub mod cache;
pub mod messages;
pub mod orchestrator;
pub mod pipeline;
pub mod spectra;
pub mod worker;

pub use cache::{fingerprint, hash_float_array, CacheStats, FingerprintCache};
pub use messages::{
    AnalysisRequest, AnalysisResponse, ErrorResponse, PlaybackRequest, PlaybackResponse,
    RequestId, StimulusRequest, StimulusResponse,
};
pub use orchestrator::{AnalysisEngine, EngineCacheStats};
pub use spectra::{PlaybackSpectrum, SmoothSpectrum, Smoothed, StimulusSpectrum};
pub use worker::AnalysisWorker;
