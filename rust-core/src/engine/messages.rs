//! Request/response messages with caller-supplied correlation ids

use crate::audio::AudioBuffer;
use crate::spectrum::Smoothing;

/// Caller-chosen correlation token
pub type RequestId = u64;

/// Pink-noise analysis request
#[derive(Debug, Clone, PartialEq)]
pub struct StimulusRequest {
    pub request_id: RequestId,
    pub sample_rate: u32,
    pub smoothing: Smoothing,
    pub filter: Option<AudioBuffer>,
}

/// Music analysis request
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackRequest {
    pub request_id: RequestId,
    pub sample_rate: u32,
    pub smoothing: Smoothing,
    pub music: AudioBuffer,
    pub filter: Option<AudioBuffer>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisRequest {
    Stimulus(StimulusRequest),
    Playback(PlaybackRequest),
}

impl AnalysisRequest {
    pub fn request_id(&self) -> RequestId {
        match self {
            AnalysisRequest::Stimulus(r) => r.request_id,
            AnalysisRequest::Playback(r) => r.request_id,
        }
    }
}

/// Smoothed stimulus spectra, owned by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct StimulusResponse {
    pub request_id: RequestId,
    pub freqs: Vec<f32>,
    pub reference_db: Vec<f32>,
    pub convolved_db: Option<Vec<f32>>,
    pub transfer_db: Option<Vec<f32>>,
    pub has_filter: bool,
    pub filter_label: Option<String>,
}

/// Smoothed playback spectra, owned by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackResponse {
    pub request_id: RequestId,
    pub freqs: Vec<f32>,
    pub dry_db: Vec<f32>,
    pub wet_db: Option<Vec<f32>>,
    pub has_filter: bool,
}

/// Failure of a single request
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub request_id: RequestId,
    pub error: String,
}

/// Response kinds; failures are tagged with the originating request type
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResponse {
    Stimulus(StimulusResponse),
    Playback(PlaybackResponse),
    StimulusError(ErrorResponse),
    PlaybackError(ErrorResponse),
}

impl AnalysisResponse {
    pub fn request_id(&self) -> RequestId {
        match self {
            AnalysisResponse::Stimulus(r) => r.request_id,
            AnalysisResponse::Playback(r) => r.request_id,
            AnalysisResponse::StimulusError(e) | AnalysisResponse::PlaybackError(e) => e.request_id,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            AnalysisResponse::StimulusError(_) | AnalysisResponse::PlaybackError(_)
        )
    }

    /// Error message of a failure response
    pub fn error(&self) -> Option<&str> {
        match self {
            AnalysisResponse::StimulusError(e) | AnalysisResponse::PlaybackError(e) => Some(&e.error),
            _ => None,
        }
    }
}
