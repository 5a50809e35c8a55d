//! Analysis engine: two-tier cached stimulus and playback analysis
//!
//! Each request resolves a base spectrum (signals only), then a smoothed
//! spectrum (base + smoothing width), and hands back fresh copies so callers
//! never alias cached arrays.

use super::cache::{fingerprint, CacheStats, FingerprintCache};
use super::messages::{
    AnalysisRequest, AnalysisResponse, ErrorResponse, PlaybackRequest, PlaybackResponse,
    StimulusRequest, StimulusResponse,
};
use super::pipeline::{NoiseSource, SpectralPipeline};
use super::spectra::{PlaybackSpectrum, SmoothSpectrum, Smoothed, StimulusSpectrum};
use crate::audio::AudioBuffer;
use crate::config::EngineConfig;
use crate::error::{AnalysisError, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::warn;

/// Counters of all cache tiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineCacheStats {
    pub stimulus_base: CacheStats,
    pub stimulus_smoothed: CacheStats,
    pub playback_base: CacheStats,
    pub playback_smoothed: CacheStats,
}

fn filter_key(filter: Option<&AudioBuffer>) -> String {
    filter.map_or_else(|| "none".to_string(), |f| fingerprint(&f.samples, f.sample_rate))
}

/// Frequency-response analysis engine
pub struct AnalysisEngine {
    pipeline: SpectralPipeline,
    stimulus_base: FingerprintCache<StimulusSpectrum>,
    stimulus_smoothed: FingerprintCache<Smoothed<StimulusSpectrum>>,
    playback_base: FingerprintCache<PlaybackSpectrum>,
    playback_smoothed: FingerprintCache<Smoothed<PlaybackSpectrum>>,
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl AnalysisEngine {
    /// Engine drawing a fresh pink-noise stimulus per session
    pub fn new(config: EngineConfig) -> Self {
        Self::with_noise_source(config, Box::new(StdRng::from_entropy()))
    }

    /// Engine with a reproducible stimulus
    pub fn seeded(config: EngineConfig, seed: u64) -> Self {
        Self::with_noise_source(config, Box::new(StdRng::seed_from_u64(seed)))
    }

    pub fn with_noise_source(config: EngineConfig, noise: NoiseSource) -> Self {
        Self {
            pipeline: SpectralPipeline::new(config, noise),
            stimulus_base: FingerprintCache::new("stimulus_base"),
            stimulus_smoothed: FingerprintCache::new("stimulus_smoothed"),
            playback_base: FingerprintCache::new("playback_base"),
            playback_smoothed: FingerprintCache::new("playback_smoothed"),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        self.pipeline.config()
    }

    /// Pink-noise analysis, optionally through a filter
    pub fn analyze_stimulus(&mut self, request: &StimulusRequest) -> Result<StimulusResponse> {
        let sample_rate = request.sample_rate;
        let filter = request.filter.as_ref();

        let base_key = format!("{}|{}", sample_rate, filter_key(filter));
        let smoothed_key = format!("{}|{}", base_key, request.smoothing);

        let base = self
            .stimulus_base
            .get_or_compute(&base_key, || self.pipeline.stimulus_spectrum(sample_rate, filter))?;
        let smoothed = self
            .stimulus_smoothed
            .get_or_compute(&smoothed_key, || Ok::<_, AnalysisError>(base.smoothed(request.smoothing)))?;

        Ok(stimulus_response(request.request_id, &smoothed))
    }

    /// Music analysis, optionally through a filter
    pub fn analyze_playback(&mut self, request: &PlaybackRequest) -> Result<PlaybackResponse> {
        let music = &request.music;
        if music.is_empty() {
            return Err(AnalysisError::EmptyInput("Music"));
        }

        let sample_rate = request.sample_rate;
        let filter = request.filter.as_ref();

        let base_key = format!(
            "{}|{}|{}",
            sample_rate,
            fingerprint(&music.samples, music.sample_rate),
            filter_key(filter)
        );
        let smoothed_key = format!("{}|{}", base_key, request.smoothing);

        let base = self
            .playback_base
            .get_or_compute(&base_key, || self.pipeline.playback_spectrum(sample_rate, music, filter))?;
        let smoothed = self
            .playback_smoothed
            .get_or_compute(&smoothed_key, || Ok::<_, AnalysisError>(base.smoothed(request.smoothing)))?;

        Ok(playback_response(request.request_id, &smoothed))
    }

    /// Run one request, turning failures into tagged error responses
    pub fn handle(&mut self, request: &AnalysisRequest) -> AnalysisResponse {
        let request_id = request.request_id();
        match request {
            AnalysisRequest::Stimulus(r) => match self.analyze_stimulus(r) {
                Ok(response) => AnalysisResponse::Stimulus(response),
                Err(e) => {
                    warn!(request_id, error = %e, "stimulus analysis failed");
                    AnalysisResponse::StimulusError(ErrorResponse { request_id, error: e.to_string() })
                }
            },
            AnalysisRequest::Playback(r) => match self.analyze_playback(r) {
                Ok(response) => AnalysisResponse::Playback(response),
                Err(e) => {
                    warn!(request_id, error = %e, "playback analysis failed");
                    AnalysisResponse::PlaybackError(ErrorResponse { request_id, error: e.to_string() })
                }
            },
        }
    }

    pub fn cache_stats(&self) -> EngineCacheStats {
        EngineCacheStats {
            stimulus_base: self.stimulus_base.stats(),
            stimulus_smoothed: self.stimulus_smoothed.stats(),
            playback_base: self.playback_base.stats(),
            playback_smoothed: self.playback_smoothed.stats(),
        }
    }

    /// Forget every cached spectrum (next stimulus request draws new noise)
    pub fn clear_caches(&mut self) {
        self.stimulus_base.clear();
        self.stimulus_smoothed.clear();
        self.playback_base.clear();
        self.playback_smoothed.clear();
    }
}

fn stimulus_response(request_id: u64, smoothed: &Arc<Smoothed<StimulusSpectrum>>) -> StimulusResponse {
    let s = &smoothed.spectrum;
    StimulusResponse {
        request_id,
        freqs: s.freqs.clone(),
        reference_db: s.reference_db.clone(),
        convolved_db: s.convolved_db.clone(),
        transfer_db: s.transfer_db.clone(),
        has_filter: s.has_filter,
        filter_label: s.filter_label.clone(),
    }
}

fn playback_response(request_id: u64, smoothed: &Arc<Smoothed<PlaybackSpectrum>>) -> PlaybackResponse {
    let s = &smoothed.spectrum;
    PlaybackResponse {
        request_id,
        freqs: s.freqs.clone(),
        dry_db: s.dry_db.clone(),
        wet_db: s.wet_db.clone(),
        has_filter: s.has_filter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::Smoothing;

    fn engine() -> AnalysisEngine {
        AnalysisEngine::seeded(EngineConfig::default().with_stimulus_seconds(2.0), 1)
    }

    fn stimulus(request_id: u64, smoothing: Smoothing, filter: Option<AudioBuffer>) -> StimulusRequest {
        StimulusRequest { request_id, sample_rate: 48000, smoothing, filter }
    }

    #[test]
    fn test_base_shared_across_smoothing() {
        let mut engine = engine();
        let filter = Some(AudioBuffer::new(vec![1.0, 0.5, 0.25], 48000, "ir"));

        for (i, smoothing) in Smoothing::ALL.into_iter().enumerate() {
            engine.analyze_stimulus(&stimulus(i as u64, smoothing, filter.clone())).unwrap();
        }

        let stats = engine.cache_stats();
        assert_eq!(stats.stimulus_base, CacheStats { hits: 2, misses: 1, entries: 1 });
        assert_eq!(stats.stimulus_smoothed, CacheStats { hits: 0, misses: 3, entries: 3 });
    }

    #[test]
    fn test_repeat_request_hits_both_tiers() {
        let mut engine = engine();
        let a = engine.analyze_stimulus(&stimulus(1, Smoothing::Third, None)).unwrap();
        let b = engine.analyze_stimulus(&stimulus(2, Smoothing::Third, None)).unwrap();

        assert_eq!(a.reference_db, b.reference_db);
        assert_eq!(b.request_id, 2);
        assert_eq!(engine.cache_stats().stimulus_smoothed.hits, 1);
    }

    #[test]
    fn test_distinct_filters_get_distinct_entries() {
        let mut engine = engine();
        let a = Some(AudioBuffer::new(vec![1.0, 0.2], 48000, "a"));
        let b = Some(AudioBuffer::new(vec![1.0, -0.2], 48000, "b"));

        engine.analyze_stimulus(&stimulus(1, Smoothing::Sixth, a)).unwrap();
        engine.analyze_stimulus(&stimulus(2, Smoothing::Sixth, b)).unwrap();

        assert_eq!(engine.cache_stats().stimulus_base.entries, 2);
    }

    #[test]
    fn test_responses_are_copies() {
        let mut engine = engine();
        let mut first = engine.analyze_stimulus(&stimulus(1, Smoothing::Twelfth, None)).unwrap();
        let pristine = first.reference_db.clone();
        first.reference_db.fill(0.0);

        let second = engine.analyze_stimulus(&stimulus(2, Smoothing::Twelfth, None)).unwrap();
        assert_eq!(second.reference_db, pristine);
    }

    #[test]
    fn test_failure_leaves_cache_untouched() {
        let mut engine = engine();
        let request = AnalysisRequest::Playback(PlaybackRequest {
            request_id: 77,
            sample_rate: 48000,
            smoothing: Smoothing::Third,
            music: AudioBuffer::new(vec![0.0; 10], 48000, "short"),
            filter: None,
        });

        let response = engine.handle(&request);
        assert!(matches!(response, AnalysisResponse::PlaybackError(_)));
        assert_eq!(response.request_id(), 77);
        assert_eq!(engine.cache_stats().playback_base.entries, 0);
    }

    #[test]
    fn test_clear_caches() {
        let mut engine = engine();
        engine.analyze_stimulus(&stimulus(1, Smoothing::Third, None)).unwrap();
        engine.clear_caches();

        assert_eq!(engine.cache_stats(), EngineCacheStats::default());
    }
}
