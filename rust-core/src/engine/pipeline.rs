//! Base-spectrum computation
//!
//! Everything here is smoothing-independent: stimulus synthesis, filter
//! preparation, convolution, level matching, Welch estimation, band
//! limiting and dB conversion.

use super::spectra::{PlaybackSpectrum, StimulusSpectrum};
use crate::audio::{match_rms, normalize_impulse, resample, rms, AudioBuffer, PinkNoiseGenerator};
use crate::config::EngineConfig;
use crate::error::{AnalysisError, Result};
use crate::filters::FftConvolver;
use crate::spectrum::{amplitude_to_db, band_range, power_to_db, WelchEstimate, WelchEstimator};
use rand::RngCore;
use tracing::{info, warn};

/// Random source driving stimulus synthesis
pub type NoiseSource = Box<dyn RngCore + Send>;

/// Band-limited view of a Welch estimate
struct BandLimited {
    freqs: Vec<f32>,
    psd_x: Vec<f32>,
    psd_y: Option<Vec<f32>>,
    transfer: Option<Vec<f32>>,
}

/// DSP components shared by both analysis modes
pub struct SpectralPipeline {
    config: EngineConfig,
    welch: WelchEstimator,
    convolver: FftConvolver,
    noise: PinkNoiseGenerator<NoiseSource>,
}

impl SpectralPipeline {
    pub fn new(config: EngineConfig, noise: NoiseSource) -> Self {
        let welch = WelchEstimator::new(config.max_segment_size, config.min_segment_size);
        Self {
            config,
            welch,
            convolver: FftConvolver::new(),
            noise: PinkNoiseGenerator::new(noise),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resample a filter to `sample_rate` and scale it to unit energy
    fn prepare_filter(filter: &AudioBuffer, sample_rate: u32) -> Result<Vec<f32>> {
        if filter.is_empty() {
            return Err(AnalysisError::EmptyInput("Filter"));
        }
        let mut ir = resample(&filter.samples, filter.sample_rate, sample_rate);
        normalize_impulse(&mut ir);
        Ok(ir)
    }

    /// Convolve `dry` with `ir`, trim to the dry length and match its RMS
    fn apply_filter(&mut self, dry: &[f32], ir: &[f32]) -> Vec<f32> {
        let mut wet = self.convolver.convolve(dry, ir);
        wet.resize(dry.len(), 0.0);

        if match_rms(&mut wet, rms(dry)).is_none() {
            warn!("filtered signal is silent, level matching skipped");
        }
        wet
    }

    fn band_limit(&self, estimate: WelchEstimate) -> BandLimited {
        let range = band_range(&estimate.freqs, self.config.band_min_hz, self.config.band_max_hz);
        let slice = |v: Vec<f32>| v[range.clone()].to_vec();

        BandLimited {
            freqs: slice(estimate.freqs),
            psd_x: slice(estimate.psd_x),
            psd_y: estimate.psd_y.map(slice),
            transfer: estimate.transfer.map(slice),
        }
    }

    /// Estimate `dry` alone, or `dry` against its filtered version
    fn estimate(&mut self, dry: &[f32], wet: Option<&[f32]>, sample_rate: u32) -> Result<BandLimited> {
        let estimate = self.welch.estimate(dry, wet, sample_rate)?;
        let limited = self.band_limit(estimate);

        if wet.is_some() && limited.psd_y.is_none() {
            return Err(AnalysisError::WelchPairIncomplete);
        }
        Ok(limited)
    }

    /// Pink-noise reference spectrum, optionally through `filter`
    pub fn stimulus_spectrum(&mut self, sample_rate: u32, filter: Option<&AudioBuffer>) -> Result<StimulusSpectrum> {
        let stimulus = self.noise.generate_samples(sample_rate, self.config.stimulus_seconds);
        info!(sample_rate, samples = stimulus.len(), filtered = filter.is_some(), "computing stimulus spectrum");

        let Some(filter) = filter else {
            let limited = self.estimate(&stimulus, None, sample_rate)?;
            return Ok(StimulusSpectrum {
                reference_db: power_to_db(&limited.psd_x),
                freqs: limited.freqs,
                convolved_db: None,
                transfer_db: None,
                has_filter: false,
                filter_label: None,
            });
        };

        let ir = Self::prepare_filter(filter, sample_rate)?;
        let convolved = self.apply_filter(&stimulus, &ir);
        let limited = self.estimate(&stimulus, Some(convolved.as_slice()), sample_rate)?;

        let (psd_y, transfer) = limited
            .psd_y
            .zip(limited.transfer)
            .ok_or(AnalysisError::WelchPairIncomplete)?;

        Ok(StimulusSpectrum {
            reference_db: power_to_db(&limited.psd_x),
            convolved_db: Some(power_to_db(&psd_y)),
            transfer_db: Some(amplitude_to_db(&transfer)),
            freqs: limited.freqs,
            has_filter: true,
            filter_label: Some(filter.label.clone()),
        })
    }

    /// Dry/wet spectrum of `music`, optionally through `filter`
    pub fn playback_spectrum(
        &mut self,
        sample_rate: u32,
        music: &AudioBuffer,
        filter: Option<&AudioBuffer>,
    ) -> Result<PlaybackSpectrum> {
        if music.is_empty() {
            return Err(AnalysisError::EmptyInput("Music"));
        }

        let dry = resample(&music.samples, music.sample_rate, sample_rate);
        info!(sample_rate, samples = dry.len(), filtered = filter.is_some(), "computing playback spectrum");

        let wet = match filter {
            Some(filter) => {
                let ir = Self::prepare_filter(filter, sample_rate)?;
                Some(self.apply_filter(&dry, &ir))
            }
            None => None,
        };

        let limited = self.estimate(&dry, wet.as_deref(), sample_rate)?;

        Ok(PlaybackSpectrum {
            dry_db: power_to_db(&limited.psd_x),
            wet_db: limited.psd_y.as_deref().map(power_to_db),
            freqs: limited.freqs,
            has_filter: wet.is_some(),
        })
    }
}
