//! Spectrum result types
//!
//! Base spectra depend only on the analyzed signals; smoothed spectra add a
//! smoothing width on top. Both are immutable once cached.

use crate::spectrum::Smoothing;

/// Reference (and optionally filtered) spectrum of the pink-noise stimulus
#[derive(Debug, Clone, PartialEq)]
pub struct StimulusSpectrum {
    /// Ascending frequencies in Hz within the analysis band
    pub freqs: Vec<f32>,

    /// Stimulus PSD in dB
    pub reference_db: Vec<f32>,

    /// PSD of the stimulus convolved with the filter, in dB
    pub convolved_db: Option<Vec<f32>>,

    /// Transfer magnitude in dB
    pub transfer_db: Option<Vec<f32>>,

    pub has_filter: bool,
    pub filter_label: Option<String>,
}

/// Dry/wet spectrum of user-supplied music
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSpectrum {
    pub freqs: Vec<f32>,

    /// Music PSD in dB
    pub dry_db: Vec<f32>,

    /// PSD of the music convolved with the filter, in dB
    pub wet_db: Option<Vec<f32>>,

    pub has_filter: bool,
}

/// A spectrum after fractional-octave smoothing
#[derive(Debug, Clone, PartialEq)]
pub struct Smoothed<S> {
    pub smoothing: Smoothing,
    pub spectrum: S,
}

/// Spectra whose dB curves can be smoothed on their frequency axis
pub trait SmoothSpectrum: Sized {
    /// Smooth every dB curve, keeping the frequency axis and metadata
    fn smoothed(&self, smoothing: Smoothing) -> Smoothed<Self>;
}

fn smooth_curve(freqs: &[f32], db: &[f32], smoothing: Smoothing) -> Vec<f32> {
    crate::spectrum::smooth_fractional_octave(freqs, db, smoothing.fraction())
}

impl SmoothSpectrum for StimulusSpectrum {
    fn smoothed(&self, smoothing: Smoothing) -> Smoothed<Self> {
        let smooth = |db: &Vec<f32>| smooth_curve(&self.freqs, db, smoothing);
        Smoothed {
            smoothing,
            spectrum: StimulusSpectrum {
                freqs: self.freqs.clone(),
                reference_db: smooth(&self.reference_db),
                convolved_db: self.convolved_db.as_ref().map(smooth),
                transfer_db: self.transfer_db.as_ref().map(smooth),
                has_filter: self.has_filter,
                filter_label: self.filter_label.clone(),
            },
        }
    }
}

impl SmoothSpectrum for PlaybackSpectrum {
    fn smoothed(&self, smoothing: Smoothing) -> Smoothed<Self> {
        let smooth = |db: &Vec<f32>| smooth_curve(&self.freqs, db, smoothing);
        Smoothed {
            smoothing,
            spectrum: PlaybackSpectrum {
                freqs: self.freqs.clone(),
                dry_db: smooth(&self.dry_db),
                wet_db: self.wet_db.as_ref().map(smooth),
                has_filter: self.has_filter,
            },
        }
    }
}
