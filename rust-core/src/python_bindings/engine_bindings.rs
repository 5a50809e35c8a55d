//! Python bindings for the analysis engine

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use numpy::{PyArray1, PyReadonlyArray1};
use crate::audio::AudioBuffer;
use crate::config::EngineConfig;
use crate::engine::{AnalysisEngine, PlaybackRequest, StimulusRequest};
use crate::spectrum::{normalize_display_series, Smoothing};

fn to_buffer(
    samples: Option<PyReadonlyArray1<f32>>,
    sample_rate: Option<u32>,
    label: Option<String>,
    default_rate: u32,
) -> PyResult<Option<AudioBuffer>> {
    let Some(samples) = samples else {
        return Ok(None);
    };
    Ok(Some(AudioBuffer::new(
        samples.as_slice()?.to_vec(),
        sample_rate.unwrap_or(default_rate),
        label.unwrap_or_default(),
    )))
}

fn parse_smoothing(smoothing: &str) -> PyResult<Smoothing> {
    smoothing
        .parse()
        .map_err(|e: crate::AnalysisError| PyValueError::new_err(e.to_string()))
}

/// Analysis engine exposed to Python
#[pyclass(name = "AnalysisEngine", unsendable)]
pub struct PyAnalysisEngine {
    engine: AnalysisEngine,
}

#[pymethods]
impl PyAnalysisEngine {
    /// Create a new engine
    ///
    /// Args:
    ///     stimulus_seconds: Pink-noise stimulus length
    ///     seed: Optional seed for a reproducible stimulus
    #[new]
    #[pyo3(signature = (stimulus_seconds=30.0, seed=None))]
    fn new(stimulus_seconds: f32, seed: Option<u64>) -> Self {
        let config = EngineConfig::default().with_stimulus_seconds(stimulus_seconds);
        let engine = match seed {
            Some(seed) => AnalysisEngine::seeded(config, seed),
            None => AnalysisEngine::new(config),
        };
        Self { engine }
    }

    /// Analyze the pink-noise stimulus, optionally through a filter
    ///
    /// Returns:
    ///     dict with freqs, reference_db, convolved_db, transfer_db,
    ///     has_filter, filter_label
    #[pyo3(signature = (sample_rate, smoothing="1/6", filter=None, filter_rate=None, filter_label=None, request_id=0))]
    fn analyze_stimulus<'py>(
        &mut self,
        py: Python<'py>,
        sample_rate: u32,
        smoothing: &str,
        filter: Option<PyReadonlyArray1<f32>>,
        filter_rate: Option<u32>,
        filter_label: Option<String>,
        request_id: u64,
    ) -> PyResult<&'py PyDict> {
        let request = StimulusRequest {
            request_id,
            sample_rate,
            smoothing: parse_smoothing(smoothing)?,
            filter: to_buffer(filter, filter_rate, filter_label, sample_rate)?,
        };
        let response = self
            .engine
            .analyze_stimulus(&request)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;

        let dict = PyDict::new(py);
        dict.set_item("request_id", response.request_id)?;
        dict.set_item("freqs", PyArray1::from_vec(py, response.freqs))?;
        dict.set_item("reference_db", PyArray1::from_vec(py, response.reference_db))?;
        dict.set_item("convolved_db", response.convolved_db.map(|v| PyArray1::from_vec(py, v)))?;
        dict.set_item("transfer_db", response.transfer_db.map(|v| PyArray1::from_vec(py, v)))?;
        dict.set_item("has_filter", response.has_filter)?;
        dict.set_item("filter_label", response.filter_label)?;
        Ok(dict)
    }

    /// Analyze a music buffer, optionally through a filter
    ///
    /// Returns:
    ///     dict with freqs, dry_db, wet_db, has_filter
    #[pyo3(signature = (sample_rate, music, music_rate, smoothing="1/6", filter=None, filter_rate=None, request_id=0))]
    fn analyze_playback<'py>(
        &mut self,
        py: Python<'py>,
        sample_rate: u32,
        music: PyReadonlyArray1<f32>,
        music_rate: u32,
        smoothing: &str,
        filter: Option<PyReadonlyArray1<f32>>,
        filter_rate: Option<u32>,
        request_id: u64,
    ) -> PyResult<&'py PyDict> {
        let request = PlaybackRequest {
            request_id,
            sample_rate,
            smoothing: parse_smoothing(smoothing)?,
            music: AudioBuffer::new(music.as_slice()?.to_vec(), music_rate, "music"),
            filter: to_buffer(filter, filter_rate, None, sample_rate)?,
        };
        let response = self
            .engine
            .analyze_playback(&request)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;

        let dict = PyDict::new(py);
        dict.set_item("request_id", response.request_id)?;
        dict.set_item("freqs", PyArray1::from_vec(py, response.freqs))?;
        dict.set_item("dry_db", PyArray1::from_vec(py, response.dry_db))?;
        dict.set_item("wet_db", response.wet_db.map(|v| PyArray1::from_vec(py, v)))?;
        dict.set_item("has_filter", response.has_filter)?;
        Ok(dict)
    }

    /// Drop all cached spectra
    fn clear_caches(&mut self) {
        self.engine.clear_caches();
    }
}

/// Shift dB series so the quietest finite value sits at 0 dB
#[pyfunction]
pub fn normalize_display(series: Vec<Vec<f32>>) -> Vec<Vec<f32>> {
    normalize_display_series(&series)
}
