//! Engine configuration

/// Analysis engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Length of the synthesized pink-noise stimulus in seconds
    pub stimulus_seconds: f32,

    /// Lower edge of the reported band in Hz
    pub band_min_hz: f32,

    /// Upper edge of the reported band in Hz
    pub band_max_hz: f32,

    /// Largest Welch segment size (power of two)
    pub max_segment_size: usize,

    /// Smallest Welch segment size accepted before reporting a short signal
    pub min_segment_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stimulus_seconds: 30.0,
            band_min_hz: 20.0,
            band_max_hz: 20000.0,
            max_segment_size: 65536,
            min_segment_size: 32,
        }
    }
}

impl EngineConfig {
    /// Same band and segment limits with a shorter stimulus
    pub fn with_stimulus_seconds(mut self, seconds: f32) -> Self {
        self.stimulus_seconds = seconds;
        self
    }
}
