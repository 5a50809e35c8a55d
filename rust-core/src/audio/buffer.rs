//! Mono sample buffer handed to the engine

/// Mono audio buffer with its sample rate and a display label
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Samples, nominally in [-1, 1]
    pub samples: Vec<f32>,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Display label (file name, filter name, ...)
    pub label: String,
}

impl AudioBuffer {
    /// Create a new buffer
    pub fn new(samples: Vec<f32>, sample_rate: u32, label: impl Into<String>) -> Self {
        Self {
            samples,
            sample_rate,
            label: label.into(),
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}
