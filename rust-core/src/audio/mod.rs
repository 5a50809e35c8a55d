//! Audio buffers, stimulus synthesis and level handling

pub mod buffer;
pub mod level;
pub mod noise;
pub mod resample;

pub use buffer::AudioBuffer;
pub use level::{match_rms, normalize_impulse, rms};
pub use noise::PinkNoiseGenerator;
pub use resample::resample;
