//! Windows and FFT convolution

pub mod windows;
pub mod convolver;

pub use windows::{hann_window, Window, WindowCache};
pub use convolver::FftConvolver;
