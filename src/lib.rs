//! Fixed-point waveform samples for embedded audio output
//!
//! The core in [`gen::waveform`] maps `(volume, period, phase)` to one `i16`
//! sample with integer arithmetic only. [`gen::tone`] adds a phase counter and
//! frequency-to-period conversion; the remaining modules connect tones to C,
//! WAV files and the native audio device.

pub mod ffi;
pub mod gen;

// Platform abstraction layer
pub mod platform;

#[cfg(feature = "bounce")]
pub mod bounce;

#[cfg(feature = "cli")]
pub mod utils;
