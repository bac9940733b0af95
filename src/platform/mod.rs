//! Platform abstraction for audio output
//!
//! Connects a tone to a playback backend (native CPAL today).

use crate::gen::tone::Tone;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Trait for platform-specific audio output implementations
pub trait AudioOutput {
    /// Open the output device and read its sample rate
    fn initialize(&mut self) -> Result<(), anyhow::Error>;

    /// Start the audio stream
    fn start(&mut self) -> Result<(), anyhow::Error>;

    /// Stop the audio stream
    fn stop(&mut self) -> Result<(), anyhow::Error>;

    /// Sample rate of the device, valid after `initialize`
    fn sample_rate(&self) -> u32;

    /// Check if the audio output is active
    fn is_active(&self) -> bool;
}

/// A tone shared between the control thread and the audio callback
#[derive(Clone)]
pub struct ToneEngine {
    tone: Arc<Mutex<Tone>>,
}

impl ToneEngine {
    pub fn new(tone: Tone) -> Self {
        Self {
            tone: Arc::new(Mutex::new(tone)),
        }
    }

    /// Shared handle for use with audio output
    pub fn tone(&self) -> Arc<Mutex<Tone>> {
        self.tone.clone()
    }

    /// Modify the tone (for live control)
    pub fn with_tone<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Tone) -> R,
    {
        f(&mut lock_tone(&self.tone))
    }
}

/// Lock a shared tone. A panic on another thread leaves the tone usable, so
/// poisoning is ignored.
pub(crate) fn lock_tone(tone: &Mutex<Tone>) -> MutexGuard<'_, Tone> {
    tone.lock().unwrap_or_else(PoisonError::into_inner)
}

// Platform-specific implementations
#[cfg(feature = "native")]
pub mod cpal_output;

// Re-export platform-specific types
#[cfg(feature = "native")]
pub use self::cpal_output::CpalOutput;
