//! C FFI bindings for the waveform generator
//!
//! Exposes the sample functions and a tone handle to C firmware and hosts.
//! Nothing here unwinds across the boundary: a zero period yields a silent
//! sample, and invalid handles are ignored.

use crate::gen::tone::{Tone, ToneConfig};
use crate::gen::waveform::{self, Waveform};
use std::slice;

// =============================================================================
// Waveform indices (must match the C enum in firmware)
// =============================================================================

/// Waveform: rising sawtooth
pub const TICKWAVE_WAVEFORM_SAWTOOTH: u32 = 0;
/// Waveform: triangle
pub const TICKWAVE_WAVEFORM_TRIANGLE: u32 = 1;
/// Waveform: square at quarter volume
pub const TICKWAVE_WAVEFORM_SQUARE: u32 = 2;
/// Waveform: cubic sine
pub const TICKWAVE_WAVEFORM_SINE: u32 = 3;
/// Waveform: frequency-modulated test tone
pub const TICKWAVE_WAVEFORM_TEST: u32 = 4;

/// Opaque tone handle for FFI
pub struct TickwaveTone {
    tone: Tone,
}

// =============================================================================
// Stateless sample functions
// =============================================================================

/// Sawtooth sample. Returns 0 when `period` is 0.
#[no_mangle]
pub extern "C" fn tickwave_sawtooth(volume: u16, period: u16, phase: u32) -> i16 {
    if period == 0 {
        return 0;
    }
    waveform::sawtooth(volume, period, phase)
}

/// Triangle sample. Returns 0 when `period` is 0.
#[no_mangle]
pub extern "C" fn tickwave_triangle(volume: u16, period: u16, phase: u32) -> i16 {
    if period == 0 {
        return 0;
    }
    waveform::triangle(volume, period, phase)
}

/// Square sample. Returns 0 when `period` is 0.
#[no_mangle]
pub extern "C" fn tickwave_square(volume: u16, period: u16, phase: u32) -> i16 {
    if period == 0 {
        return 0;
    }
    waveform::square(volume, period, phase)
}

/// Cubic sine sample. Returns 0 when `period` is 0.
///
/// Past `volume * period == 300_000_000` the arithmetic wraps like 32-bit C.
#[no_mangle]
pub extern "C" fn tickwave_sine(volume: u16, period: u16, phase: u32) -> i16 {
    if period == 0 {
        return 0;
    }
    waveform::sine(volume, period, phase)
}

/// Frequency-modulated test sample. Returns 0 when either period is 0.
///
/// The modulator runs at 7/5 of `period`, so its product with `volume` wraps
/// first.
#[no_mangle]
pub extern "C" fn tickwave_test(volume: u16, period: u16, phase: u32) -> i16 {
    if period == 0 || waveform::detuned_period(period) == 0 {
        return 0;
    }
    waveform::test(volume, period, phase)
}

/// Sample any waveform by index (see `TICKWAVE_WAVEFORM_*`)
///
/// # Returns
/// The sample, or 0 for an unknown waveform or a zero period
#[no_mangle]
pub extern "C" fn tickwave_sample(waveform: u32, volume: u16, period: u16, phase: u32) -> i16 {
    match Waveform::from_index(waveform) {
        Some(Waveform::Sawtooth) => tickwave_sawtooth(volume, period, phase),
        Some(Waveform::Triangle) => tickwave_triangle(volume, period, phase),
        Some(Waveform::Square) => tickwave_square(volume, period, phase),
        Some(Waveform::Sine) => tickwave_sine(volume, period, phase),
        Some(Waveform::Test) => tickwave_test(volume, period, phase),
        None => 0,
    }
}

// =============================================================================
// Tone lifecycle
// =============================================================================

/// Create a tone
///
/// # Arguments
/// * `sample_rate` - Output sample rate in Hz (e.g., 8000 or 44100)
/// * `frequency_hz` - Tone frequency in Hz
/// * `volume` - Amplitude scale
/// * `waveform` - Waveform index (see `TICKWAVE_WAVEFORM_*`)
///
/// # Returns
/// Pointer to a new tone, or null if the configuration is invalid.
/// Must be freed with `tickwave_tone_free`.
#[no_mangle]
pub extern "C" fn tickwave_tone_new(
    sample_rate: u32,
    frequency_hz: f32,
    volume: u16,
    waveform: u32,
) -> *mut TickwaveTone {
    let Some(waveform) = Waveform::from_index(waveform) else {
        log::warn!("Unknown waveform index {}", waveform);
        return std::ptr::null_mut();
    };
    match Tone::new(ToneConfig::new(sample_rate, frequency_hz, volume, waveform)) {
        Ok(tone) => Box::into_raw(Box::new(TickwaveTone { tone })),
        Err(err) => {
            log::warn!("Rejected tone configuration: {:#}", err);
            std::ptr::null_mut()
        }
    }
}

/// Free a tone
///
/// # Safety
/// `tone` must be a valid pointer returned by `tickwave_tone_new`, or null.
/// After calling this function, the pointer is invalid and must not be used.
#[no_mangle]
pub unsafe extern "C" fn tickwave_tone_free(tone: *mut TickwaveTone) {
    if !tone.is_null() {
        drop(Box::from_raw(tone));
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Render consecutive samples into the provided buffer
///
/// # Arguments
/// * `tone` - Pointer to a TickwaveTone
/// * `buffer` - Pointer to an i16 buffer of at least `frames` samples
/// * `frames` - Number of samples to render
///
/// # Safety
/// - `tone` must be a valid pointer returned by `tickwave_tone_new`
/// - `buffer` must point to at least `frames` writable i16 values
#[no_mangle]
pub unsafe extern "C" fn tickwave_tone_render(
    tone: *mut TickwaveTone,
    buffer: *mut i16,
    frames: u32,
) {
    if tone.is_null() || buffer.is_null() {
        return;
    }

    let tone = &mut *tone;
    let buffer = slice::from_raw_parts_mut(buffer, frames as usize);
    tone.tone.render(buffer);
}

/// Restart the tone from phase 0
///
/// # Safety
/// `tone` must be a valid pointer returned by `tickwave_tone_new`
#[no_mangle]
pub unsafe extern "C" fn tickwave_tone_reset(tone: *mut TickwaveTone) {
    if let Some(tone) = tone.as_mut() {
        tone.tone.reset();
    }
}

// =============================================================================
// Parameters
// =============================================================================

/// Retune the tone
///
/// # Returns
/// true on success; false if the handle is null or the frequency is invalid,
/// in which case the tone is unchanged
///
/// # Safety
/// `tone` must be a valid pointer returned by `tickwave_tone_new`
#[no_mangle]
pub unsafe extern "C" fn tickwave_tone_set_frequency(
    tone: *mut TickwaveTone,
    frequency_hz: f32,
) -> bool {
    match tone.as_mut() {
        Some(tone) => tone.tone.set_frequency(frequency_hz).is_ok(),
        None => false,
    }
}

/// Set the tone volume
///
/// # Returns
/// false if the handle is null or the volume is too large for a sine-based
/// tone at its period, in which case the tone is unchanged
///
/// # Safety
/// `tone` must be a valid pointer returned by `tickwave_tone_new`
#[no_mangle]
pub unsafe extern "C" fn tickwave_tone_set_volume(tone: *mut TickwaveTone, volume: u16) -> bool {
    match tone.as_mut() {
        Some(tone) => tone.tone.set_volume(volume).is_ok(),
        None => false,
    }
}

/// Switch waveform (see `TICKWAVE_WAVEFORM_*`)
///
/// # Returns
/// false if the handle is null, the index is unknown, or the new shape
/// cannot run at the current period and volume
///
/// # Safety
/// `tone` must be a valid pointer returned by `tickwave_tone_new`
#[no_mangle]
pub unsafe extern "C" fn tickwave_tone_set_waveform(tone: *mut TickwaveTone, waveform: u32) -> bool {
    let Some(tone) = tone.as_mut() else {
        return false;
    };
    match Waveform::from_index(waveform) {
        Some(waveform) => tone.tone.set_waveform(waveform).is_ok(),
        None => false,
    }
}

/// Current phase counter of the tone, or 0 for a null handle
///
/// # Safety
/// `tone` must be a valid pointer returned by `tickwave_tone_new`
#[no_mangle]
pub unsafe extern "C" fn tickwave_tone_get_phase(tone: *const TickwaveTone) -> u32 {
    tone.as_ref().map_or(0, |tone| tone.tone.phase())
}

/// Period of the tone in samples, or 0 for a null handle
///
/// # Safety
/// `tone` must be a valid pointer returned by `tickwave_tone_new`
#[no_mangle]
pub unsafe extern "C" fn tickwave_tone_get_period(tone: *const TickwaveTone) -> u16 {
    tone.as_ref().map_or(0, |tone| tone.tone.period())
}

/// Get the number of waveforms
#[no_mangle]
pub extern "C" fn tickwave_waveform_count() -> u32 {
    Waveform::ALL.len() as u32
}
