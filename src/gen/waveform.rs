//! Fixed-point periodic waveforms
//!
//! Every sample function maps `(volume, period, phase)` to one signed sample
//! using integer arithmetic only. `phase` is a free-running tick counter; only
//! its position `phase % period` inside the current cycle matters.
//!
//! All sample functions require `period > 0` and panic otherwise.

use std::fmt;
use std::str::FromStr;

/// Fixed-point scale of the sine cubic coefficients
pub const SIN_CUBIC_SCALE: i32 = 10_000;

/// Cubic term, `pi/2 - 2` (-0.4292036732)
pub const SIN_CUBIC_A: i32 = -4292;
/// Square term, `3 - pi` (-0.1415926536)
pub const SIN_CUBIC_B: i32 = -1416;
/// Linear term, `pi/2` (1.570796327)
pub const SIN_CUBIC_C: i32 = 15708;

/// Largest volume whose sine still fits an `i16`.
///
/// Truncating the coefficients lets the cubic overshoot `volume` by up to 3.
pub const MAX_SINE_VOLUME: u16 = 32764;

/// Largest `volume * period` for which the sine terms stay inside `i32`
pub const MAX_SINE_VOLUME_PERIOD: u32 = 300_000_000;

/// Quarter sections per sine period
const SECTIONS: i32 = 4;

/// Log target for the per-sample diagnostic trace
pub const TRACE_TARGET: &str = "tickwave::trace";

/// Rising ramp from `-volume/2` towards `+volume/2`.
///
/// Emits a `trace` record with `(period, phase)` on [`TRACE_TARGET`]. Without a
/// logger installed this is a no-op.
///
/// # Panics
/// Panics if `period` is 0.
pub fn sawtooth(volume: u16, period: u16, phase: u32) -> i16 {
    log::trace!(target: TRACE_TARGET, "sawtooth {} {}", period, phase);
    let x = phase % u32::from(period);
    let ramp = x * u32::from(volume) / u32::from(period);
    (ramp as i32 - i32::from(volume / 2)) as i16
}

/// Piecewise-linear wave peaking at half the period.
///
/// # Panics
/// Panics if `period` is 0.
pub fn triangle(volume: u16, period: u16, phase: u32) -> i16 {
    let volume = u32::from(volume);
    let period = u32::from(period);
    let x = phase % period;

    // neither branch exceeds 65536 * volume, which fits in u32
    let ramp = if x < period / 2 {
        x * 2 * volume / period
    } else {
        (period - x) * 2 * volume / period
    };

    (ramp as i32 - (volume / 2) as i32) as i16
}

/// Square wave at a quarter of the volume.
///
/// A square sounds about twice as loud as the other shapes at the same peak,
/// so its peak is halved.
///
/// # Panics
/// Panics if `period` is 0.
pub fn square(volume: u16, period: u16, phase: u32) -> i16 {
    let level = (volume / 4) as i16;
    if phase % u32::from(period) < u32::from(period / 2) {
        level
    } else {
        -level
    }
}

/// Cubic approximation of a sine, peaking at `volume`.
///
/// The base curve `f(x) = ax^3 + bx^2 + cx` matches `sin(pi/2 * x)` at the
/// quarter boundaries: `f(0) = 0`, `f(1) = 1`, `f'(0) = pi/2`, `f'(1) = 0`.
/// Each quarter of the period is mirrored or translated onto the first one.
///
/// Intermediate terms stay inside `i32` while `volume * period` is at most
/// [`MAX_SINE_VOLUME_PERIOD`], and the result fits an `i16` up to
/// [`MAX_SINE_VOLUME`]. Past that the terms wrap in two's complement, the same
/// in every build profile, so the sample is distorted but never panics.
///
/// # Panics
/// Panics if `period` is 0.
pub fn sine(volume: u16, period: u16, phase: u32) -> i16 {
    let p = i32::from(period);
    let half = p / 2;
    let x = (phase % u32::from(period)) as i32;

    let value = match x * SECTIONS / p {
        0 => quarter_cubic(volume, p, x),
        // mirror into the first quarter
        1 => quarter_cubic(volume, p, half - x),
        // second half is the negated first half
        2 => quarter_cubic(volume, p, x - half).wrapping_neg(),
        3 => quarter_cubic(volume, p, half - (x - half)).wrapping_neg(),
        _ => unreachable!("x < period keeps the section below {SECTIONS}"),
    };

    value as i16
}

/// Frequency-modulated test tone.
///
/// A sine at [`detuned_period`] (7/5 of the period) is added to the phase of
/// the outer sine. Both sines share `volume`, so the [`MAX_SINE_VOLUME_PERIOD`]
/// envelope applies to `volume * detuned_period(period)` as well as to
/// `volume * period`.
///
/// # Panics
/// Panics if `period` is 0, or if `period * 7 / 5` wraps to 0 as a `u16`.
pub fn test(volume: u16, period: u16, phase: u32) -> i16 {
    let wobble = sine(volume, detuned_period(period), phase);
    sine(volume, period, phase.wrapping_add_signed(i32::from(wobble)))
}

/// Period of the modulating sine in [`test`], narrowed to `u16`.
///
/// Periods above 46810 wrap, and 46812 wraps to 0.
#[inline]
pub fn detuned_period(period: u16) -> u16 {
    (u32::from(period) * 7 / 5) as u16
}

/// Evaluates the scaled cubic on the first quarter.
///
/// Each `* x` is followed by `/ period` to keep the running product small.
/// This order is part of the output and must not be simplified. Products and
/// sums wrap like 32-bit C arithmetic.
#[inline]
fn quarter_cubic(volume: u16, period: i32, x: i32) -> i32 {
    let volume = i32::from(volume);
    let a = volume * SIN_CUBIC_A / SIN_CUBIC_SCALE;
    let b = volume * SIN_CUBIC_B / SIN_CUBIC_SCALE;
    let c = volume * SIN_CUBIC_C / SIN_CUBIC_SCALE;

    let cubic = (a * 4 * 4 * 4).wrapping_mul(x) / period;
    let cubic = cubic.wrapping_mul(x) / period;
    let cubic = cubic.wrapping_mul(x) / period;
    let square = (b * 4 * 4).wrapping_mul(x) / period;
    let square = square.wrapping_mul(x) / period;
    let linear = (c * 4).wrapping_mul(x) / period;

    cubic.wrapping_add(square).wrapping_add(linear)
}

/// Selectable waveform shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Waveform {
    Sawtooth,
    Triangle,
    Square,
    #[default]
    Sine,
    Test,
}

impl Waveform {
    pub const ALL: [Waveform; 5] = [
        Waveform::Sawtooth,
        Waveform::Triangle,
        Waveform::Square,
        Waveform::Sine,
        Waveform::Test,
    ];

    /// Sample this shape at `phase`
    #[inline]
    pub fn sample(self, volume: u16, period: u16, phase: u32) -> i16 {
        match self {
            Waveform::Sawtooth => sawtooth(volume, period, phase),
            Waveform::Triangle => triangle(volume, period, phase),
            Waveform::Square => square(volume, period, phase),
            Waveform::Sine => sine(volume, period, phase),
            Waveform::Test => test(volume, period, phase),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
            Waveform::Square => "square",
            Waveform::Sine => "sine",
            Waveform::Test => "test",
        }
    }

    /// Stable index used across the C ABI
    pub fn index(self) -> u32 {
        match self {
            Waveform::Sawtooth => 0,
            Waveform::Triangle => 1,
            Waveform::Square => 2,
            Waveform::Sine => 3,
            Waveform::Test => 4,
        }
    }

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Waveform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sawtooth" | "saw" => Ok(Waveform::Sawtooth),
            "triangle" | "tri" => Ok(Waveform::Triangle),
            "square" => Ok(Waveform::Square),
            "sine" | "sin" => Ok(Waveform::Sine),
            "test" => Ok(Waveform::Test),
            other => Err(anyhow::anyhow!(
                "Unknown waveform '{}', expected one of sawtooth, triangle, square, sine, test",
                other
            )),
        }
    }
}
