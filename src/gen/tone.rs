use crate::gen::waveform::{detuned_period, Waveform, MAX_SINE_VOLUME, MAX_SINE_VOLUME_PERIOD};
use anyhow::{bail, Result};

pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
pub const DEFAULT_FREQUENCY_HZ: f32 = 440.0;
pub const DEFAULT_VOLUME: u16 = 8000;

/// Tone parameters, converted to a period once at configuration time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneConfig {
    pub sample_rate: u32,
    pub frequency_hz: f32,
    /// Sine and test tones swing to `±volume`, the other shapes to `±volume/2`
    pub volume: u16,
    pub waveform: Waveform,
}

impl ToneConfig {
    pub fn new(sample_rate: u32, frequency_hz: f32, volume: u16, waveform: Waveform) -> Self {
        Self {
            sample_rate,
            frequency_hz,
            volume,
            waveform,
        }
    }

    /// Period in samples for this frequency.
    ///
    /// Also checks that every sample of the configured waveform can be
    /// computed at this period and volume.
    pub fn period(&self) -> Result<u16> {
        let period = period_for(self.sample_rate, self.frequency_hz)?;
        check_waveform(self.waveform, self.volume, period)?;
        Ok(period)
    }
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_SAMPLE_RATE,
            DEFAULT_FREQUENCY_HZ,
            DEFAULT_VOLUME,
            Waveform::default(),
        )
    }
}

/// Nearest whole number of samples per cycle.
///
/// Fails when the rate or frequency is not positive, or when the period falls
/// outside `1..=u16::MAX`.
pub fn period_for(sample_rate: u32, frequency_hz: f32) -> Result<u16> {
    if sample_rate == 0 {
        bail!("Sample rate must be positive");
    }
    if !frequency_hz.is_finite() || frequency_hz <= 0.0 {
        bail!("Frequency must be positive, got {} Hz", frequency_hz);
    }

    let period = (f64::from(sample_rate) / f64::from(frequency_hz)).round();
    if period < 1.0 {
        bail!(
            "Frequency {} Hz is above the {} Hz sample rate",
            frequency_hz,
            sample_rate
        );
    }
    if period > f64::from(u16::MAX) {
        bail!(
            "Frequency {} Hz is too low for the {} Hz sample rate (period {} > {})",
            frequency_hz,
            sample_rate,
            period,
            u16::MAX
        );
    }

    Ok(period as u16)
}

/// Rejects sine-based tones that would overflow or that the test tone
/// cannot modulate
fn check_waveform(waveform: Waveform, volume: u16, period: u16) -> Result<()> {
    let sine_period = match waveform {
        Waveform::Sine => period,
        Waveform::Test => {
            let detuned = detuned_period(period);
            if detuned == 0 {
                bail!("Test tone cannot run at a period of {} samples", period);
            }
            period.max(detuned)
        }
        _ => return Ok(()),
    };

    if volume > MAX_SINE_VOLUME {
        bail!(
            "Volume {} is above the {} limit of {}",
            volume,
            waveform,
            MAX_SINE_VOLUME
        );
    }
    if u32::from(volume) * u32::from(sine_period) > MAX_SINE_VOLUME_PERIOD {
        bail!(
            "Volume {} at a period of {} samples overflows the {} approximation",
            volume,
            sine_period,
            waveform
        );
    }
    Ok(())
}

/// A waveform with its own phase counter.
///
/// The period is derived from the frequency when the tone is configured, so
/// [`Tone::tick`] only does integer work.
#[derive(Debug, Clone)]
pub struct Tone {
    config: ToneConfig,
    period: u16,
    phase: u32,
}

impl Tone {
    pub fn new(config: ToneConfig) -> Result<Self> {
        let period = config.period()?;
        log::debug!(
            "{} tone at {} Hz: period {} samples, volume {}",
            config.waveform,
            config.frequency_hz,
            period,
            config.volume
        );

        Ok(Self {
            config,
            period,
            phase: 0,
        })
    }

    pub fn config(&self) -> &ToneConfig {
        &self.config
    }

    pub fn period(&self) -> u16 {
        self.period
    }

    pub fn phase(&self) -> u32 {
        self.phase
    }

    /// Sample at the current phase, then advance by one tick
    #[inline]
    pub fn tick(&mut self) -> i16 {
        let sample = self
            .config
            .waveform
            .sample(self.config.volume, self.period, self.phase);
        self.phase = self.phase.wrapping_add(1);
        sample
    }

    /// Fill `buffer` with consecutive samples
    pub fn render(&mut self, buffer: &mut [i16]) {
        for sample in buffer.iter_mut() {
            *sample = self.tick();
        }
    }

    /// Restart from phase 0
    pub fn reset(&mut self) {
        self.phase = 0;
    }

    /// Retune without resetting the phase. On error the tone is unchanged.
    pub fn set_frequency(&mut self, frequency_hz: f32) -> Result<()> {
        self.reconfigure(ToneConfig {
            frequency_hz,
            ..self.config
        })
    }

    /// On error the tone is unchanged.
    pub fn set_volume(&mut self, volume: u16) -> Result<()> {
        self.reconfigure(ToneConfig {
            volume,
            ..self.config
        })
    }

    /// Switch shape. On error the tone is unchanged.
    pub fn set_waveform(&mut self, waveform: Waveform) -> Result<()> {
        self.reconfigure(ToneConfig {
            waveform,
            ..self.config
        })
    }

    fn reconfigure(&mut self, config: ToneConfig) -> Result<()> {
        self.period = config.period()?;
        self.config = config;
        log::debug!(
            "{} tone now at {} Hz: period {}, volume {}",
            config.waveform,
            config.frequency_hz,
            self.period,
            config.volume
        );
        Ok(())
    }
}
