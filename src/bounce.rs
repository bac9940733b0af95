//! Offline bounce of a tone to a 16-bit mono WAV file

use crate::gen::tone::Tone;
use anyhow::{Context, Result};
use std::path::Path;

/// Frames rendered per block while bouncing
const BLOCK_FRAMES: usize = 512;

/// Number of frames covering `seconds` at `sample_rate`
pub fn frames_for(sample_rate: u32, seconds: f32) -> Result<usize> {
    if !seconds.is_finite() || seconds < 0.0 {
        anyhow::bail!("Duration must be a non-negative number of seconds, got {}", seconds);
    }
    Ok((f64::from(sample_rate) * f64::from(seconds)).round() as usize)
}

/// Render `frames` samples of `tone` into a WAV file at `path`.
///
/// The tone keeps its phase, so consecutive bounces continue the waveform.
pub fn bounce_to_wav(tone: &mut Tone, frames: usize, path: &Path) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: tone.config().sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let mut block = [0i16; BLOCK_FRAMES];
    let mut remaining = frames;
    while remaining > 0 {
        let n = remaining.min(BLOCK_FRAMES);
        tone.render(&mut block[..n]);
        for &sample in &block[..n] {
            writer.write_sample(sample)?;
        }
        remaining -= n;
    }

    writer
        .finalize()
        .with_context(|| format!("Failed to finalize {}", path.display()))?;

    log::info!(
        "Bounced {} frames of {} to {}",
        frames,
        tone.config().waveform,
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_for_duration() {
        assert_eq!(frames_for(44100, 1.0).unwrap(), 44100);
        assert_eq!(frames_for(8000, 0.25).unwrap(), 2000);
        assert_eq!(frames_for(8000, 0.0).unwrap(), 0);
        assert!(frames_for(8000, -1.0).is_err());
        assert!(frames_for(8000, f32::NAN).is_err());
    }
}
