use super::{lock_tone, AudioOutput};
use crate::gen::tone::Tone;
use anyhow::anyhow;
use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    Device, FromSample, Sample, SizedSample, Stream, StreamConfig,
};
use std::sync::{Arc, Mutex};

pub struct CpalOutput {
    stream: Option<Stream>,
    device: Option<Device>,
    config: Option<StreamConfig>,
    sample_format: Option<cpal::SampleFormat>,
    sample_rate: u32,
    is_active: bool,
}

impl CpalOutput {
    pub fn new() -> Self {
        Self {
            stream: None,
            device: None,
            config: None,
            sample_format: None,
            sample_rate: crate::gen::tone::DEFAULT_SAMPLE_RATE,
            is_active: false,
        }
    }

    /// Create a stream that renders the shared tone
    pub fn create_stream_with_tone(&mut self, tone: Arc<Mutex<Tone>>) -> Result<(), anyhow::Error> {
        let device = self
            .device
            .as_ref()
            .ok_or_else(|| anyhow!("Device not initialized"))?;
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| anyhow!("Config not initialized"))?;
        let sample_format = self
            .sample_format
            .ok_or_else(|| anyhow!("Sample format not initialized"))?;

        let stream = match sample_format {
            cpal::SampleFormat::I8 => Self::make_stream::<i8>(device, config, tone)?,
            cpal::SampleFormat::I16 => Self::make_stream::<i16>(device, config, tone)?,
            cpal::SampleFormat::I32 => Self::make_stream::<i32>(device, config, tone)?,
            cpal::SampleFormat::I64 => Self::make_stream::<i64>(device, config, tone)?,
            cpal::SampleFormat::U8 => Self::make_stream::<u8>(device, config, tone)?,
            cpal::SampleFormat::U16 => Self::make_stream::<u16>(device, config, tone)?,
            cpal::SampleFormat::U32 => Self::make_stream::<u32>(device, config, tone)?,
            cpal::SampleFormat::U64 => Self::make_stream::<u64>(device, config, tone)?,
            cpal::SampleFormat::F32 => Self::make_stream::<f32>(device, config, tone)?,
            cpal::SampleFormat::F64 => Self::make_stream::<f64>(device, config, tone)?,
            sample_format => return Err(anyhow!("Unsupported sample format '{}'", sample_format)),
        };

        self.stream = Some(stream);
        Ok(())
    }

    /// Setup the CPAL host and device
    fn setup_host_device(&mut self) -> Result<(), anyhow::Error> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("Default output device is not available"))?;

        log::info!("Output device: {}", device.name()?);

        let config = device.default_output_config()?;
        log::info!("Default output config: {:?}", config);

        self.sample_rate = config.sample_rate().0;
        self.sample_format = Some(config.sample_format());
        self.device = Some(device);
        self.config = Some(config.into());

        Ok(())
    }

    /// Create a typed stream for the given sample format
    fn make_stream<T>(
        device: &Device,
        config: &StreamConfig,
        tone: Arc<Mutex<Tone>>,
    ) -> Result<Stream, anyhow::Error>
    where
        T: SizedSample + FromSample<i16>,
    {
        let num_channels = config.channels as usize;
        let err_fn = |err| log::error!("Error building output sound stream: {}", err);

        let stream = device.build_output_stream(
            config,
            move |output: &mut [T], _: &cpal::OutputCallbackInfo| {
                Self::process_frame(output, &tone, num_channels);
            },
            err_fn,
            None,
        )?;

        Ok(stream)
    }

    /// Fill one callback buffer, copying each sample to every channel
    fn process_frame<SampleType>(output: &mut [SampleType], tone: &Mutex<Tone>, num_channels: usize)
    where
        SampleType: Sample + FromSample<i16>,
    {
        // Lock the tone once for the entire buffer
        let mut tone = lock_tone(tone);

        for frame in output.chunks_mut(num_channels) {
            let value = SampleType::from_sample(tone.tick());
            for sample in frame.iter_mut() {
                *sample = value;
            }
        }
    }
}

impl Default for CpalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioOutput for CpalOutput {
    fn initialize(&mut self) -> Result<(), anyhow::Error> {
        self.setup_host_device()
    }

    fn start(&mut self) -> Result<(), anyhow::Error> {
        if let Some(stream) = &self.stream {
            stream.play()?;
            self.is_active = true;
            log::info!("Audio stream started at sample rate: {}", self.sample_rate);
        } else {
            return Err(anyhow!(
                "Stream not created. Call create_stream_with_tone first."
            ));
        }

        Ok(())
    }

    fn stop(&mut self) -> Result<(), anyhow::Error> {
        if let Some(stream) = &self.stream {
            stream.pause()?;
            self.is_active = false;
            log::info!("Audio stream stopped");
        }

        Ok(())
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gen::tone::ToneConfig;
    use crate::gen::waveform::{square, Waveform};

    #[test]
    fn test_process_frame_duplicates_channels() {
        let config = ToneConfig::new(8000, 800.0, 4000, Waveform::Square);
        let tone = Mutex::new(Tone::new(config).unwrap());

        let mut output = [0i16; 20];
        CpalOutput::process_frame(&mut output, &tone, 2);

        for (frame_index, frame) in output.chunks(2).enumerate() {
            let expected = square(4000, 10, frame_index as u32);
            assert_eq!(frame, [expected, expected]);
        }
        assert_eq!(lock_tone(&tone).phase(), 10);
    }

    #[test]
    fn test_start_requires_stream() {
        let mut output = CpalOutput::new();
        assert!(output.start().is_err());
        assert!(!output.is_active());
    }
}
