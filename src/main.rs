//! tickwave - play, bounce or dump fixed-point waveforms
//!
//! # Commands
//!
//! - `tickwave play` - Play a tone on the default output device
//! - `tickwave bounce` - Render a tone to a 16-bit mono WAV file
//! - `tickwave dump` - Print `phase sample` pairs
//!
//! # Usage
//!
//! ```bash
//! tickwave play --waveform triangle --frequency 220
//! tickwave bounce sine.wav --seconds 2 --sample-rate 8000
//! tickwave dump --waveform test --frequency 441 --count 200
//! ```

use std::io::{self, Write};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tickwave::gen::tone::{
    Tone, ToneConfig, DEFAULT_FREQUENCY_HZ, DEFAULT_SAMPLE_RATE, DEFAULT_VOLUME,
};
use tickwave::gen::waveform::Waveform;

/// Fixed-point waveform generator
#[derive(Parser)]
#[command(name = "tickwave")]
#[command(about = "Fixed-point waveform generator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a tone on the default output device
    Play(ToneArgs),

    /// Render a tone to a WAV file
    Bounce {
        /// Output WAV path
        output: std::path::PathBuf,

        /// Length in seconds
        #[arg(long, default_value_t = 2.0)]
        seconds: f32,

        #[command(flatten)]
        tone: ToneArgs,

        /// Sample rate of the file
        #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
        sample_rate: u32,
    },

    /// Print phase and sample for consecutive ticks
    Dump {
        /// Number of samples
        #[arg(long, default_value_t = 100)]
        count: u32,

        #[command(flatten)]
        tone: ToneArgs,

        /// Sample rate used to derive the period
        #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
        sample_rate: u32,
    },
}

#[derive(Args, Clone, Copy)]
struct ToneArgs {
    /// sawtooth, triangle, square, sine or test
    #[arg(long, short, default_value_t = Waveform::Sine)]
    waveform: Waveform,

    /// Tone frequency in Hz
    #[arg(long, short, default_value_t = DEFAULT_FREQUENCY_HZ)]
    frequency: f32,

    /// Amplitude scale; sine and test peak at this value
    #[arg(long, short, default_value_t = DEFAULT_VOLUME)]
    volume: u16,
}

impl ToneArgs {
    fn config(self, sample_rate: u32) -> ToneConfig {
        ToneConfig::new(sample_rate, self.frequency, self.volume, self.waveform)
    }
}

fn main() -> Result<()> {
    tickwave::utils::init_logger();

    match Cli::parse().command {
        Commands::Play(tone) => play(tone),
        Commands::Bounce {
            output,
            seconds,
            tone,
            sample_rate,
        } => bounce(tone.config(sample_rate), seconds, &output),
        Commands::Dump {
            count,
            tone,
            sample_rate,
        } => dump(tone.config(sample_rate), count),
    }
}

fn dump(config: ToneConfig, count: u32) -> Result<()> {
    let mut tone = Tone::new(config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for _ in 0..count {
        let phase = tone.phase();
        writeln!(out, "{} {}", phase, tone.tick())?;
    }
    Ok(())
}

#[cfg(feature = "bounce")]
fn bounce(config: ToneConfig, seconds: f32, output: &std::path::Path) -> Result<()> {
    let mut tone = Tone::new(config)?;
    let frames = tickwave::bounce::frames_for(config.sample_rate, seconds)?;
    tickwave::bounce::bounce_to_wav(&mut tone, frames, output)
}

#[cfg(not(feature = "bounce"))]
fn bounce(_config: ToneConfig, _seconds: f32, _output: &std::path::Path) -> Result<()> {
    anyhow::bail!("This build has no WAV support; rebuild with the 'bounce' feature")
}

#[cfg(feature = "native")]
const VOLUME_STEP: u16 = 1000;

#[cfg(feature = "native")]
fn play(args: ToneArgs) -> Result<()> {
    use std::io::BufRead;
    use tickwave::platform::{AudioOutput, CpalOutput, ToneEngine};

    let mut output = CpalOutput::new();
    output.initialize()?;

    let engine = ToneEngine::new(Tone::new(args.config(output.sample_rate()))?);
    output.create_stream_with_tone(engine.tone())?;
    output.start()?;

    print_help();

    // Main input loop
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match line.trim() {
            "q" => {
                println!("Quitting...");
                break;
            }
            step @ ("+" | "-") => {
                let result = engine.with_tone(|tone| {
                    let volume = tone.config().volume;
                    let volume = if step == "+" {
                        volume.saturating_add(VOLUME_STEP)
                    } else {
                        volume.saturating_sub(VOLUME_STEP)
                    };
                    tone.set_volume(volume).map(|()| volume)
                });
                match result {
                    Ok(volume) => println!("Volume {}", volume),
                    Err(err) => log::warn!("{:#}", err),
                }
            }
            other => match other.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) {
                Some(index) if index < Waveform::ALL.len() => {
                    let waveform = Waveform::ALL[index];
                    match engine.with_tone(|tone| tone.set_waveform(waveform)) {
                        Ok(()) => println!("Playing {}", waveform),
                        Err(err) => log::warn!("{:#}", err),
                    }
                }
                _ => print_help(),
            },
        }
    }

    output.stop()?;
    Ok(())
}

#[cfg(not(feature = "native"))]
fn play(_args: ToneArgs) -> Result<()> {
    anyhow::bail!("This build has no audio output; rebuild with the 'native' feature")
}

#[cfg(feature = "native")]
fn print_help() {
    let names: Vec<String> = Waveform::ALL
        .iter()
        .enumerate()
        .map(|(i, waveform)| format!("'{}' {}", i + 1, waveform))
        .collect();
    println!(
        "Press {} to switch waveform, '+'/'-' for volume, 'q' to quit",
        names.join(", ")
    );
}
