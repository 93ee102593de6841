//! # Voice Pitch - command line front end
//!
//! Records (or loads) a short voice clip, estimates its fundamental frequency
//! with `voice-core`, writes the sample and spectrum tables, and prints the
//! detected register.
//!
//! ## Acquisition order
//! - `--synthetic`: the built-in example voice
//! - `--input <file>`: a WAV file or raw 16-bit PCM
//! - otherwise: live recording from the default input device
//!
//! Any acquisition failure, and any clip that fails the silence gate, falls
//! back to the example voice so the analysis always runs.

mod input;
mod report;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use voice_core::config::MAX_DURATION_SECS;
use voice_core::{AnalysisConfig, CaptureConfig, SampleSequence, audio, conditioning, synth};

use report::{AnalysisReport, SignalSource};

#[derive(Parser, Debug)]
#[command(name = "voice-pitch", version, about = "Detect the pitch and register of a voice clip")]
struct Cli {
    /// Analyse a WAV file (or raw 16-bit little-endian PCM) instead of recording
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Skip acquisition and analyse the built-in example voice
    #[arg(long, conflicts_with = "input")]
    synthetic: bool,

    /// Recording length in seconds
    #[arg(short, long, default_value_t = 3.0, value_parser = parse_duration)]
    duration: f64,

    /// Recording sample rate in Hz (also the rate assumed for raw PCM input)
    #[arg(short = 'r', long, default_value_t = 8000, value_parser = clap::value_parser!(u32).range(1..))]
    sample_rate: u32,

    /// JSON file overriding analysis parameters
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory receiving samples.csv, spectrum.csv and analysis.json
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Also write the analysis.json summary
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    println!("\nVoice pitch analyzer\n");

    let config = load_config(cli.config.as_deref())?;
    let capture = CaptureConfig {
        sample_rate: cli.sample_rate,
        duration_secs: cli.duration,
        ..CaptureConfig::default()
    };

    let (signal, source) = acquire(&cli, &capture)?;
    info!(?source, samples = signal.len(), sample_rate = signal.sample_rate(), "analysing clip");

    let result = voice_core::analyze(&signal, &config)?;

    let json_report = cli.json.then(|| AnalysisReport::new(&signal, &result, source));
    report::write_reports(&cli.output_dir, &signal, &result, json_report.as_ref())?;
    report::print_summary(io::stdout().lock(), &result)?;

    Ok(())
}

/// Accepts finite durations in `(0, MAX_DURATION_SECS]`.
fn parse_duration(arg: &str) -> Result<f64, String> {
    let secs: f64 = arg.parse().map_err(|e| format!("{e}"))?;
    if secs > 0.0 && secs <= MAX_DURATION_SECS {
        Ok(secs)
    } else {
        Err(format!("must be a number of seconds in (0, {}]", MAX_DURATION_SECS))
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Reads analysis parameters from JSON; absent fields keep their defaults.
fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    let Some(path) = path else {
        return Ok(AnalysisConfig::default());
    };
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: AnalysisConfig =
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    config.validate()?;
    info!(path = %path.display(), "loaded analysis configuration");
    Ok(config)
}

/// Produces the clip to analyse, falling back to the example voice.
fn acquire(cli: &Cli, capture: &CaptureConfig) -> Result<(SampleSequence, SignalSource)> {
    capture.validate()?;

    if !cli.synthetic {
        let attempt = match &cli.input {
            Some(path) => input::load(path, capture.sample_rate).map(|rec| (rec, SignalSource::File)),
            None => {
                println!(
                    "Recording {} seconds... please start speaking",
                    capture.duration_secs
                );
                audio::record(capture)
                    .map(|rec| (rec, SignalSource::Microphone))
                    .map_err(anyhow::Error::from)
            }
        };

        match attempt.and_then(|(rec, source)| Ok((prepare(rec, capture)?, source))) {
            Ok(acquired) => return Ok(acquired),
            Err(e) => warn!("no usable audio ({:#}); using the example voice instead", e),
        }
    }

    let samples = synth::example_voice(capture.sample_rate, capture.duration_secs);
    let signal = SampleSequence::new(samples, capture.sample_rate).context("generating example voice")?;
    Ok((signal, SignalSource::Synthetic))
}

/// Conditions a recording and applies the silence gate.
fn prepare(recording: audio::Recording, capture: &CaptureConfig) -> Result<SampleSequence> {
    let samples = conditioning::condition(&recording.samples, capture);
    conditioning::ensure_audible(&samples, capture)?;
    Ok(SampleSequence::new(samples, recording.sample_rate)?)
}
