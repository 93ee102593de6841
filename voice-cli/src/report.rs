//! # Reporting Module
//!
//! Renders analysis outputs: the sample dump and magnitude table as CSV, an
//! optional JSON summary, and the short text summary printed to the terminal.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;
use voice_core::{AnalysisResult, PitchEstimate, SampleSequence, VoiceRegister};

pub const SAMPLES_FILE: &str = "samples.csv";
pub const SPECTRUM_FILE: &str = "spectrum.csv";
pub const REPORT_FILE: &str = "analysis.json";

/// Where the analysed clip came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalSource {
    File,
    Microphone,
    Synthetic,
}

/// Scalar results of one analysis, as saved to `analysis.json`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub source: SignalSource,
    pub sample_rate: u32,
    pub sample_count: usize,
    pub duration_secs: f64,
    pub analysed_bins: usize,
    pub pitch: Option<PitchEstimate>,
    pub max_magnitude: f64,
    pub threshold: f64,
    pub qualifying_bins: usize,
    pub register: VoiceRegister,
    pub register_description: &'static str,
}

impl AnalysisReport {
    pub fn new(signal: &SampleSequence, result: &AnalysisResult, source: SignalSource) -> Self {
        Self {
            source,
            sample_rate: signal.sample_rate(),
            sample_count: signal.len(),
            duration_secs: signal.duration_secs(),
            analysed_bins: result.spectrum.len(),
            pitch: result.selection.pitch,
            max_magnitude: result.selection.max_magnitude,
            threshold: result.selection.threshold,
            qualifying_bins: result.selection.qualifying_bins,
            register: result.register,
            register_description: result.register.description(),
        }
    }
}

/// Writes the normalised samples as `index,value` rows.
pub fn write_samples_csv<W: Write>(mut out: W, signal: &SampleSequence) -> std::io::Result<()> {
    writeln!(out, "Normalized audio samples (-1 to 1)")?;
    writeln!(
        out,
        "Samples: {}, Sample rate: {} Hz",
        signal.len(),
        signal.sample_rate()
    )?;
    writeln!(out, "index,value")?;
    for (i, sample) in signal.samples().iter().enumerate() {
        writeln!(out, "{},{:.6}", i, sample)?;
    }
    out.flush()
}

/// Writes the magnitude table as `bin,frequency_hz,magnitude` rows.
pub fn write_spectrum_csv<W: Write>(mut out: W, result: &AnalysisResult) -> std::io::Result<()> {
    writeln!(out, "Frequency analysis (DFT)")?;
    match result.detected_frequency() {
        Some(freq) => writeln!(out, "Detected fundamental: {:.2} Hz", freq)?,
        None => writeln!(out, "Detected fundamental: none")?,
    }
    writeln!(out, "bin,frequency_hz,magnitude")?;
    for bin in result.spectrum.bins() {
        writeln!(out, "{},{:.2},{:.2}", bin.index, bin.frequency_hz, bin.magnitude)?;
    }
    out.flush()
}

/// Saves the JSON summary.
pub fn save_report(report: &AnalysisReport, path: &Path) -> Result<()> {
    let json_string = serde_json::to_string_pretty(report)?;
    fs::write(path, json_string).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Writes the CSV files (and the JSON summary when requested) into `dir`.
pub fn write_reports(
    dir: &Path,
    signal: &SampleSequence,
    result: &AnalysisResult,
    report: Option<&AnalysisReport>,
) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let samples_path = dir.join(SAMPLES_FILE);
    let file = File::create(&samples_path).with_context(|| format!("creating {}", samples_path.display()))?;
    write_samples_csv(BufWriter::new(file), signal)?;
    info!(path = %samples_path.display(), "samples saved");

    let spectrum_path = dir.join(SPECTRUM_FILE);
    let file = File::create(&spectrum_path).with_context(|| format!("creating {}", spectrum_path.display()))?;
    write_spectrum_csv(BufWriter::new(file), result)?;
    info!(path = %spectrum_path.display(), "DFT analysis saved");

    if let Some(report) = report {
        let report_path = dir.join(REPORT_FILE);
        save_report(report, &report_path)?;
        info!(path = %report_path.display(), "JSON report saved");
    }
    Ok(())
}

/// Prints the human-readable result.
pub fn print_summary<W: Write>(mut out: W, result: &AnalysisResult) -> std::io::Result<()> {
    writeln!(out, "\nAnalysis results")?;
    match result.detected_frequency() {
        Some(freq) => writeln!(out, "Fundamental frequency: {:.0} Hz", freq)?,
        None => writeln!(out, "Fundamental frequency: none detected")?,
    }
    writeln!(
        out,
        "Register: {} - {}",
        result.register,
        result.register.description()
    )
}
