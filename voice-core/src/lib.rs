// voice-core/src/lib.rs

//! The core logic for the voice pitch analyzer.
//! This crate estimates the fundamental frequency of a short voice clip with a
//! band-limited direct DFT and classifies the speaker's register. It also
//! provides the acquisition helpers (live capture, conditioning, synthetic
//! fallback) but has no knowledge of where results are reported.

pub mod audio;
pub mod conditioning;
pub mod config;
pub mod error;
pub mod pitch;
pub mod register;
pub mod signal;
pub mod spectrum;
pub mod synth;

pub use config::{AnalysisConfig, CaptureConfig};
pub use error::{AnalysisError, CaptureError};
pub use pitch::{PeakSelection, PitchEstimate};
pub use register::VoiceRegister;
pub use signal::SampleSequence;
pub use spectrum::{SpectrumBin, SpectrumEstimate};

use tracing::info;

/// Represents the result of analysing one voice clip.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// Magnitude per analysed bin, for reporting.
    pub spectrum: SpectrumEstimate,
    /// The chosen fundamental and the threshold that produced it.
    pub selection: PeakSelection,
    /// Register of the detected fundamental (`VeryLow` when none was found).
    pub register: VoiceRegister,
}

impl AnalysisResult {
    /// The detected fundamental frequency in Hz, if any.
    pub fn detected_frequency(&self) -> Option<f64> {
        self.selection.pitch.map(|p| p.frequency_hz)
    }
}

/// Runs the full pipeline: spectrum estimation, peak selection, classification.
///
/// Each call is a pure function of its inputs, so identical clips and
/// configurations give bit-identical results.
///
/// # Errors
/// * `InvalidConfig` - the configuration fails [`AnalysisConfig::validate`]
pub fn analyze(signal: &SampleSequence, config: &AnalysisConfig) -> Result<AnalysisResult, AnalysisError> {
    config.validate()?;

    let spectrum = spectrum::estimate_spectrum(signal, config);
    let selection = pitch::select_peak(&spectrum, config);
    let register = VoiceRegister::from_pitch(selection.pitch.as_ref(), config);

    info!(
        samples = signal.len(),
        sample_rate = signal.sample_rate(),
        frequency_hz = selection.pitch.map(|p| p.frequency_hz),
        %register,
        "analysis complete"
    );

    Ok(AnalysisResult {
        spectrum,
        selection,
        register,
    })
}
