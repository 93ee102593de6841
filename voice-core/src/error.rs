//! Error types for analysis and acquisition.

use thiserror::Error;

/// Rejected analysis inputs. Finding no pitch is not an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The Hann window needs at least two samples.
    #[error("sample sequence too short: {len} samples, need at least 2")]
    TooFewSamples { len: usize },

    #[error("invalid sample rate: {rate} Hz")]
    InvalidSampleRate { rate: u32 },

    #[error("sample {index} is not a finite number")]
    NonFiniteSample { index: usize },

    #[error("invalid analysis configuration: {0}")]
    InvalidConfig(String),
}

/// Failures while obtaining a recording from an input device.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("invalid capture configuration: {0}")]
    InvalidConfig(String),

    #[error("no input device available")]
    NoInputDevice,

    #[error("no suitable f32 input format found")]
    NoSupportedConfig,

    #[error("input stream delivered no audio")]
    NoAudio,

    /// Mean squared amplitude below the silence threshold.
    #[error("signal too weak: energy {energy:.6} below threshold {threshold}")]
    TooQuiet { energy: f64, threshold: f64 },

    #[error(transparent)]
    Configs(#[from] cpal::SupportedStreamConfigsError),

    #[error(transparent)]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error(transparent)]
    PlayStream(#[from] cpal::PlayStreamError),
}
