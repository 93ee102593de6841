//! Time-domain input to the analysis pipeline.

use crate::error::AnalysisError;

/// A validated, read-only voice clip: normalized amplitudes plus their sample rate.
///
/// Construction enforces the preconditions of the spectral estimator, so every
/// `SampleSequence` can be analysed without producing NaN magnitudes.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSequence {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl SampleSequence {
    /// Wraps `samples` recorded at `sample_rate` Hz.
    ///
    /// # Errors
    /// * `TooFewSamples` - fewer than 2 samples
    /// * `InvalidSampleRate` - a sample rate of 0
    /// * `NonFiniteSample` - a NaN or infinite amplitude
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Result<Self, AnalysisError> {
        if samples.len() < 2 {
            return Err(AnalysisError::TooFewSamples { len: samples.len() });
        }
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidSampleRate { rate: sample_rate });
        }
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(AnalysisError::NonFiniteSample { index });
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Never true for a validated sequence.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Frequency spacing between adjacent bins, `R / N`.
    pub fn bin_width_hz(&self) -> f64 {
        self.sample_rate as f64 / self.samples.len() as f64
    }
}
