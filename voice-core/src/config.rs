//! # Configuration Module
//!
//! Immutable parameter sets for the analysis pipeline and for audio acquisition.
//! Every stage receives its configuration explicitly, so non-default values
//! (other sample rates, narrower bands) can be exercised in tests.

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, CaptureError};

/// Longest recording accepted, in seconds.
pub const MAX_DURATION_SECS: f64 = 600.0;

/// Parameters for the spectral estimator, peak selector and register classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Upper limit of the analysed spectrum in Hz (default: 2000.0).
    pub max_frequency_hz: f64,
    /// Lowest frequency considered for the fundamental, inclusive (default: 80.0).
    pub band_low_hz: f64,
    /// Highest frequency considered for the fundamental, exclusive (default: 300.0).
    pub band_high_hz: f64,
    /// Fraction of the strongest bin a candidate must exceed (default: 0.1).
    pub threshold_ratio: f64,
    /// Lower bounds of the low, mid, high and very-high registers in Hz.
    pub register_breakpoints_hz: [f64; 4],
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_frequency_hz: 2000.0,
            band_low_hz: 80.0,
            band_high_hz: 300.0,
            threshold_ratio: 0.1,
            register_breakpoints_hz: [110.0, 150.0, 180.0, 220.0],
        }
    }
}

impl AnalysisConfig {
    /// Checks that the parameters describe a usable pipeline.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !self.max_frequency_hz.is_finite() || self.max_frequency_hz <= 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "max_frequency_hz must be positive, got {}",
                self.max_frequency_hz
            )));
        }
        if !(self.band_low_hz >= 0.0 && self.band_low_hz < self.band_high_hz)
            || !self.band_high_hz.is_finite()
        {
            return Err(AnalysisError::InvalidConfig(format!(
                "search band [{}, {}) is empty or negative",
                self.band_low_hz, self.band_high_hz
            )));
        }
        if !(0.0..=1.0).contains(&self.threshold_ratio) {
            return Err(AnalysisError::InvalidConfig(format!(
                "threshold_ratio must lie in [0, 1], got {}",
                self.threshold_ratio
            )));
        }
        let breakpoints = &self.register_breakpoints_hz;
        let ascending = breakpoints.iter().all(|b| b.is_finite())
            && breakpoints.windows(2).all(|w| w[0] < w[1]);
        if !ascending {
            return Err(AnalysisError::InvalidConfig(format!(
                "register breakpoints must be finite and strictly ascending, got {:?}",
                breakpoints
            )));
        }
        Ok(())
    }
}

/// Parameters for recording and conditioning a voice clip.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureConfig {
    /// Requested sample rate in Hz (default: 8000, enough for speech).
    pub sample_rate: u32,
    /// Recording length in seconds (default: 3.0).
    pub duration_secs: f64,
    /// Minimum mean squared amplitude for a clip to count as voice (default: 0.0003).
    pub silence_threshold: f64,
    /// Weight of the current sample in the one-pole low-pass (default: 0.6).
    pub smoothing: f64,
    /// Floor for the peak used as normalisation divisor (default: 0.0001).
    pub peak_floor: f64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 8000,
            duration_secs: 3.0,
            silence_threshold: 0.0003,
            smoothing: 0.6,
            peak_floor: 0.0001,
        }
    }
}

impl CaptureConfig {
    /// Number of mono samples a full recording holds.
    pub fn target_samples(&self) -> usize {
        self.samples_at(self.sample_rate)
    }

    /// Number of samples `duration_secs` spans at `sample_rate`, which may be
    /// the device rate rather than the requested one.
    pub fn samples_at(&self, sample_rate: u32) -> usize {
        (sample_rate as f64 * self.duration_secs).round() as usize
    }

    /// Checks that a recording of this shape can be made and analysed.
    pub fn validate(&self) -> Result<(), CaptureError> {
        if self.sample_rate == 0 {
            return Err(CaptureError::InvalidConfig("sample_rate must be positive".to_string()));
        }
        if !(self.duration_secs > 0.0 && self.duration_secs <= MAX_DURATION_SECS) {
            return Err(CaptureError::InvalidConfig(format!(
                "duration_secs must lie in (0, {}], got {}",
                MAX_DURATION_SECS, self.duration_secs
            )));
        }
        if self.target_samples() < 2 {
            return Err(CaptureError::InvalidConfig(format!(
                "{} s at {} Hz gives fewer than 2 samples",
                self.duration_secs, self.sample_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(CaptureError::InvalidConfig(format!(
                "smoothing must lie in [0, 1], got {}",
                self.smoothing
            )));
        }
        if !(self.peak_floor > 0.0 && self.silence_threshold >= 0.0) {
            return Err(CaptureError::InvalidConfig(format!(
                "peak_floor must be positive and silence_threshold non-negative, got {} and {}",
                self.peak_floor, self.silence_threshold
            )));
        }
        Ok(())
    }
}
