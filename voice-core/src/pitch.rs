//! # Pitch Selection Module
//!
//! Picks the fundamental frequency of a voice from its magnitude spectrum.
//!
//! ## Features
//! - Search restricted to the plausible vocal band (80–300 Hz by default)
//! - Threshold relative to the strongest bin, so recording volume does not matter
//! - Deterministic tie-break: the lowest bin among equal maxima wins

use std::ops::Range;

use serde::Serialize;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::spectrum::{SpectrumEstimate, bin_count};

/// The bin chosen as fundamental frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PitchEstimate {
    pub bin: usize,
    pub frequency_hz: f64,
    pub magnitude: f64,
}

/// Outcome of a peak search over the vocal band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakSelection {
    /// `None` when no band bin exceeds the threshold.
    pub pitch: Option<PitchEstimate>,
    /// Strongest magnitude over all populated bins.
    pub max_magnitude: f64,
    /// Magnitude a band bin must exceed to qualify.
    pub threshold: f64,
    /// How many band bins exceeded the threshold.
    pub qualifying_bins: usize,
}

/// Bin range covering `[band_low_hz, band_high_hz)` for a clip of `len`
/// samples at `sample_rate` Hz.
///
/// The bounds are `floor(f · len / sample_rate)` and are clamped to the
/// populated bins `1..K` of the spectrum.
pub fn band_bins(len: usize, sample_rate: u32, config: &AnalysisConfig) -> Range<usize> {
    let to_bin = |hz: f64| (hz * len as f64 / sample_rate as f64).floor() as usize;
    let populated = bin_count(len, sample_rate, config);
    let start = to_bin(config.band_low_hz).max(1);
    let end = to_bin(config.band_high_hz).min(populated);
    start..end.max(start)
}

/// Selects the strongest qualifying bin in the vocal band.
///
/// 1. `threshold = threshold_ratio · max_magnitude` over all populated bins
/// 2. Candidates are band bins with `magnitude > threshold`
/// 3. The candidate with the largest magnitude wins; equal maxima resolve to
///    the lowest bin because the scan only replaces on a strictly larger value
///
/// An empty candidate set is a valid result with `pitch == None`.
pub fn select_peak(spectrum: &SpectrumEstimate, config: &AnalysisConfig) -> PeakSelection {
    let max_magnitude = spectrum.max_magnitude();
    let threshold = config.threshold_ratio * max_magnitude;
    let band = band_bins(spectrum.sample_count(), spectrum.sample_rate(), config);

    let mut pitch: Option<PitchEstimate> = None;
    let mut qualifying_bins = 0;

    let candidates = spectrum
        .magnitudes()
        .iter()
        .enumerate()
        .take(band.end)
        .skip(band.start);
    for (bin, &magnitude) in candidates {
        if magnitude <= threshold {
            continue;
        }
        qualifying_bins += 1;
        if pitch.is_none_or(|best| magnitude > best.magnitude) {
            pitch = Some(PitchEstimate {
                bin,
                frequency_hz: spectrum.frequency_of(bin),
                magnitude,
            });
        }
    }

    debug!(
        band_start = band.start,
        band_end = band.end,
        threshold,
        qualifying_bins,
        frequency_hz = pitch.map(|p| p.frequency_hz),
        "selected peak"
    );

    PeakSelection {
        pitch,
        max_magnitude,
        threshold,
        qualifying_bins,
    }
}
