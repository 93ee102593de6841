//! # Spectral Estimator Module
//!
//! Computes the magnitude spectrum of a voice clip with a direct discrete
//! Fourier transform, restricted to the low bins that matter for speech.
//!
//! ## Features
//! - Hann windowing for reduced spectral leakage
//! - Direct per-bin correlation in double precision
//! - Bin count capped by both the Nyquist limit and a frequency ceiling
//!
//! The cost is O(N·K). That is fine for clips of a few seconds at speech
//! sample rates and is the reason this module is not used for long or
//! high-rate material.

use std::f64::consts::PI;

use rustfft::num_complex::Complex;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::signal::SampleSequence;

/// Computes the Hann window coefficients for a frame of `len` samples.
///
/// `w(n) = 0.5 · (1 − cos(2π·n / (len − 1)))`. The window depends only on the
/// sample index, so it is computed once and reused for every bin.
///
/// Frames shorter than 2 samples have no taper and get unit weights.
pub fn hann_window(len: usize) -> Vec<f64> {
    if len < 2 {
        return vec![1.0; len];
    }
    let n_minus_1 = (len - 1) as f64;
    (0..len)
        .map(|n| 0.5 * (1.0 - (2.0 * PI * n as f64 / n_minus_1).cos()))
        .collect()
}

/// Number of analysed bins for a clip of `len` samples at `sample_rate` Hz.
///
/// `K = min(len / 2, floor(max_frequency_hz · len / sample_rate))`.
pub fn bin_count(len: usize, sample_rate: u32, config: &AnalysisConfig) -> usize {
    let nyquist_bins = len / 2;
    let ceiling_bins = (config.max_frequency_hz * len as f64 / sample_rate as f64).floor() as usize;
    nyquist_bins.min(ceiling_bins)
}

/// One row of the magnitude table handed to reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumBin {
    pub index: usize,
    pub frequency_hz: f64,
    pub magnitude: f64,
}

/// Magnitudes for bins `0..K`. Bin 0 (DC) is never computed and reads as 0.0.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumEstimate {
    magnitudes: Vec<f64>,
    sample_count: usize,
    sample_rate: u32,
}

impl SpectrumEstimate {
    #[cfg(test)]
    pub(crate) fn from_magnitudes(magnitudes: Vec<f64>, sample_count: usize, sample_rate: u32) -> Self {
        Self {
            magnitudes,
            sample_count,
            sample_rate,
        }
    }

    /// Number of bins K, including the unpopulated DC bin.
    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    pub fn magnitude(&self, bin: usize) -> Option<f64> {
        self.magnitudes.get(bin).copied()
    }

    /// Length N of the clip the spectrum was computed from.
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Frequency implied by `bin`: `k · R / N`.
    pub fn frequency_of(&self, bin: usize) -> f64 {
        bin as f64 * self.sample_rate as f64 / self.sample_count as f64
    }

    /// Largest magnitude over the populated bins, 0.0 if there are none.
    pub fn max_magnitude(&self) -> f64 {
        self.magnitudes
            .iter()
            .skip(1)
            .copied()
            .fold(0.0, f64::max)
    }

    /// Populated bins `1..K` with their implied frequencies.
    pub fn bins(&self) -> impl Iterator<Item = SpectrumBin> + '_ {
        self.magnitudes
            .iter()
            .enumerate()
            .skip(1)
            .map(|(index, &magnitude)| SpectrumBin {
                index,
                frequency_hz: self.frequency_of(index),
                magnitude,
            })
    }
}

/// Estimates the magnitude spectrum of a clip.
///
/// For each bin `k` in `1..K` the windowed samples are correlated with the
/// basis `e^{iθ}`, `θ = −2π·k·n / N`:
/// `real(k) = Σ x(n)·w(n)·cos θ`, `imag(k) = Σ x(n)·w(n)·sin θ`, and the
/// magnitude is `sqrt(real² + imag²)`.
///
/// The basis repeats every N steps, so the N unit-circle values are tabulated
/// once and indexed by `(k·n) mod N`.
///
/// # Arguments
/// * `signal` - Validated input clip
/// * `config` - Supplies the frequency ceiling
pub fn estimate_spectrum(signal: &SampleSequence, config: &AnalysisConfig) -> SpectrumEstimate {
    let samples = signal.samples();
    let n = samples.len();
    let bins = bin_count(n, signal.sample_rate(), config);

    let windowed: Vec<f64> = samples
        .iter()
        .zip(hann_window(n))
        .map(|(&sample, w)| sample * w)
        .collect();

    let basis: Vec<Complex<f64>> = (0..n)
        .map(|m| Complex::from_polar(1.0, -2.0 * PI * m as f64 / n as f64))
        .collect();

    let mut magnitudes = vec![0.0; bins];
    for (k, magnitude) in magnitudes.iter_mut().enumerate().skip(1) {
        let mut acc = Complex::new(0.0, 0.0);
        let mut phase = 0;
        for &x in &windowed {
            acc += basis[phase] * x;
            phase += k;
            if phase >= n {
                phase -= n;
            }
        }
        *magnitude = (acc.re * acc.re + acc.im * acc.im).sqrt();
    }

    debug!(
        samples = n,
        sample_rate = signal.sample_rate(),
        bins,
        "estimated spectrum"
    );

    SpectrumEstimate {
        magnitudes,
        sample_count: n,
        sample_rate: signal.sample_rate(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::FftPlanner;

    fn sine(freq: f64, rate: u32, len: usize) -> SampleSequence {
        let samples = (0..len)
            .map(|i| (2.0 * PI * freq * i as f64 / rate as f64).sin())
            .collect();
        SampleSequence::new(samples, rate).unwrap()
    }

    #[test]
    fn hann_window_tapers_to_zero_at_edges() {
        let window = hann_window(9);
        assert!(window[0].abs() < 1e-15);
        assert!(window[8].abs() < 1e-15);
        assert!((window[4] - 1.0).abs() < 1e-15);
    }

    #[test]
    fn two_sample_window_is_finite() {
        assert_eq!(hann_window(2), vec![0.0, 0.0]);
    }

    #[test]
    fn degenerate_windows_do_not_panic() {
        assert!(hann_window(0).is_empty());
        assert_eq!(hann_window(1), vec![1.0]);
    }

    #[test]
    fn bin_count_is_capped_by_frequency_ceiling() {
        let config = AnalysisConfig::default();
        assert_eq!(bin_count(24_000, 8000, &config), 6000);
    }

    #[test]
    fn bin_count_is_capped_by_nyquist() {
        // At 2 kHz the 2 kHz ceiling lies above Nyquist.
        let config = AnalysisConfig::default();
        assert_eq!(bin_count(1000, 2000, &config), 500);
        assert_eq!(bin_count(3, 8000, &config), 0);
    }

    #[test]
    fn dc_bin_is_never_populated() {
        let signal = SampleSequence::new(vec![1.0; 800], 8000).unwrap();
        let spectrum = estimate_spectrum(&signal, &AnalysisConfig::default());
        assert_eq!(spectrum.magnitude(0), Some(0.0));
        assert_eq!(spectrum.bins().next().map(|b| b.index), Some(1));
    }

    #[test]
    fn matches_fft_of_windowed_signal() {
        let signal = sine(237.0, 8000, 1000);
        let spectrum = estimate_spectrum(&signal, &AnalysisConfig::default());

        let mut buffer: Vec<Complex<f64>> = signal
            .samples()
            .iter()
            .zip(hann_window(signal.len()))
            .map(|(&s, w)| Complex::new(s * w, 0.0))
            .collect();
        let mut planner = FftPlanner::new();
        planner.plan_fft_forward(buffer.len()).process(&mut buffer);

        for bin in spectrum.bins() {
            let expected = buffer[bin.index].norm();
            assert!(
                (bin.magnitude - expected).abs() < 1e-9 * (1.0 + expected),
                "bin {}: {} vs {}",
                bin.index,
                bin.magnitude,
                expected
            );
        }
    }

    #[test]
    fn bins_report_implied_frequency() {
        let signal = sine(100.0, 8000, 4000);
        let spectrum = estimate_spectrum(&signal, &AnalysisConfig::default());
        let bin = spectrum.bins().nth(199).unwrap();
        assert_eq!(bin.index, 200);
        assert_eq!(bin.frequency_hz, 400.0);
    }
}
