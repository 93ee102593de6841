//! # Signal Conditioning Module
//!
//! Prepares raw recordings for analysis: PCM conversion, a light low-pass
//! filter, peak normalisation and the silence gate that keeps weak clips
//! away from the analysis pipeline.

use tracing::debug;

use crate::config::CaptureConfig;
use crate::error::CaptureError;

/// Converts signed 16-bit PCM to amplitudes in [-1, 1).
pub fn pcm_i16_to_unit(pcm: &[i16]) -> Vec<f32> {
    pcm.iter().map(|&s| s as f32 / 32768.0).collect()
}

/// Filters and normalises a raw recording.
///
/// 1. Measures the peak `|x|` of the raw input, floored at `peak_floor`
/// 2. Applies the one-pole low-pass `y[i] = a·x[i] + (1 − a)·y[i − 1]`
///    with `a = smoothing`, damping hiss above the voice band
/// 3. Divides by the peak so the loudest raw sample maps to ±1
///
/// # Arguments
/// * `raw` - Mono samples as delivered by the input device
/// * `config` - Supplies `smoothing` and `peak_floor`
pub fn condition(raw: &[f32], config: &CaptureConfig) -> Vec<f64> {
    let peak = raw
        .iter()
        .map(|&s| f64::from(s).abs())
        .fold(config.peak_floor, f64::max);

    let mut filtered: Vec<f64> = Vec::with_capacity(raw.len());
    for &sample in raw {
        let x = f64::from(sample);
        let y = match filtered.last() {
            Some(&prev) => config.smoothing * x + (1.0 - config.smoothing) * prev,
            None => x,
        };
        filtered.push(y);
    }

    for sample in filtered.iter_mut() {
        *sample /= peak;
    }
    debug!(samples = filtered.len(), peak, "conditioned recording");
    filtered
}

/// Mean squared amplitude of a clip, 0.0 for an empty clip.
pub fn mean_energy(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64
}

/// Silence gate: rejects clips whose mean energy is below `silence_threshold`.
pub fn ensure_audible(samples: &[f64], config: &CaptureConfig) -> Result<(), CaptureError> {
    let energy = mean_energy(samples);
    if energy < config.silence_threshold {
        return Err(CaptureError::TooQuiet {
            energy,
            threshold: config.silence_threshold,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcm_full_scale() {
        assert_eq!(pcm_i16_to_unit(&[i16::MIN, 0, 16384]), vec![-1.0, 0.0, 0.5]);
    }

    #[test]
    fn condition_normalises_by_raw_peak() {
        let config = CaptureConfig::default();
        let conditioned = condition(&[0.5, 0.5, 0.5], &config);
        // y0 = 0.5, y1 = 0.6·0.5 + 0.4·0.5 = 0.5; divided by the 0.5 peak.
        for sample in conditioned {
            assert!((sample - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn condition_smooths_steps() {
        let config = CaptureConfig::default();
        let conditioned = condition(&[0.0, 1.0, 1.0], &config);
        assert_eq!(conditioned[0], 0.0);
        assert!((conditioned[1] - 0.6).abs() < 1e-12);
        assert!((conditioned[2] - 0.84).abs() < 1e-12);
    }

    #[test]
    fn condition_uses_peak_floor_for_silence() {
        let conditioned = condition(&[0.0; 4], &CaptureConfig::default());
        assert!(conditioned.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn silence_gate() {
        let config = CaptureConfig::default();
        assert!(matches!(
            ensure_audible(&[0.0; 100], &config),
            Err(CaptureError::TooQuiet { .. })
        ));
        assert!(ensure_audible(&[0.5; 100], &config).is_ok());
        assert_eq!(mean_energy(&[]), 0.0);
    }
}
