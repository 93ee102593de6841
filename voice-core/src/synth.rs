//! Synthetic signals: the fallback voice used when no recording is available,
//! and plain tones for fixtures.

use std::f64::consts::PI;

/// Generates a voice-like clip gliding between 130 Hz and 230 Hz.
///
/// The instantaneous frequency is `180 + 50·sin(2π·0.5·t)`; the first three
/// harmonics are mixed at 0.5, 0.3 and 0.1 and the clip fades out with
/// `exp(−2t / duration)`.
pub fn example_voice(sample_rate: u32, duration_secs: f64) -> Vec<f64> {
    let len = (sample_rate as f64 * duration_secs).round() as usize;
    (0..len)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            let frequency = 180.0 + 50.0 * (2.0 * PI * 0.5 * t).sin();
            let voice = 0.5 * (2.0 * PI * frequency * t).sin()
                + 0.3 * (2.0 * PI * 2.0 * frequency * t).sin()
                + 0.1 * (2.0 * PI * 3.0 * frequency * t).sin();
            voice * (-2.0 * t / duration_secs).exp()
        })
        .collect()
}

/// A pure sine tone.
pub fn sine(frequency_hz: f64, amplitude: f64, sample_rate: u32, duration_secs: f64) -> Vec<f64> {
    let len = (sample_rate as f64 * duration_secs).round() as usize;
    (0..len)
        .map(|i| amplitude * (2.0 * PI * frequency_hz * i as f64 / sample_rate as f64).sin())
        .collect()
}
