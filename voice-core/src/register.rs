//! # Voice Register Module
//!
//! Maps a detected fundamental frequency to one of five coarse vocal
//! registers. Breakpoints are half-open and lower-bound inclusive, so a
//! frequency sitting exactly on a breakpoint belongs to the higher register.
//!
//! | Range (Hz, defaults) | Register  |
//! |----------------------|-----------|
//! | f < 110              | very-low  |
//! | 110 ≤ f < 150        | low       |
//! | 150 ≤ f < 180        | mid       |
//! | 180 ≤ f < 220        | high      |
//! | f ≥ 220              | very-high |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::pitch::PitchEstimate;

/// Coarse pitch classification of a speaking voice, ordered low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VoiceRegister {
    VeryLow,
    Low,
    Mid,
    High,
    VeryHigh,
}

impl VoiceRegister {
    /// All registers in ascending order.
    pub const ALL: [VoiceRegister; 5] = [
        VoiceRegister::VeryLow,
        VoiceRegister::Low,
        VoiceRegister::Mid,
        VoiceRegister::High,
        VoiceRegister::VeryHigh,
    ];

    /// Classifies a frequency in Hz.
    ///
    /// Total over all inputs: zero, negative and NaN frequencies are `VeryLow`.
    pub fn classify(frequency_hz: f64, config: &AnalysisConfig) -> Self {
        let breakpoints = &config.register_breakpoints_hz;
        // Counting passed breakpoints keeps NaN (which passes none) at VeryLow.
        let passed = breakpoints.iter().take_while(|&&b| frequency_hz >= b).count();
        Self::ALL[passed]
    }

    /// Classifies a peak-selection outcome. No pitch means `VeryLow`.
    pub fn from_pitch(pitch: Option<&PitchEstimate>, config: &AnalysisConfig) -> Self {
        match pitch {
            Some(pitch) => Self::classify(pitch.frequency_hz, config),
            None => VoiceRegister::VeryLow,
        }
    }

    /// Short machine-friendly label.
    pub fn label(self) -> &'static str {
        match self {
            VoiceRegister::VeryLow => "very-low",
            VoiceRegister::Low => "low",
            VoiceRegister::Mid => "mid",
            VoiceRegister::High => "high",
            VoiceRegister::VeryHigh => "very-high",
        }
    }

    /// Human-readable description of the typical speaker.
    pub fn description(self) -> &'static str {
        match self {
            VoiceRegister::VeryLow => "Very deep voice (low male)",
            VoiceRegister::Low => "Deep voice (average male)",
            VoiceRegister::Mid => "Medium voice (unisex)",
            VoiceRegister::High => "High voice (average female)",
            VoiceRegister::VeryHigh => "Very high voice (child or high female)",
        }
    }
}

impl fmt::Display for VoiceRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(hz: f64) -> VoiceRegister {
        VoiceRegister::classify(hz, &AnalysisConfig::default())
    }

    #[test]
    fn breakpoints_belong_to_higher_register() {
        assert_eq!(classify(110.0), VoiceRegister::Low);
        assert_eq!(classify(150.0), VoiceRegister::Mid);
        assert_eq!(classify(180.0), VoiceRegister::High);
        assert_eq!(classify(220.0), VoiceRegister::VeryHigh);
    }

    #[test]
    fn values_just_below_breakpoints() {
        assert_eq!(classify(109.999), VoiceRegister::VeryLow);
        assert_eq!(classify(149.999), VoiceRegister::Low);
        assert_eq!(classify(179.999), VoiceRegister::Mid);
        assert_eq!(classify(219.999), VoiceRegister::High);
    }

    #[test]
    fn degenerate_frequencies_are_very_low() {
        assert_eq!(classify(0.0), VoiceRegister::VeryLow);
        assert_eq!(classify(-5.0), VoiceRegister::VeryLow);
        assert_eq!(classify(f64::NAN), VoiceRegister::VeryLow);
        assert_eq!(classify(f64::INFINITY), VoiceRegister::VeryHigh);
    }

    #[test]
    fn absent_pitch_is_very_low() {
        assert_eq!(
            VoiceRegister::from_pitch(None, &AnalysisConfig::default()),
            VoiceRegister::VeryLow
        );
    }

    #[test]
    fn custom_breakpoints() {
        let config = AnalysisConfig {
            register_breakpoints_hz: [100.0, 200.0, 300.0, 400.0],
            ..AnalysisConfig::default()
        };
        let expected = [
            (99.9, VoiceRegister::VeryLow),
            (100.0, VoiceRegister::Low),
            (250.0, VoiceRegister::Mid),
            (300.0, VoiceRegister::High),
            (399.9, VoiceRegister::High),
            (400.0, VoiceRegister::VeryHigh),
        ];
        for (hz, register) in expected {
            assert_eq!(VoiceRegister::classify(hz, &config), register, "{} Hz", hz);
        }
    }

    #[test]
    fn display_uses_kebab_labels() {
        assert_eq!(VoiceRegister::VeryHigh.to_string(), "very-high");
        assert_eq!(
            serde_json::to_string(&VoiceRegister::VeryLow).unwrap(),
            "\"very-low\""
        );
    }
}
