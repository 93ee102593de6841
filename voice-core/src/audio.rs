//! # Audio Capture Module
//!
//! This module records a fixed-length voice clip using CPAL (Cross-Platform
//! Audio Library).
//!
//! ## Features
//! - Automatic input device selection
//! - Sample rate chosen as close to the request as the device allows
//! - Down-mixing of multi-channel input to mono
//! - Bounded recording time with a grace period for slow devices

use std::time::{Duration, Instant};

use cpal::SupportedStreamConfigRange;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::RecvTimeoutError;
use tracing::{debug, info, warn};

use crate::config::CaptureConfig;
use crate::error::CaptureError;

/// Extra time allowed beyond the requested duration before giving up.
const GRACE_PERIOD: Duration = Duration::from_secs(2);

/// A raw mono recording as delivered by the input device.
#[derive(Debug, Clone)]
pub struct Recording {
    pub samples: Vec<f32>,
    /// The rate the device actually ran at, which may differ from the request.
    pub sample_rate: u32,
}

/// Records `config.duration_secs` of audio from the default input device.
///
/// This function:
/// 1. Selects the default input device and the best f32 configuration
/// 2. Streams callback chunks to this thread over a channel
/// 3. Collects until enough samples arrived or the grace deadline passed
/// 4. Pauses the stream before returning
///
/// # Returns
/// * `Ok(recording)` - Mono samples and the device sample rate
/// * `Err(e)` - Invalid configuration, no device, no usable format, stream
///   failure or no audio at all
pub fn record(config: &CaptureConfig) -> Result<Recording, CaptureError> {
    config.validate()?;

    let host = cpal::default_host();
    let device = host.default_input_device().ok_or(CaptureError::NoInputDevice)?;

    let name = device.name().unwrap_or_else(|_| "<unknown>".to_string());
    info!(device = %name, "using audio input device");

    let configs = device.supported_input_configs()?.collect::<Vec<_>>();
    let supported_config =
        find_supported_config(configs, config.sample_rate).ok_or(CaptureError::NoSupportedConfig)?;

    let sample_rate = cpal::SampleRate(clamp_rate(&supported_config, config.sample_rate));
    let stream_config: cpal::StreamConfig = supported_config.with_sample_rate(sample_rate).into();
    let channels = usize::from(stream_config.channels.max(1));
    let sample_rate = sample_rate.0;

    info!(sample_rate, channels, "selected input format");

    let (sender, receiver) = crossbeam_channel::unbounded::<Vec<f32>>();
    let err_fn = |err| warn!("an error occurred on the audio stream: {}", err);

    let stream = device.build_input_stream(
        &stream_config,
        move |data: &[f32], _: &cpal::InputCallbackInfo| {
            // Mono frames; the receiver may already be gone after the deadline.
            let _ = sender.send(downmix(data, channels));
        },
        err_fn,
        None,
    )?;
    stream.play()?;

    let target = config.samples_at(sample_rate);
    let deadline = Instant::now() + Duration::from_secs_f64(config.duration_secs) + GRACE_PERIOD;
    let mut samples = Vec::with_capacity(target);

    while samples.len() < target {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match receiver.recv_timeout(remaining) {
            Ok(chunk) => samples.extend_from_slice(&chunk),
            Err(RecvTimeoutError::Timeout) => {
                warn!(collected = samples.len(), target, "recording deadline reached");
                break;
            }
            Err(RecvTimeoutError::Disconnected) => {
                warn!("audio channel closed");
                break;
            }
        }
    }
    samples.truncate(target);

    if let Err(e) = stream.pause() {
        warn!("error pausing stream: {}", e);
    }
    drop(stream);

    if samples.is_empty() {
        return Err(CaptureError::NoAudio);
    }
    debug!(samples = samples.len(), "recording finished");

    Ok(Recording {
        samples,
        sample_rate,
    })
}

/// Averages interleaved frames into a single channel.
fn downmix(data: &[f32], channels: usize) -> Vec<f32> {
    if channels == 1 {
        return data.to_vec();
    }
    data.chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Closest rate to `target` that the configuration range supports.
fn clamp_rate(config: &SupportedStreamConfigRange, target: u32) -> u32 {
    target.clamp(config.min_sample_rate().0, config.max_sample_rate().0)
}

/// Finds the best supported audio configuration for the target sample rate.
///
/// Only 32-bit float formats are considered. Among them the one whose rate
/// range lies closest to the target wins, preferring fewer channels.
fn find_supported_config(
    configs: Vec<SupportedStreamConfigRange>,
    target_rate: u32,
) -> Option<SupportedStreamConfigRange> {
    configs
        .into_iter()
        .filter(|c| c.sample_format() == cpal::SampleFormat::F32)
        .min_by_key(|c| {
            let rate_diff = clamp_rate(c, target_rate).abs_diff(target_rate);
            (rate_diff, c.channels())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpal::{SampleFormat, SampleRate, SupportedBufferSize};

    fn range(channels: u16, min: u32, max: u32, format: SampleFormat) -> SupportedStreamConfigRange {
        SupportedStreamConfigRange::new(
            channels,
            SampleRate(min),
            SampleRate(max),
            SupportedBufferSize::Unknown,
            format,
        )
    }

    #[test]
    fn invalid_config_is_rejected_before_opening_a_device() {
        let config = CaptureConfig {
            duration_secs: -1.0,
            ..CaptureConfig::default()
        };
        assert!(matches!(record(&config), Err(CaptureError::InvalidConfig(_))));
    }

    #[test]
    fn downmix_averages_frames() {
        assert_eq!(downmix(&[1.0, 0.0, 0.5, 0.5], 2), vec![0.5, 0.5]);
        assert_eq!(downmix(&[0.25, -0.25], 1), vec![0.25, -0.25]);
    }

    #[test]
    fn prefers_rate_match_then_fewer_channels() {
        let configs = vec![
            range(2, 8000, 48_000, SampleFormat::F32),
            range(1, 44_100, 48_000, SampleFormat::F32),
            range(1, 8000, 48_000, SampleFormat::I16),
            range(1, 8000, 96_000, SampleFormat::F32),
        ];
        let best = find_supported_config(configs, 8000).unwrap();
        assert_eq!(best.channels(), 1);
        assert_eq!(best.min_sample_rate().0, 8000);
        assert_eq!(best.sample_format(), SampleFormat::F32);
    }

    #[test]
    fn clamps_rate_into_supported_range() {
        let config = range(1, 44_100, 48_000, SampleFormat::F32);
        assert_eq!(clamp_rate(&config, 8000), 44_100);
        assert_eq!(clamp_rate(&config, 46_000), 46_000);
    }

    #[test]
    fn no_float_format_means_no_config() {
        let configs = vec![range(1, 8000, 48_000, SampleFormat::I16)];
        assert!(find_supported_config(configs, 8000).is_none());
    }
}
