//! File input: WAV files via hound, anything else as raw 16-bit little-endian PCM.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;
use voice_core::audio::Recording;
use voice_core::conditioning::pcm_i16_to_unit;

/// Loads a recording from `path`.
///
/// `.wav` files carry their own sample rate; raw PCM is assumed mono at
/// `raw_sample_rate`.
pub fn load(path: &Path, raw_sample_rate: u32) -> Result<Recording> {
    let is_wav = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));

    let recording = if is_wav {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        read_wav(BufReader::new(file)).with_context(|| format!("reading WAV {}", path.display()))?
    } else {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        read_raw_pcm(&bytes, raw_sample_rate)
    };

    info!(
        path = %path.display(),
        samples = recording.samples.len(),
        sample_rate = recording.sample_rate,
        "loaded recording"
    );
    Ok(recording)
}

/// Decodes a WAV stream, averaging channels down to mono.
pub fn read_wav<R: Read>(reader: R) -> Result<Recording> {
    let reader = hound::WavReader::new(reader)?;
    let spec = reader.spec();
    if spec.channels == 0 {
        bail!("WAV stream declares zero channels");
    }

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|s| s as f32 / max_value))
                .collect::<Result<_, _>>()?
        }
    };

    let channels = usize::from(spec.channels);
    let samples = if channels == 1 {
        samples
    } else {
        samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    };

    Ok(Recording {
        samples,
        sample_rate: spec.sample_rate,
    })
}

/// Decodes headerless signed 16-bit little-endian mono PCM.
/// A trailing odd byte is ignored.
pub fn read_raw_pcm(bytes: &[u8], sample_rate: u32) -> Recording {
    let pcm: Vec<i16> = bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    Recording {
        samples: pcm_i16_to_unit(&pcm),
        sample_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn wav_bytes(spec: hound::WavSpec, samples: &[i16]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn reads_mono_wav() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let recording = read_wav(Cursor::new(wav_bytes(spec, &[0, 16384, -32768]))).unwrap();
        assert_eq!(recording.sample_rate, 8000);
        assert_eq!(recording.samples, vec![0.0, 0.5, -1.0]);
    }

    #[test]
    fn downmixes_stereo_wav() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let recording = read_wav(Cursor::new(wav_bytes(spec, &[16384, 0, -16384, -16384]))).unwrap();
        assert_eq!(recording.sample_rate, 16_000);
        assert_eq!(recording.samples, vec![0.25, -0.5]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(read_wav(Cursor::new(b"not a wav file".to_vec())).is_err());
    }

    #[test]
    fn raw_pcm_is_little_endian() {
        let recording = read_raw_pcm(&[0x00, 0x40, 0x00, 0x80, 0x7f], 8000);
        assert_eq!(recording.samples, vec![0.5, -1.0]);
        assert_eq!(recording.sample_rate, 8000);
    }
}
