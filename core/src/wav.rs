use crate::error::MorseError;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::{Cursor, Read};
use std::path::Path;

fn mono_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Encode samples as an in-memory 16-bit mono PCM WAV file.
pub fn wav_bytes(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, MorseError> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, mono_spec(sample_rate))?;
        for &s in samples {
            writer.write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

pub fn write_wav_file(
    path: &Path,
    samples: &[f32],
    sample_rate: u32,
) -> Result<(), MorseError> {
    let mut writer = WavWriter::create(path, mono_spec(sample_rate))?;
    for &s in samples {
        writer.write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}

// Normalizes any integer width or float WAV into f32 and keeps only the first
// channel of multi-channel files.
fn read_samples<R: Read>(reader: WavReader<R>) -> Result<(Vec<f32>, u32), MorseError> {
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;
    if channels > 1 {
        log::warn!("multi-channel audio, using first channel only");
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let mono = interleaved.into_iter().step_by(channels).collect();
    Ok((mono, spec.sample_rate))
}

pub fn read_wav_bytes(bytes: &[u8]) -> Result<(Vec<f32>, u32), MorseError> {
    read_samples(WavReader::new(Cursor::new(bytes))?)
}

pub fn read_wav_file(path: &Path) -> Result<(Vec<f32>, u32), MorseError> {
    read_samples(WavReader::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_round_trip() {
        let samples: Vec<f32> = (0..4410)
            .map(|i| (std::f32::consts::TAU * 700.0 * i as f32 / 44100.0).sin() * 0.5)
            .collect();
        let bytes = wav_bytes(&samples, 44100).unwrap();
        let (decoded, sr) = read_wav_bytes(&bytes).unwrap();
        assert_eq!(sr, 44100);
        assert_eq!(decoded.len(), samples.len());
        for (a, b) in samples.iter().zip(&decoded) {
            assert!((a - b).abs() < 1.0 / 16384.0);
        }
    }

    #[test]
    fn empty_input_is_a_valid_container() {
        let bytes = wav_bytes(&[], 8000).unwrap();
        let (decoded, sr) = read_wav_bytes(&bytes).unwrap();
        assert_eq!(sr, 8000);
        assert!(decoded.is_empty());
    }

    #[test]
    fn garbage_bytes_are_a_codec_error() {
        let result = read_wav_bytes(b"definitely not a wav file");
        assert!(matches!(result, Err(MorseError::Codec(_))));
    }
}
