//! WAV encoding for recorded questions and decoding for playback

use std::io::Cursor;
use std::time::Duration;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

/// Mono samples in `-1.0..=1.0` at a known rate
#[derive(Debug, Clone, PartialEq)]
pub struct MonoClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Encode mono samples as 16-bit PCM WAV, the format whisper and the
/// OpenAI transcription endpoint both accept
///
/// # Errors
///
/// Returns the encoder error; writing to memory only fails on bad specs.
pub fn encode_mono(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(44 + samples.len() * 2));
    let mut writer = WavWriter::new(&mut cursor, spec)?;
    for &sample in samples {
        #[allow(clippy::cast_possible_truncation)]
        writer.write_sample((sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16)?;
    }
    writer.finalize()?;

    Ok(cursor.into_inner())
}

/// Decode any PCM or float WAV into mono samples
///
/// # Errors
///
/// Returns the decoder error for truncated or non-WAV payloads.
#[allow(clippy::cast_precision_loss)]
pub fn decode_mono(bytes: &[u8]) -> Result<MonoClip, hound::Error> {
    let mut reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let full_scale = 2f32.powi(i32::from(spec.bits_per_sample) - 1);
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|value| value as f32 / full_scale))
                .collect::<Result<_, _>>()?
        },
    };

    Ok(MonoClip {
        samples: mix_to_mono(&interleaved, usize::from(spec.channels)),
        sample_rate: spec.sample_rate,
    })
}

/// Playing time from the WAV header, `None` when it cannot be read
pub fn duration(bytes: &[u8]) -> Option<Duration> {
    let reader = WavReader::new(Cursor::new(bytes)).ok()?;
    let rate = reader.spec().sample_rate;
    (rate > 0).then(|| Duration::from_secs_f64(f64::from(reader.duration()) / f64::from(rate)))
}

/// Average interleaved frames down to one channel
#[allow(clippy::cast_precision_loss)]
pub fn mix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}
