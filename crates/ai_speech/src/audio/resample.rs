//! Batch resampling between device and clip sample rates

use audioadapter_buffers::direct::InterleavedSlice;
use rubato::{Fft, FixedSync, Resampler};

use crate::error::SpeechError;

/// Frames fed to the FFT resampler per call
const CHUNK_SIZE: usize = 1024;

const SUB_CHUNKS: usize = 2;

/// Resample a whole mono buffer from `from_rate` to `to_rate`
///
/// # Errors
///
/// Returns `SpeechError::InvalidAudio` if rubato rejects the rates.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, SpeechError> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let fail = |e: &dyn std::fmt::Display| {
        SpeechError::InvalidAudio(format!(
            "Resampling {from_rate} Hz to {to_rate} Hz failed: {e}"
        ))
    };

    let mut resampler = Fft::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        CHUNK_SIZE,
        SUB_CHUNKS,
        1,
        FixedSync::Input,
    )
    .map_err(|e| fail(&e))?;

    let frames_max = resampler.output_frames_max();
    let mut chunk_out = vec![0.0f32; frames_max];
    let expected = expected_len(samples.len(), from_rate, to_rate);
    let mut output = Vec::with_capacity(expected + frames_max);

    for chunk in samples.chunks(CHUNK_SIZE) {
        let mut chunk_in = chunk.to_vec();
        chunk_in.resize(CHUNK_SIZE, 0.0);

        let input = InterleavedSlice::new(&chunk_in, 1, CHUNK_SIZE).map_err(|e| fail(&e))?;
        let mut out =
            InterleavedSlice::new_mut(&mut chunk_out, 1, frames_max).map_err(|e| fail(&e))?;
        let (_, written) = resampler
            .process_into_buffer(&input, &mut out, None)
            .map_err(|e| fail(&e))?;
        output.extend_from_slice(&chunk_out[..written]);
    }

    // Drop the zero padding of the last chunk
    output.truncate(expected);
    Ok(output)
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn expected_len(len: usize, from_rate: u32, to_rate: u32) -> usize {
    (len as f64 * f64::from(to_rate) / f64::from(from_rate)).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_rate_is_untouched() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(resample(&samples, 16_000, 16_000).unwrap(), samples);
    }

    #[test]
    fn device_rate_down_to_whisper_rate() {
        let one_second = vec![0.0; 48_000];
        let resampled = resample(&one_second, 48_000, 16_000).unwrap();
        assert!(
            (15_900..=16_000).contains(&resampled.len()),
            "got {} samples",
            resampled.len()
        );
    }

    #[test]
    fn tts_rate_up_to_device_rate() {
        let one_second = vec![0.0; 22_050];
        let resampled = resample(&one_second, 22_050, 44_100).unwrap();
        assert!(
            (43_900..=44_100).contains(&resampled.len()),
            "got {} samples",
            resampled.len()
        );
    }

    #[test]
    fn expected_len_scales_by_ratio() {
        assert_eq!(expected_len(48_000, 48_000, 16_000), 16_000);
        assert_eq!(expected_len(100, 16_000, 48_000), 300);
    }
}
