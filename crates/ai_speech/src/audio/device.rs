//! Device lookup and stream format selection for cpal

use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Device, Host, SampleFormat, SupportedStreamConfig, SupportedStreamConfigRange};

use crate::error::SpeechError;

/// Human-readable device name, as listed by the host
pub fn device_name(device: &Device) -> String {
    device
        .description()
        .ok()
        .map_or_else(|| "Unknown".to_string(), |desc| desc.name().to_string())
}

/// Named microphone, or the host default when `wanted` is `None`
pub fn input_device(host: &Host, wanted: Option<&str>) -> Result<Device, SpeechError> {
    let Some(wanted) = wanted else {
        return host
            .default_input_device()
            .ok_or_else(|| SpeechError::NotAvailable("No default input device".to_string()));
    };

    host.input_devices()
        .map_err(|e| SpeechError::CaptureFailed(format!("Failed to list input devices: {e}")))?
        .find(|device| device_name(device) == wanted)
        .ok_or_else(|| SpeechError::NotAvailable(format!("Input device '{wanted}' not found")))
}

/// Named speaker, or the host default when `wanted` is `None`
pub fn output_device(host: &Host, wanted: Option<&str>) -> Result<Device, SpeechError> {
    let Some(wanted) = wanted else {
        return host
            .default_output_device()
            .ok_or_else(|| SpeechError::NotAvailable("No default output device".to_string()));
    };

    host.output_devices()
        .map_err(|e| SpeechError::PlaybackFailed(format!("Failed to list output devices: {e}")))?
        .find(|device| device_name(device) == wanted)
        .ok_or_else(|| SpeechError::NotAvailable(format!("Output device '{wanted}' not found")))
}

/// Pick a mono or stereo f32 stream, at `target_rate` when the device
/// supports it and at the nearest supported rate otherwise
pub fn best_config(
    configs: impl Iterator<Item = SupportedStreamConfigRange>,
    target_rate: u32,
) -> Option<SupportedStreamConfig> {
    let mut candidates: Vec<SupportedStreamConfigRange> = configs
        .filter(|c| c.channels() <= 2 && c.sample_format() == SampleFormat::F32)
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let index = candidates
        .iter()
        .position(|c| (c.min_sample_rate()..=c.max_sample_rate()).contains(&target_rate))
        .unwrap_or(0);
    let chosen = candidates.swap_remove(index);
    let rate = target_rate.clamp(chosen.min_sample_rate(), chosen.max_sample_rate());
    Some(chosen.with_sample_rate(rate))
}
