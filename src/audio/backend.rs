use anyhow::Result;
use tokio::sync::mpsc;

use crate::config::CaptureConfig;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Configuration for a capture backend
#[derive(Debug, Clone)]
pub struct CaptureBackendConfig {
    /// Target sample rate (frames are downsampled if needed)
    pub target_sample_rate: u32,
    /// Target channel count (1 = mono, 2 = stereo)
    pub target_channels: u16,
    /// Buffer size in milliseconds (affects latency)
    pub buffer_duration_ms: u64,
    /// Input device name; default input device when unset
    pub device: Option<String>,
}

impl Default for CaptureBackendConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: 16000, // 16kHz for Whisper
            target_channels: 1,        // Mono
            buffer_duration_ms: 100,   // 100ms buffers
            device: None,
        }
    }
}

impl From<&CaptureConfig> for CaptureBackendConfig {
    fn from(cfg: &CaptureConfig) -> Self {
        Self {
            target_sample_rate: cfg.sample_rate,
            target_channels: cfg.channels,
            buffer_duration_ms: cfg.buffer_duration_ms,
            device: cfg.device.clone(),
        }
    }
}

/// Audio capture backend trait
///
/// The shipped implementation captures the microphone through cpal; tests
/// drive the capture session with scripted in-process backends.
#[async_trait::async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive audio frames
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>>;

    /// Stop capturing audio and release the input device
    async fn stop(&mut self) -> Result<()>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Capture backend factory
pub struct CaptureBackendFactory;

impl CaptureBackendFactory {
    /// Create the microphone backend for the given configuration
    pub fn microphone(config: CaptureBackendConfig) -> Result<Box<dyn CaptureBackend>> {
        use super::microphone::MicrophoneBackend;
        let backend = MicrophoneBackend::new(config)?;
        Ok(Box::new(backend))
    }
}

/// Convert a captured frame to the target format
pub fn convert_frame(frame: AudioFrame, target_sample_rate: u32, target_channels: u16) -> AudioFrame {
    let mut processed = frame;

    // Convert to mono first so decimation works on one channel
    if processed.channels != target_channels && target_channels == 1 {
        processed = stereo_to_mono(processed);
    }

    if processed.sample_rate != target_sample_rate {
        processed = downsample_frame(processed, target_sample_rate);
    }

    processed
}

/// Downsample audio frame by decimation
fn downsample_frame(frame: AudioFrame, target_rate: u32) -> AudioFrame {
    if frame.sample_rate == target_rate {
        return frame;
    }

    let ratio = frame.sample_rate / target_rate;
    if ratio <= 1 {
        return frame; // Can't upsample
    }

    // Decimate: take every Nth sample
    let downsampled: Vec<i16> = frame
        .samples
        .iter()
        .step_by(ratio as usize)
        .copied()
        .collect();

    AudioFrame {
        samples: downsampled,
        sample_rate: target_rate,
        channels: frame.channels,
        timestamp_ms: frame.timestamp_ms,
    }
}

/// Convert stereo to mono by summing channels
fn stereo_to_mono(frame: AudioFrame) -> AudioFrame {
    if frame.channels == 1 {
        return frame;
    }

    if frame.channels != 2 {
        return frame; // Only support stereo -> mono
    }

    let mut mono_samples = Vec::with_capacity(frame.samples.len() / 2);

    // Sum left and right channels (no division to preserve volume)
    for chunk in frame.samples.chunks_exact(2) {
        let left = chunk[0] as i32;
        let right = chunk[1] as i32;
        let sum = left + right;
        let mono = sum.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        mono_samples.push(mono);
    }

    AudioFrame {
        samples: mono_samples,
        sample_rate: frame.sample_rate,
        channels: 1,
        timestamp_ms: frame.timestamp_ms,
    }
}
