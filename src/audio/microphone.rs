use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, StreamConfig};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use super::backend::{AudioFrame, CaptureBackend, CaptureBackendConfig};

/// Microphone capture backend built on cpal.
///
/// cpal streams are not `Send`, so the stream lives on a dedicated thread for
/// the lifetime of the capture. `stop` signals that thread, which drops the
/// stream (the single device release) and exits.
pub struct MicrophoneBackend {
    config: CaptureBackendConfig,
    capturing: Arc<AtomicBool>,
    stop_tx: Option<std::sync::mpsc::Sender<()>>,
    worker: Option<std::thread::JoinHandle<()>>,
}

impl MicrophoneBackend {
    pub fn new(config: CaptureBackendConfig) -> Result<Self> {
        Ok(Self {
            config,
            capturing: Arc::new(AtomicBool::new(false)),
            stop_tx: None,
            worker: None,
        })
    }

    fn find_device(device_name: Option<&str>) -> Result<Device> {
        let host = cpal::default_host();

        let device = if let Some(name) = device_name {
            host.input_devices()?
                .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                .with_context(|| format!("Audio input device '{}' not found", name))?
        } else {
            host.default_input_device()
                .context("No default input device available")?
        };

        info!(
            "Using audio input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        Ok(device)
    }
}

#[async_trait::async_trait]
impl CaptureBackend for MicrophoneBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        if self.capturing.load(Ordering::SeqCst) {
            anyhow::bail!("Microphone capture already active");
        }

        let (frame_tx, frame_rx) = mpsc::channel(64);
        let (ready_tx, ready_rx) = std::sync::mpsc::channel::<Result<()>>();
        let (stop_tx, stop_rx) = std::sync::mpsc::channel::<()>();

        let capturing = Arc::clone(&self.capturing);
        let config = self.config.clone();

        let worker = std::thread::Builder::new()
            .name("mic-capture".to_string())
            .spawn(move || {
                let stream = match open_input_stream(&config, frame_tx) {
                    Ok(stream) => stream,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                if let Err(e) = stream.play() {
                    let _ = ready_tx.send(Err(e).context("Failed to start input stream"));
                    return;
                }

                capturing.store(true, Ordering::SeqCst);
                let _ = ready_tx.send(Ok(()));

                // Park until stop is signalled (or the backend is dropped)
                let _ = stop_rx.recv();

                // Dropping the stream releases the input device
                drop(stream);
                capturing.store(false, Ordering::SeqCst);
            })
            .context("Failed to spawn capture thread")?;

        // Device and stream setup happen on the capture thread; wait for the
        // outcome off the async executor.
        let ready = tokio::task::spawn_blocking(move || ready_rx.recv())
            .await
            .context("Capture handshake task panicked")?;

        match ready {
            Ok(Ok(())) => {
                self.stop_tx = Some(stop_tx);
                self.worker = Some(worker);
                Ok(frame_rx)
            }
            Ok(Err(e)) => {
                let _ = worker.join();
                Err(e)
            }
            Err(_) => {
                let _ = worker.join();
                anyhow::bail!("Capture thread exited before the stream was ready")
            }
        }
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        if let Some(worker) = self.worker.take() {
            tokio::task::spawn_blocking(move || {
                if worker.join().is_err() {
                    error!("Capture thread panicked");
                }
            })
            .await
            .context("Failed to join capture thread")?;
        }

        info!("Microphone capture stopped");
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "microphone (cpal)"
    }
}

impl Drop for MicrophoneBackend {
    fn drop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
    }
}

/// Open the cpal input stream, batching callback data into [`AudioFrame`]s of
/// roughly `buffer_duration_ms` each.
fn open_input_stream(
    config: &CaptureBackendConfig,
    frame_tx: mpsc::Sender<AudioFrame>,
) -> Result<cpal::Stream> {
    let device = MicrophoneBackend::find_device(config.device.as_deref())?;

    let supported = device
        .default_input_config()
        .context("No supported input configuration")?;

    let sample_format = supported.sample_format();
    let stream_config: StreamConfig = supported.into();

    info!(
        "Capture stream: {} Hz, {} channels, {:?}",
        stream_config.sample_rate.0, stream_config.channels, sample_format
    );

    let samples_per_frame = (stream_config.sample_rate.0 as u64
        * stream_config.channels as u64
        * config.buffer_duration_ms
        / 1000)
        .max(1) as usize;

    let stream = match sample_format {
        SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, frame_tx, samples_per_frame)?,
        SampleFormat::I32 => build_stream::<i32>(&device, &stream_config, frame_tx, samples_per_frame)?,
        SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, frame_tx, samples_per_frame)?,
        SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, frame_tx, samples_per_frame)?,
        SampleFormat::F64 => build_stream::<f64>(&device, &stream_config, frame_tx, samples_per_frame)?,
        other => anyhow::bail!("Unsupported sample format: {:?}", other),
    };

    Ok(stream)
}

fn build_stream<T>(
    device: &Device,
    stream_config: &StreamConfig,
    frame_tx: mpsc::Sender<AudioFrame>,
    samples_per_frame: usize,
) -> Result<cpal::Stream>
where
    T: cpal::Sample + cpal::SizedSample + Send + 'static,
    i16: cpal::FromSample<T>,
{
    let sample_rate = stream_config.sample_rate.0;
    let channels = stream_config.channels;

    let mut pending: Vec<i16> = Vec::with_capacity(samples_per_frame);
    let samples_sent = AtomicU64::new(0);

    let stream = device
        .build_input_stream(
            stream_config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                for &sample in data {
                    pending.push(cpal::Sample::to_sample(sample));
                }

                while pending.len() >= samples_per_frame {
                    let rest = pending.split_off(samples_per_frame);
                    let samples = std::mem::replace(&mut pending, rest);

                    let sent = samples_sent.fetch_add(samples.len() as u64, Ordering::Relaxed);
                    let timestamp_ms = sent * 1000 / (sample_rate as u64 * channels as u64);

                    let frame = AudioFrame {
                        samples,
                        sample_rate,
                        channels,
                        timestamp_ms,
                    };

                    // Non-blocking: the callback runs on the audio thread
                    if let Err(e) = frame_tx.try_send(frame) {
                        warn!("Dropping audio frame: {}", e);
                    }
                }
            },
            move |err| {
                error!("Audio stream error: {}", err);
            },
            None,
        )
        .context("Failed to build input stream")?;

    Ok(stream)
}
