use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::audio::{
    convert_frame, wav_bytes, CaptureBackend, CaptureBackendConfig, CaptureBackendFactory,
    LevelMeter, MeterSnapshot,
};

/// Synthetic file name recorded clips are submitted under.
pub const RECORDED_CLIP_NAME: &str = "recording.wav";

/// Capture session lifecycle.
///
/// `Idle → Recording` on start, `Recording → Ready` on stop (clip available
/// for preview and submission), `Ready → Idle` when the clip is taken or a
/// new recording replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Recording,
    Ready,
}

/// A finalized audio artifact ready for submission.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
    pub duration_secs: f64,
    pub recorded_at: DateTime<Utc>,
}

/// What the UI shows once a recording is finalized.
#[derive(Debug, Clone)]
pub struct ClipPreview {
    pub file_name: String,
    pub duration_secs: f64,
    pub byte_len: usize,
}

/// A microphone capture session.
///
/// Owns the backend while recording, buffers converted frames in memory and
/// finalizes them into a WAV clip on stop. At most one recording is active at
/// a time; the input device is released exactly once, when recording stops.
pub struct CaptureSession {
    config: CaptureBackendConfig,
    state: CaptureState,
    session_id: Uuid,
    backend: Option<Box<dyn CaptureBackend>>,
    capturing: Arc<AtomicBool>,
    samples: Arc<Mutex<Vec<i16>>>,
    drain_task: Option<JoinHandle<()>>,
    meter: LevelMeter,
    meter_rx: Option<watch::Receiver<MeterSnapshot>>,
    started_at: Option<Instant>,
    clip: Option<AudioClip>,
}

impl CaptureSession {
    pub fn new(config: CaptureBackendConfig) -> Self {
        Self {
            config,
            state: CaptureState::Idle,
            session_id: Uuid::new_v4(),
            backend: None,
            capturing: Arc::new(AtomicBool::new(false)),
            samples: Arc::new(Mutex::new(Vec::new())),
            drain_task: None,
            meter: LevelMeter::new(),
            meter_rx: None,
            started_at: None,
            clip: None,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == CaptureState::Recording
    }

    /// Elapsed recording time; zero when no recording is active.
    pub fn elapsed(&self) -> Duration {
        match (self.state, self.started_at) {
            (CaptureState::Recording, Some(started_at)) => started_at.elapsed(),
            _ => Duration::ZERO,
        }
    }

    /// Live meter snapshots while recording.
    pub fn meter(&self) -> Option<watch::Receiver<MeterSnapshot>> {
        self.meter_rx.clone()
    }

    /// Start recording from the default microphone backend.
    pub async fn start(&mut self) -> Result<()> {
        let backend = CaptureBackendFactory::microphone(self.config.clone())?;
        self.start_with_backend(backend).await
    }

    /// Start recording with the given backend.
    ///
    /// If the backend fails to start (device missing, permission denied) the
    /// error is returned and the session stays `Idle`.
    pub async fn start_with_backend(&mut self, mut backend: Box<dyn CaptureBackend>) -> Result<()> {
        if self.state == CaptureState::Recording {
            anyhow::bail!("A recording is already in progress");
        }

        let mut frame_rx = backend
            .start()
            .await
            .context("Could not access the microphone")?;

        // Only mutate session state once the device is actually streaming
        self.session_id = Uuid::new_v4();
        self.clip = None;
        self.capturing.store(true, Ordering::SeqCst);

        {
            let mut samples = self.samples.lock().await;
            samples.clear();
        }

        let samples = Arc::clone(&self.samples);
        let meter = self.meter.clone();
        let target_rate = self.config.target_sample_rate;
        let target_channels = self.config.target_channels;

        let drain_task = tokio::spawn(async move {
            while let Some(frame) = frame_rx.recv().await {
                let frame = convert_frame(frame, target_rate, target_channels);
                meter.update(&frame.samples);

                let mut samples = samples.lock().await;
                samples.extend_from_slice(&frame.samples);
            }
        });

        self.meter_rx = Some(self.meter.spawn_ticker(Arc::clone(&self.capturing)));
        self.drain_task = Some(drain_task);
        self.backend = Some(backend);
        self.started_at = Some(Instant::now());
        self.state = CaptureState::Recording;

        info!("Capture session {} recording", self.session_id);

        Ok(())
    }

    /// Stop recording and finalize the buffered audio into a clip.
    pub async fn stop(&mut self) -> Result<ClipPreview> {
        if self.state != CaptureState::Recording {
            anyhow::bail!("No recording in progress");
        }

        // Stopping the backend releases the device and closes the frame
        // channel, which ends the drain task.
        if let Some(mut backend) = self.backend.take() {
            backend
                .stop()
                .await
                .context("Failed to stop audio capture")?;
        }

        self.capturing.store(false, Ordering::SeqCst);

        if let Some(task) = self.drain_task.take() {
            if task.await.is_err() {
                warn!("Frame drain task panicked");
            }
        }

        self.meter_rx = None;
        self.started_at = None;

        let samples = {
            let mut samples = self.samples.lock().await;
            std::mem::take(&mut *samples)
        };

        let duration_secs = samples.len() as f64
            / (self.config.target_sample_rate as f64 * self.config.target_channels as f64);

        let bytes = wav_bytes(
            &samples,
            self.config.target_sample_rate,
            self.config.target_channels,
        )?;

        info!(
            "Capture session {} finalized: {:.1}s, {} samples, {} bytes",
            self.session_id,
            duration_secs,
            samples.len(),
            bytes.len()
        );

        let clip = AudioClip {
            file_name: RECORDED_CLIP_NAME.to_string(),
            mime: "audio/wav",
            bytes,
            duration_secs,
            recorded_at: Utc::now(),
        };

        let preview = ClipPreview {
            file_name: clip.file_name.clone(),
            duration_secs: clip.duration_secs,
            byte_len: clip.bytes.len(),
        };

        self.clip = Some(clip);
        self.state = CaptureState::Ready;

        Ok(preview)
    }

    /// The finalized clip, when one is ready.
    pub fn clip(&self) -> Option<&AudioClip> {
        self.clip.as_ref()
    }

    /// Consume the finalized clip for submission; returns the session to
    /// `Idle`.
    pub fn take_clip(&mut self) -> Option<AudioClip> {
        let clip = self.clip.take();
        if clip.is_some() {
            self.state = CaptureState::Idle;
        }
        clip
    }
}

/// Render an elapsed duration as `MM:SS` (no hour wrap, zero padded).
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
