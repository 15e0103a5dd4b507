use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use super::panels::{AudioMode, Panel, PanelRouter};
use super::view::{
    AudioSubmission, PdfSubmission, StatsView, AUDIO_FALLBACK_ERROR, AUDIO_SERVICE_LABEL,
    INDEXING_SERVICE_LABEL, PDF_FALLBACK_ERROR,
};
use crate::audio::{mime_for, CaptureBackendConfig};
use crate::config::Config;
use crate::remote::{AudioServiceClient, IndexingServiceClient};
use crate::session::{
    read_selected, CaptureSession, ClipPreview, FileIntake, IntakeError, SelectedFile,
};

/// The capture & upload controller.
///
/// Owns the panel router, one intake per upload modality, the microphone
/// capture session and the two service clients. One handler method per UI
/// event; submission handlers disable their triggering control for the
/// duration and restore it on every exit path.
pub struct Controller {
    panels: PanelRouter,
    audio_intake: FileIntake,
    pdf_intake: FileIntake,
    capture: CaptureSession,
    audio_client: AudioServiceClient,
    indexing_client: IndexingServiceClient,
    audio_busy: bool,
    pdf_busy: bool,
}

impl Controller {
    pub fn new(config: &Config) -> Result<Self> {
        let audio_client = AudioServiceClient::new(
            config.audio_service.base_url.clone(),
            Duration::from_secs(config.audio_service.timeout_secs),
        )?;

        let indexing_client = IndexingServiceClient::new(
            config.indexing_service.base_url.clone(),
            Duration::from_secs(config.indexing_service.timeout_secs),
        )?;

        Ok(Self {
            panels: PanelRouter::new(),
            audio_intake: FileIntake::audio(),
            pdf_intake: FileIntake::pdf(),
            capture: CaptureSession::new(CaptureBackendConfig::from(&config.capture)),
            audio_client,
            indexing_client,
            audio_busy: false,
            pdf_busy: false,
        })
    }

    pub fn panels(&self) -> &PanelRouter {
        &self.panels
    }

    pub fn capture(&self) -> &CaptureSession {
        &self.capture
    }

    pub fn capture_mut(&mut self) -> &mut CaptureSession {
        &mut self.capture
    }

    pub fn audio_busy(&self) -> bool {
        self.audio_busy
    }

    pub fn pdf_busy(&self) -> bool {
        self.pdf_busy
    }

    pub fn pdf_selection(&self) -> Option<&SelectedFile> {
        self.pdf_intake.selection()
    }

    pub fn audio_selection(&self) -> Option<&SelectedFile> {
        self.audio_intake.selection()
    }

    /// Activate a panel; returns the fresh stats snapshot when the document
    /// panel was activated.
    pub async fn select_panel(&mut self, panel: Panel) -> Option<StatsView> {
        if self.panels.select(panel) {
            Some(self.refresh_stats().await)
        } else {
            None
        }
    }

    pub fn select_audio_mode(&mut self, mode: AudioMode) {
        self.panels.select_audio_mode(mode);
    }

    pub fn choose_audio_file(
        &mut self,
        path: impl Into<PathBuf>,
    ) -> Result<SelectedFile, IntakeError> {
        self.audio_intake.select(path)
    }

    pub fn choose_pdf(&mut self, path: impl Into<PathBuf>) -> Result<SelectedFile, IntakeError> {
        self.pdf_intake.select(path)
    }

    /// Start a microphone recording. On device failure the capture state is
    /// unchanged and the error is surfaced to the caller.
    pub async fn start_recording(&mut self) -> Result<()> {
        self.capture.start().await
    }

    /// Stop the active recording and finalize the clip.
    pub async fn stop_recording(&mut self) -> Result<ClipPreview> {
        self.capture.stop().await
    }

    /// Submit the current audio artifact (selected file or recorded clip,
    /// depending on the active audio mode) for transcription + answering.
    pub async fn submit_audio(&mut self) -> AudioSubmission {
        if self.audio_busy {
            return AudioSubmission::Busy;
        }

        let (file_name, mime, bytes) = match self.panels.audio_mode() {
            AudioMode::Upload => {
                let Some(selected) = self.audio_intake.selection() else {
                    return AudioSubmission::NothingSelected;
                };

                match read_selected(selected).await {
                    Ok(bytes) => (selected.name.clone(), mime_for(&selected.name), bytes),
                    Err(e) => {
                        return AudioSubmission::Failed {
                            message: format!("Could not read {}: {}", selected.name, e),
                        }
                    }
                }
            }
            AudioMode::Microphone => {
                let Some(clip) = self.capture.clip() else {
                    return AudioSubmission::NothingSelected;
                };
                (clip.file_name.clone(), clip.mime, clip.bytes.clone())
            }
        };

        info!("Submitting audio '{}' ({} bytes)", file_name, bytes.len());

        self.audio_busy = true;
        let result = self.audio_client.process(&file_name, mime, bytes).await;
        self.audio_busy = false;

        match result {
            Ok(processing) => {
                // A submitted recording is consumed; the session returns to
                // idle until a new one replaces it.
                if self.panels.audio_mode() == AudioMode::Microphone {
                    self.capture.take_clip();
                }
                AudioSubmission::Completed(processing)
            }
            Err(e) => AudioSubmission::Failed {
                message: e.user_message(AUDIO_SERVICE_LABEL, AUDIO_FALLBACK_ERROR),
            },
        }
    }

    /// Submit the selected PDF for indexing. Success clears the selection and
    /// fetches exactly one fresh stats snapshot.
    pub async fn submit_pdf(&mut self) -> PdfSubmission {
        if self.pdf_busy {
            return PdfSubmission::Busy;
        }

        let Some(selected) = self.pdf_intake.selection() else {
            return PdfSubmission::NothingSelected;
        };

        let file_name = selected.name.clone();
        let bytes = match read_selected(selected).await {
            Ok(bytes) => bytes,
            Err(e) => {
                return PdfSubmission::Failed {
                    message: format!("Could not read {}: {}", file_name, e),
                }
            }
        };

        info!("Submitting PDF '{}' ({} bytes)", file_name, bytes.len());

        self.pdf_busy = true;
        let result = self.indexing_client.upload_pdf(&file_name, bytes).await;
        self.pdf_busy = false;

        match result {
            Ok(receipt) => {
                self.pdf_intake.clear();
                let stats = self.refresh_stats().await;
                PdfSubmission::Indexed { receipt, stats }
            }
            Err(e) => PdfSubmission::Failed {
                message: e.user_message(INDEXING_SERVICE_LABEL, PDF_FALLBACK_ERROR),
            },
        }
    }

    /// Fetch the statistics snapshot; failures render as the fixed
    /// placeholder view.
    pub async fn refresh_stats(&self) -> StatsView {
        match self.indexing_client.stats().await {
            Ok(stats) => StatsView::from_stats(&stats),
            Err(e) => {
                warn!("Stats fetch failed: {}", e);
                StatsView::unavailable()
            }
        }
    }
}
