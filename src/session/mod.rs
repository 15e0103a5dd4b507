//! Capture sessions and file intake
//!
//! This module provides the transient state behind both submission paths:
//! - `CaptureSession`: the microphone recording state machine
//! - `FileIntake`: path-based file selection per upload modality

mod capture;
mod intake;

pub use capture::{
    format_elapsed, AudioClip, CaptureSession, CaptureState, ClipPreview, RECORDED_CLIP_NAME,
};
pub use intake::{read_selected, FileIntake, IntakeError, IntakeKind, SelectedFile};
