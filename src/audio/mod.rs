pub mod backend;
pub mod encode;
pub mod level;
pub mod microphone;

pub use backend::{
    convert_frame, AudioFrame, CaptureBackend, CaptureBackendConfig, CaptureBackendFactory,
};
pub use encode::{mime_for, wav_bytes};
pub use level::{frame_rms, LevelMeter, MeterSnapshot, METER_BARS, METER_TICK};
pub use microphone::MicrophoneBackend;
