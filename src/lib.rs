pub mod audio;
pub mod config;
pub mod console;
pub mod remote;
pub mod session;

pub use audio::{
    AudioFrame, CaptureBackend, CaptureBackendConfig, CaptureBackendFactory, LevelMeter,
    MeterSnapshot,
};
pub use config::Config;
pub use console::{AudioMode, Controller, Panel, PanelRouter, StatsView};
pub use remote::{
    AudioProcessing, AudioServiceClient, IndexReceipt, IndexStats, IndexingServiceClient,
    RemoteError,
};
pub use session::{
    AudioClip, CaptureSession, CaptureState, ClipPreview, FileIntake, IntakeError, SelectedFile,
};
