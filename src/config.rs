use anyhow::Result;
use serde::Deserialize;

/// Default base URLs for the two collaborating services.
pub const DEFAULT_AUDIO_SERVICE_URL: &str = "http://localhost:8000";
pub const DEFAULT_INDEXING_SERVICE_URL: &str = "http://localhost:8002";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio_service: RemoteServiceConfig,
    pub indexing_service: RemoteServiceConfig,
    pub capture: CaptureConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
}

/// Connection settings for one remote service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteServiceConfig {
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Target sample rate for recorded clips (Whisper expects 16kHz)
    pub sample_rate: u32,

    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,

    /// Capture buffer size in milliseconds (affects latency)
    pub buffer_duration_ms: u64,

    /// Input device name; default input device when unset
    pub device: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            audio_service: RemoteServiceConfig {
                base_url: DEFAULT_AUDIO_SERVICE_URL.to_string(),
                // The audio path covers transcription plus answering
                timeout_secs: 300,
            },
            indexing_service: RemoteServiceConfig {
                base_url: DEFAULT_INDEXING_SERVICE_URL.to_string(),
                timeout_secs: 120,
            },
            capture: CaptureConfig::default(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "echodesk".to_string(),
        }
    }
}

impl Default for RemoteServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_AUDIO_SERVICE_URL.to_string(),
            timeout_secs: 120,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
            buffer_duration_ms: 100,
            device: None,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load `path` if it exists, falling back to built-in defaults otherwise.
    pub fn load_or_default(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
