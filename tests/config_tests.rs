// Tests for configuration loading and defaults.

use anyhow::Result;
use echodesk::Config;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_defaults_point_at_local_services() {
    let cfg = Config::default();

    assert_eq!(cfg.audio_service.base_url, "http://localhost:8000");
    assert_eq!(cfg.indexing_service.base_url, "http://localhost:8002");
    assert_eq!(cfg.capture.sample_rate, 16000);
    assert_eq!(cfg.capture.channels, 1);
}

#[test]
fn test_load_reads_toml_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("echodesk.toml");
    fs::write(
        &path,
        r#"
[service]
name = "test-console"

[audio_service]
base_url = "http://audio.internal:9000"
timeout_secs = 60

[indexing_service]
base_url = "http://rag.internal:9002"
timeout_secs = 30

[capture]
sample_rate = 48000
channels = 2
buffer_duration_ms = 50
device = "USB Microphone"
"#,
    )?;

    let cfg = Config::load(path.to_str().unwrap())?;

    assert_eq!(cfg.service.name, "test-console");
    assert_eq!(cfg.audio_service.base_url, "http://audio.internal:9000");
    assert_eq!(cfg.audio_service.timeout_secs, 60);
    assert_eq!(cfg.indexing_service.base_url, "http://rag.internal:9002");
    assert_eq!(cfg.capture.sample_rate, 48000);
    assert_eq!(cfg.capture.channels, 2);
    assert_eq!(cfg.capture.device.as_deref(), Some("USB Microphone"));

    Ok(())
}

#[test]
fn test_load_or_default_tolerates_missing_file() -> Result<()> {
    let cfg = Config::load_or_default("/nonexistent/echodesk-config")?;

    assert_eq!(cfg.audio_service.base_url, "http://localhost:8000");

    Ok(())
}

#[test]
fn test_partial_file_fills_missing_sections_with_defaults() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("partial.toml");
    fs::write(
        &path,
        r#"
[audio_service]
base_url = "http://gateway:8000"
"#,
    )?;

    let cfg = Config::load(path.to_str().unwrap())?;

    assert_eq!(cfg.audio_service.base_url, "http://gateway:8000");
    assert_eq!(cfg.indexing_service.base_url, "http://localhost:8002");
    assert_eq!(cfg.capture.sample_rate, 16000);

    Ok(())
}

#[test]
fn test_load_missing_file_is_an_error() {
    assert!(Config::load("/nonexistent/echodesk-config").is_err());
}
