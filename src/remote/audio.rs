use anyhow::Result;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::error::RemoteError;

/// Response of the audio processing endpoint: the transcription of the clip
/// and the answer generated from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioProcessing {
    pub transcription: String,
    pub answer: String,
    /// Model the answering service used, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Client for the audio processing service.
pub struct AudioServiceClient {
    http: reqwest::Client,
    base_url: String,
}

impl AudioServiceClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit an audio payload for transcription + answering.
    ///
    /// `POST {base}/process-audio`, multipart field `file`.
    pub async fn process(
        &self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<AudioProcessing, RemoteError> {
        let url = format!("{}/process-audio", self.base_url);
        debug!("Posting audio clip to {} ({} bytes)", url, bytes.len());

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = Form::new().part("file", part);

        let response = self.http.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            return Err(RemoteError::from_response(response).await);
        }

        Ok(response.json().await?)
    }
}
