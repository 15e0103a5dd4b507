use anyhow::Result;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::error::RemoteError;

/// Response of a successful PDF ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexReceipt {
    pub filename: String,
    pub total_pages: u64,
    pub chunks_added: u64,
    pub message: String,
}

/// Remote-reported index statistics snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_documents: u64,
    pub embedding_dimension: u64,
    pub model: String,
}

/// Client for the document indexing service.
pub struct IndexingServiceClient {
    http: reqwest::Client,
    base_url: String,
}

impl IndexingServiceClient {
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

    /// Submit a PDF document for indexing.
    ///
    /// `POST {base}/upload-pdf`, multipart field `file`.
    pub async fn upload_pdf(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<IndexReceipt, RemoteError> {
        let url = format!("{}/upload-pdf", self.base_url);
        debug!("Posting PDF to {} ({} bytes)", url, bytes.len());

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);

        let response = self.http.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            return Err(RemoteError::from_response(response).await);
        }

        Ok(response.json().await?)
    }

    /// Fetch the current statistics snapshot. Never cached; every call hits
    /// the service.
    pub async fn stats(&self) -> Result<IndexStats, RemoteError> {
        let url = format!("{}/stats", self.base_url);
        debug!("Fetching index stats from {}", url);

        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(RemoteError::from_response(response).await);
        }

        Ok(response.json().await?)
    }
}
