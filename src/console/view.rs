use crate::remote::{AudioProcessing, IndexReceipt, IndexStats};
use crate::session::ClipPreview;

/// Placeholder rendered for every stats field when the snapshot fetch fails.
pub const STATS_PLACEHOLDER: &str = "unavailable";

/// Fallback error messages when a failed response carries no `detail`.
pub const AUDIO_FALLBACK_ERROR: &str = "Failed to process audio";
pub const PDF_FALLBACK_ERROR: &str = "Failed to process PDF";

/// Labels used in connection-error messages.
pub const AUDIO_SERVICE_LABEL: &str = "audio service";
pub const INDEXING_SERVICE_LABEL: &str = "indexing service";

/// Rendered statistics snapshot: three scalar fields, each replaced by the
/// fixed placeholder when the fetch failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub total_documents: String,
    pub embedding_dimension: String,
    pub model: String,
}

impl StatsView {
    pub fn from_stats(stats: &IndexStats) -> Self {
        Self {
            total_documents: stats.total_documents.to_string(),
            embedding_dimension: stats.embedding_dimension.to_string(),
            model: stats.model.clone(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            total_documents: STATS_PLACEHOLDER.to_string(),
            embedding_dimension: STATS_PLACEHOLDER.to_string(),
            model: STATS_PLACEHOLDER.to_string(),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "Index statistics\n  documents:           {}\n  embedding dimension: {}\n  model:               {}",
            self.total_documents, self.embedding_dimension, self.model
        )
    }
}

/// Outcome of an audio submission.
#[derive(Debug, Clone)]
pub enum AudioSubmission {
    /// A submission is already in flight; the control is disabled
    Busy,
    /// Nothing selected or recorded; no request was made
    NothingSelected,
    Completed(AudioProcessing),
    Failed { message: String },
}

/// Outcome of a PDF submission.
#[derive(Debug, Clone)]
pub enum PdfSubmission {
    Busy,
    NothingSelected,
    /// Indexed successfully; carries the fresh stats snapshot fetched
    /// immediately after
    Indexed {
        receipt: IndexReceipt,
        stats: StatsView,
    },
    Failed { message: String },
}

pub fn render_audio_result(result: &AudioProcessing) -> String {
    let mut out = format!(
        "Transcription:\n  {}\n\nAnswer:\n  {}",
        result.transcription, result.answer
    );

    if let Some(model) = &result.model {
        out.push_str(&format!("\n\n(answered by {})", model));
    }

    out
}

pub fn render_receipt(receipt: &IndexReceipt) -> String {
    format!(
        "Indexed successfully\n  file:    {}\n  pages:   {}\n  chunks:  {}\n\n{}",
        receipt.filename, receipt.total_pages, receipt.chunks_added, receipt.message
    )
}

pub fn render_error(message: &str) -> String {
    format!("Error: {}", message)
}

pub fn render_preview(preview: &ClipPreview) -> String {
    format!(
        "Recording finished: {} ({:.1}s, {} bytes). Use 'submit' to process it.",
        preview.file_name, preview.duration_secs, preview.byte_len
    )
}
