use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Local validation failures; no service is contacted for these.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Only PDF files are accepted (got '{0}')")]
    NotPdf(String),

    #[error("No such file: {}", .0.display())]
    NotFound(PathBuf),
}

/// One selected file, pending submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    /// Display name (the final path component)
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeKind {
    Audio,
    Pdf,
}

/// File intake for one upload modality.
///
/// Holds at most one selection; a new selection replaces the prior one, and a
/// successful submission clears it.
#[derive(Debug)]
pub struct FileIntake {
    kind: IntakeKind,
    selection: Option<SelectedFile>,
}

impl FileIntake {
    pub fn audio() -> Self {
        Self {
            kind: IntakeKind::Audio,
            selection: None,
        }
    }

    pub fn pdf() -> Self {
        Self {
            kind: IntakeKind::Pdf,
            selection: None,
        }
    }

    /// Validate and store a selection.
    ///
    /// PDF intake rejects file names that do not end in `.pdf` before
    /// touching the filesystem; the prior selection is kept in that case.
    pub fn select(&mut self, path: impl Into<PathBuf>) -> Result<SelectedFile, IntakeError> {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if self.kind == IntakeKind::Pdf && !name.ends_with(".pdf") {
            return Err(IntakeError::NotPdf(name));
        }

        if !path.is_file() {
            return Err(IntakeError::NotFound(path));
        }

        info!("Selected {}: {}", self.label(), name);

        let selected = SelectedFile { path, name };
        self.selection = Some(selected.clone());
        Ok(selected)
    }

    pub fn selection(&self) -> Option<&SelectedFile> {
        self.selection.as_ref()
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.selection.is_some()
    }

    /// Reset the selection to empty.
    pub fn clear(&mut self) {
        self.selection = None;
    }

    fn label(&self) -> &'static str {
        match self.kind {
            IntakeKind::Audio => "audio file",
            IntakeKind::Pdf => "PDF document",
        }
    }
}

/// Read the selected file for submission.
pub async fn read_selected(file: &SelectedFile) -> std::io::Result<Vec<u8>> {
    tokio::fs::read(&file.path).await
}
