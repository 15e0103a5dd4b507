// Tests for file intake: PDF extension gate, selection replacement and
// clearing. Local validation failures must never enable submission.

use anyhow::Result;
use echodesk::session::{FileIntake, IntakeError};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_pdf_intake_rejects_non_pdf_names() {
    let mut intake = FileIntake::pdf();

    let err = intake.select("notes.txt").unwrap_err();
    assert!(matches!(err, IntakeError::NotPdf(_)));
    assert!(!intake.can_submit(), "Rejected selection must not enable submission");
    assert!(intake.selection().is_none());
}

#[test]
fn test_pdf_intake_extension_check_is_case_sensitive_like_a_name_suffix() {
    let mut intake = FileIntake::pdf();

    // The gate is a plain name-suffix check
    let err = intake.select("REPORT.PDF").unwrap_err();
    assert!(matches!(err, IntakeError::NotPdf(_)));
}

#[test]
fn test_pdf_intake_accepts_pdf_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("notes.pdf");
    fs::write(&path, b"%PDF-1.4 fake")?;

    let mut intake = FileIntake::pdf();
    let selected = intake.select(&path)?;

    assert_eq!(selected.name, "notes.pdf");
    assert!(intake.can_submit());

    Ok(())
}

#[test]
fn test_intake_rejects_missing_file() {
    let mut intake = FileIntake::audio();

    let err = intake.select("/nonexistent/clip.wav").unwrap_err();
    assert!(matches!(err, IntakeError::NotFound(_)));
    assert!(!intake.can_submit());
}

#[test]
fn test_new_selection_replaces_prior_one() -> Result<()> {
    let dir = TempDir::new()?;
    let first = dir.path().join("first.wav");
    let second = dir.path().join("second.wav");
    fs::write(&first, b"RIFF")?;
    fs::write(&second, b"RIFF")?;

    let mut intake = FileIntake::audio();
    intake.select(&first)?;
    intake.select(&second)?;

    assert_eq!(intake.selection().unwrap().name, "second.wav");

    Ok(())
}

#[test]
fn test_failed_selection_keeps_prior_one() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("doc.pdf");
    fs::write(&path, b"%PDF")?;

    let mut intake = FileIntake::pdf();
    intake.select(&path)?;
    assert!(intake.select("not-a-pdf.txt").is_err());

    assert_eq!(intake.selection().unwrap().name, "doc.pdf");
    assert!(intake.can_submit());

    Ok(())
}

#[test]
fn test_clear_resets_selection() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("doc.pdf");
    fs::write(&path, b"%PDF")?;

    let mut intake = FileIntake::pdf();
    intake.select(&path)?;
    intake.clear();

    assert!(intake.selection().is_none());
    assert!(!intake.can_submit());

    Ok(())
}
