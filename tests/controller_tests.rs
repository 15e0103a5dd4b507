// End-to-end controller tests against in-process mock services: verbatim
// field rendering, error taxonomy, intake resets and the single stats
// refresh after a successful PDF submission.

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

use echodesk::console::{
    AudioMode, AudioSubmission, Controller, Panel, PdfSubmission, StatsView,
    AUDIO_FALLBACK_ERROR, STATS_PLACEHOLDER,
};
use echodesk::Config;

#[derive(Clone, Default)]
struct Hits {
    stats: Arc<AtomicUsize>,
    uploads: Arc<AtomicUsize>,
}

async fn stats_handler(State(hits): State<Hits>) -> Json<Value> {
    hits.stats.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "total_documents": 5,
        "embedding_dimension": 384,
        "model": "mock-embedder"
    }))
}

async fn serve(router: Router) -> Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Ok(format!("http://{}", addr))
}

/// Indexing mock whose upload handler is the given route; stats hits are
/// counted.
async fn serve_indexing(hits: Hits, upload: Router<Hits>) -> Result<String> {
    let router = upload
        .route("/stats", get(stats_handler))
        .with_state(hits);
    serve(router).await
}

fn test_config(audio_url: &str, indexing_url: &str) -> Config {
    let mut cfg = Config::default();
    cfg.audio_service.base_url = audio_url.to_string();
    cfg.audio_service.timeout_secs = 5;
    cfg.indexing_service.base_url = indexing_url.to_string();
    cfg.indexing_service.timeout_secs = 5;
    cfg
}

/// A local address nothing listens on.
async fn dead_url() -> Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{}", addr))
}

#[tokio::test]
async fn test_pdf_submission_scenario_renders_verbatim_and_resets_intake() -> Result<()> {
    let hits = Hits::default();
    let upload = Router::new().route(
        "/upload-pdf",
        post({
            let hits = hits.clone();
            move || {
                hits.uploads.fetch_add(1, Ordering::SeqCst);
                async {
                    Json(json!({
                        "filename": "notes.pdf",
                        "total_pages": 12,
                        "chunks_added": 37,
                        "message": "Indexed"
                    }))
                }
            }
        }),
    );
    let indexing_url = serve_indexing(hits.clone(), upload).await?;

    let dir = TempDir::new()?;
    let pdf_path = dir.path().join("notes.pdf");
    fs::write(&pdf_path, b"%PDF-1.4 fake")?;

    let cfg = test_config(&dead_url().await?, &indexing_url);
    let mut controller = Controller::new(&cfg)?;

    controller.choose_pdf(&pdf_path)?;
    assert!(controller.pdf_selection().is_some());

    match controller.submit_pdf().await {
        PdfSubmission::Indexed { receipt, stats } => {
            assert_eq!(receipt.filename, "notes.pdf");
            assert_eq!(receipt.total_pages, 12);
            assert_eq!(receipt.chunks_added, 37);
            assert_eq!(receipt.message, "Indexed");

            assert_eq!(stats.total_documents, "5");
            assert_eq!(stats.embedding_dimension, "384");
            assert_eq!(stats.model, "mock-embedder");
        }
        other => panic!("Expected an indexed submission, got {:?}", other),
    }

    // Selection resets to empty and exactly one stats fetch happened
    assert!(controller.pdf_selection().is_none());
    assert_eq!(hits.stats.load(Ordering::SeqCst), 1);
    assert_eq!(hits.uploads.load(Ordering::SeqCst), 1);
    assert!(!controller.pdf_busy());

    Ok(())
}

#[tokio::test]
async fn test_failed_pdf_submission_keeps_selection_and_skips_stats() -> Result<()> {
    let hits = Hits::default();
    let upload = Router::new().route(
        "/upload-pdf",
        post(|| async { (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"detail": "X"}))) }),
    );
    let indexing_url = serve_indexing(hits.clone(), upload).await?;

    let dir = TempDir::new()?;
    let pdf_path = dir.path().join("doc.pdf");
    fs::write(&pdf_path, b"%PDF")?;

    let cfg = test_config(&dead_url().await?, &indexing_url);
    let mut controller = Controller::new(&cfg)?;

    controller.choose_pdf(&pdf_path)?;

    match controller.submit_pdf().await {
        PdfSubmission::Failed { message } => assert_eq!(message, "X"),
        other => panic!("Expected a failed submission, got {:?}", other),
    }

    assert!(controller.pdf_selection().is_some(), "Selection is kept for a manual retry");
    assert_eq!(hits.stats.load(Ordering::SeqCst), 0, "No stats refresh on failure");
    assert!(!controller.pdf_busy(), "Busy flag restored after failure");

    Ok(())
}

#[tokio::test]
async fn test_pdf_submission_without_selection_makes_no_request() -> Result<()> {
    let hits = Hits::default();
    let upload = Router::new().route(
        "/upload-pdf",
        post({
            let hits = hits.clone();
            move || {
                hits.uploads.fetch_add(1, Ordering::SeqCst);
                async { Json(json!({})) }
            }
        }),
    );
    let indexing_url = serve_indexing(hits.clone(), upload).await?;

    let cfg = test_config(&dead_url().await?, &indexing_url);
    let mut controller = Controller::new(&cfg)?;

    // Rejected local validation leaves nothing selected
    assert!(controller.choose_pdf("notes.txt").is_err());

    match controller.submit_pdf().await {
        PdfSubmission::NothingSelected => {}
        other => panic!("Expected NothingSelected, got {:?}", other),
    }

    assert_eq!(hits.uploads.load(Ordering::SeqCst), 0);
    assert_eq!(hits.stats.load(Ordering::SeqCst), 0);

    Ok(())
}

#[tokio::test]
async fn test_audio_upload_success_renders_fields_verbatim() -> Result<()> {
    let audio_router = Router::new().route(
        "/process-audio",
        post(|| async {
            Json(json!({
                "transcription": "qual é o aroma",
                "answer": "doce",
            }))
        }),
    );
    let audio_url = serve(audio_router).await?;

    let dir = TempDir::new()?;
    let clip_path = dir.path().join("question.wav");
    fs::write(&clip_path, b"RIFF fake wav")?;

    let cfg = test_config(&audio_url, &dead_url().await?);
    let mut controller = Controller::new(&cfg)?;

    controller.choose_audio_file(&clip_path)?;

    match controller.submit_audio().await {
        AudioSubmission::Completed(result) => {
            assert_eq!(result.transcription, "qual é o aroma");
            assert_eq!(result.answer, "doce");
        }
        other => panic!("Expected a completed submission, got {:?}", other),
    }

    // The uploaded file stays selected and can be resubmitted
    assert!(controller.audio_selection().is_some());
    assert!(!controller.audio_busy());

    Ok(())
}

#[tokio::test]
async fn test_audio_failure_without_detail_uses_fixed_default() -> Result<()> {
    let audio_router = Router::new().route(
        "/process-audio",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "nope") }),
    );
    let audio_url = serve(audio_router).await?;

    let dir = TempDir::new()?;
    let clip_path = dir.path().join("clip.wav");
    fs::write(&clip_path, b"RIFF")?;

    let cfg = test_config(&audio_url, &dead_url().await?);
    let mut controller = Controller::new(&cfg)?;
    controller.choose_audio_file(&clip_path)?;

    match controller.submit_audio().await {
        AudioSubmission::Failed { message } => assert_eq!(message, AUDIO_FALLBACK_ERROR),
        other => panic!("Expected a failed submission, got {:?}", other),
    }

    assert!(!controller.audio_busy());

    Ok(())
}

#[tokio::test]
async fn test_audio_transport_failure_renders_connection_error() -> Result<()> {
    let dir = TempDir::new()?;
    let clip_path = dir.path().join("clip.wav");
    fs::write(&clip_path, b"RIFF")?;

    let cfg = test_config(&dead_url().await?, &dead_url().await?);
    let mut controller = Controller::new(&cfg)?;
    controller.choose_audio_file(&clip_path)?;

    match controller.submit_audio().await {
        AudioSubmission::Failed { message } => {
            assert!(
                message.starts_with("Could not reach the audio service: "),
                "Unexpected message: {}",
                message
            );
        }
        other => panic!("Expected a failed submission, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_microphone_submit_without_clip_is_a_no_op() -> Result<()> {
    let cfg = test_config(&dead_url().await?, &dead_url().await?);
    let mut controller = Controller::new(&cfg)?;

    controller.select_audio_mode(AudioMode::Microphone);

    match controller.submit_audio().await {
        AudioSubmission::NothingSelected => {}
        other => panic!("Expected NothingSelected, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_document_panel_activation_fetches_stats() -> Result<()> {
    let hits = Hits::default();
    let indexing_url = serve_indexing(hits.clone(), Router::new()).await?;

    let cfg = test_config(&dead_url().await?, &indexing_url);
    let mut controller = Controller::new(&cfg)?;

    let stats = controller.select_panel(Panel::Document).await;
    assert!(stats.is_some());
    assert_eq!(hits.stats.load(Ordering::SeqCst), 1);

    // Switching back to audio does not fetch
    assert!(controller.select_panel(Panel::Audio).await.is_none());
    assert_eq!(hits.stats.load(Ordering::SeqCst), 1);

    Ok(())
}

#[tokio::test]
async fn test_stats_failure_renders_placeholders() -> Result<()> {
    let cfg = test_config(&dead_url().await?, &dead_url().await?);
    let controller = Controller::new(&cfg)?;

    let stats = controller.refresh_stats().await;

    assert_eq!(stats, StatsView::unavailable());
    assert_eq!(stats.total_documents, STATS_PLACEHOLDER);
    assert_eq!(stats.embedding_dimension, STATS_PLACEHOLDER);
    assert_eq!(stats.model, STATS_PLACEHOLDER);

    Ok(())
}
