use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use echodesk::console::{
    self, render_audio_result, render_error, render_preview, render_receipt, AudioMode,
    AudioSubmission, Controller, PdfSubmission,
};
use echodesk::Config;

#[derive(Parser)]
#[command(name = "echodesk")]
#[command(about = "Terminal console for audio transcription + answering and PDF indexing")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long, default_value = "config/echodesk")]
    config: String,

    /// Override the audio service base URL
    #[arg(long)]
    audio_url: Option<String>,

    /// Override the indexing service base URL
    #[arg(long)]
    indexing_url: Option<String>,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Interactive console (the default)
    Console,
    /// Submit an audio file for transcription + answering
    Process { file: PathBuf },
    /// Record from the microphone until Enter, then submit
    Record,
    /// Submit a PDF document for indexing
    Index { file: PathBuf },
    /// Show index statistics
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let mut cfg = Config::load_or_default(&args.config)?;
    if let Some(url) = args.audio_url {
        cfg.audio_service.base_url = url;
    }
    if let Some(url) = args.indexing_url {
        cfg.indexing_service.base_url = url;
    }

    info!("{} starting", cfg.service.name);
    info!("Audio service: {}", cfg.audio_service.base_url);
    info!("Indexing service: {}", cfg.indexing_service.base_url);

    let mut controller = Controller::new(&cfg)?;

    match args.command {
        None | Some(CliCommand::Console) => console::run(controller).await,
        Some(CliCommand::Process { file }) => process_file(&mut controller, file).await,
        Some(CliCommand::Record) => record_and_submit(&mut controller).await,
        Some(CliCommand::Index { file }) => index_pdf(&mut controller, file).await,
        Some(CliCommand::Stats) => {
            println!("{}", controller.refresh_stats().await.render());
            Ok(())
        }
    }
}

async fn process_file(controller: &mut Controller, file: PathBuf) -> Result<()> {
    let selected = controller.choose_audio_file(file)?;
    println!("Processing {}...", selected.name);

    match controller.submit_audio().await {
        AudioSubmission::Completed(result) => println!("{}", render_audio_result(&result)),
        AudioSubmission::Failed { message } => println!("{}", render_error(&message)),
        AudioSubmission::Busy | AudioSubmission::NothingSelected => {}
    }

    Ok(())
}

async fn record_and_submit(controller: &mut Controller) -> Result<()> {
    controller.select_audio_mode(AudioMode::Microphone);
    controller.start_recording().await?;

    println!("Recording... press Enter to stop.");
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;

    let preview = controller.stop_recording().await?;
    println!("{}", render_preview(&preview));
    println!("Processing audio...");

    match controller.submit_audio().await {
        AudioSubmission::Completed(result) => println!("{}", render_audio_result(&result)),
        AudioSubmission::Failed { message } => println!("{}", render_error(&message)),
        AudioSubmission::Busy | AudioSubmission::NothingSelected => {}
    }

    Ok(())
}

async fn index_pdf(controller: &mut Controller, file: PathBuf) -> Result<()> {
    let selected = controller.choose_pdf(file)?;
    println!("Uploading {}...", selected.name);

    match controller.submit_pdf().await {
        PdfSubmission::Indexed { receipt, stats } => {
            println!("{}", render_receipt(&receipt));
            println!();
            println!("{}", stats.render());
        }
        PdfSubmission::Failed { message } => println!("{}", render_error(&message)),
        PdfSubmission::Busy | PdfSubmission::NothingSelected => {}
    }

    Ok(())
}
