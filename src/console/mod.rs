//! Interactive console surface
//!
//! Line-oriented front-end over the [`Controller`]:
//! - `tab audio|document` - panel switching (document refreshes stats)
//! - `file <path>` - select an audio file or PDF for the active panel
//! - `record` / `stop` - microphone capture with a live timer + level meter
//! - `submit` - send the current artifact to the matching service
//! - `stats` - manual statistics refresh

mod commands;
mod controller;
mod panels;
mod view;

pub use commands::{parse, Command, HELP};
pub use controller::Controller;
pub use panels::{AudioMode, Panel, PanelRouter};
pub use view::{
    render_audio_result, render_error, render_preview, render_receipt, AudioSubmission,
    PdfSubmission, StatsView, AUDIO_FALLBACK_ERROR, AUDIO_SERVICE_LABEL, INDEXING_SERVICE_LABEL,
    PDF_FALLBACK_ERROR, STATS_PLACEHOLDER,
};

use anyhow::Result;
use std::io::Write as _;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::audio::MeterSnapshot;
use crate::session::format_elapsed;

/// Run the interactive console until `quit` or end of input.
pub async fn run(mut controller: Controller) -> Result<()> {
    println!("echodesk - audio transcription & document indexing console");
    println!();

    // Stats are shown once on startup
    println!("{}", controller.refresh_stats().await.render());
    println!();
    println!("Type 'help' for commands.");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut monitor: Option<JoinHandle<()>> = None;

    loop {
        print!("[{}]> ", controller.panels().active());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        if line.trim().is_empty() {
            continue;
        }

        let command = match commands::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        match command {
            Command::Help => println!("{}", HELP),
            Command::Quit => break,

            Command::Tab(panel) => {
                if let Some(stats) = controller.select_panel(panel).await {
                    println!("{}", stats.render());
                }
            }

            Command::Mode(mode) => {
                controller.select_audio_mode(mode);
                println!("Audio mode: {}", mode);
            }

            Command::File(path) => {
                let selected = match controller.panels().active() {
                    Panel::Audio => {
                        // Picking a file implies upload mode
                        controller.select_audio_mode(AudioMode::Upload);
                        controller.choose_audio_file(path)
                    }
                    Panel::Document => controller.choose_pdf(path),
                };

                match selected {
                    Ok(file) => println!("Selected: {}", file.name),
                    Err(e) => println!("{}", render_error(&e.to_string())),
                }
            }

            Command::Record => {
                controller.select_audio_mode(AudioMode::Microphone);

                match controller.start_recording().await {
                    Ok(()) => {
                        println!("Recording... type 'stop' to finish.");
                        if let Some(meter_rx) = controller.capture().meter() {
                            monitor = Some(tokio::spawn(monitor_recording(meter_rx)));
                        }
                    }
                    Err(e) => println!("{}", render_error(&format!("{:#}", e))),
                }
            }

            Command::Stop => match controller.stop_recording().await {
                Ok(preview) => {
                    if let Some(task) = monitor.take() {
                        let _ = task.await;
                    }
                    println!("{}", render_preview(&preview));
                }
                Err(e) => println!("{}", render_error(&format!("{:#}", e))),
            },

            Command::Submit => match controller.panels().active() {
                Panel::Audio => {
                    println!("Processing audio...");
                    match controller.submit_audio().await {
                        AudioSubmission::Completed(result) => {
                            println!("{}", render_audio_result(&result))
                        }
                        AudioSubmission::Failed { message } => {
                            println!("{}", render_error(&message))
                        }
                        AudioSubmission::Busy => println!("A submission is already in flight."),
                        AudioSubmission::NothingSelected => {
                            println!("Nothing to submit: select a file or record a clip first.")
                        }
                    }
                }
                Panel::Document => {
                    println!("Uploading PDF...");
                    match controller.submit_pdf().await {
                        PdfSubmission::Indexed { receipt, stats } => {
                            println!("{}", render_receipt(&receipt));
                            println!();
                            println!("{}", stats.render());
                        }
                        PdfSubmission::Failed { message } => println!("{}", render_error(&message)),
                        PdfSubmission::Busy => println!("A submission is already in flight."),
                        PdfSubmission::NothingSelected => {
                            println!("Nothing to submit: select a PDF first.")
                        }
                    }
                }
            },

            Command::Stats => println!("{}", controller.refresh_stats().await.render()),
        }
    }

    if let Some(task) = monitor.take() {
        task.abort();
    }

    Ok(())
}

/// Render the elapsed timer and level meter in place while recording.
///
/// Driven by the meter ticker; exits on its own when the ticker closes the
/// channel after capture stops.
async fn monitor_recording(mut meter_rx: watch::Receiver<MeterSnapshot>) {
    let started = Instant::now();

    while meter_rx.changed().await.is_ok() {
        let snapshot = meter_rx.borrow().clone();
        print!(
            "\r  {}  {}",
            format_elapsed(started.elapsed()),
            render_bars(&snapshot)
        );
        std::io::Write::flush(&mut std::io::stdout()).ok();
    }

    println!();
}

fn render_bars(snapshot: &MeterSnapshot) -> String {
    const GLYPHS: [char; 9] = [' ', '\u{2581}', '\u{2582}', '\u{2583}', '\u{2584}', '\u{2585}', '\u{2586}', '\u{2587}', '\u{2588}'];

    snapshot
        .bars
        .iter()
        .map(|&height| {
            let idx = (height * (GLYPHS.len() - 1) as f32).round() as usize;
            GLYPHS[idx.min(GLYPHS.len() - 1)]
        })
        .collect()
}
