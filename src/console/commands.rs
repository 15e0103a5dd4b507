use std::path::PathBuf;
use std::str::FromStr;

use super::panels::{AudioMode, Panel};

/// One parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    /// Switch the active panel
    Tab(Panel),
    /// Switch the audio input mode
    Mode(AudioMode),
    /// Select a file for the active panel
    File(PathBuf),
    /// Start a microphone recording
    Record,
    /// Stop the active recording
    Stop,
    /// Submit the current artifact of the active panel
    Submit,
    /// Refresh the statistics snapshot
    Stats,
}

pub const HELP: &str = "\
Commands:
  tab <audio|document>   switch panel (document shows index stats)
  mode <upload|mic>      audio input mode
  file <path>            select a file for the active panel
  record / stop          control microphone recording
  submit                 submit the selected file or recorded clip
  stats                  refresh index statistics
  help                   show this message
  quit                   exit";

/// Parse one console line. Empty lines are `Help`-free no-ops handled by the
/// caller; everything unrecognized reports why.
pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let Some(head) = line.split_whitespace().next() else {
        return Err(String::new());
    };

    let rest = line[head.len()..].trim();

    match head {
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "tab" | "panel" => {
            if rest.is_empty() {
                return Err("Usage: tab <audio|document>".to_string());
            }
            Panel::from_str(rest).map(Command::Tab)
        }
        "mode" => {
            if rest.is_empty() {
                return Err("Usage: mode <upload|mic>".to_string());
            }
            AudioMode::from_str(rest).map(Command::Mode)
        }
        "file" => {
            if rest.is_empty() {
                return Err("Usage: file <path>".to_string());
            }
            Ok(Command::File(PathBuf::from(rest)))
        }
        "record" => Ok(Command::Record),
        "stop" => Ok(Command::Stop),
        "submit" => Ok(Command::Submit),
        "stats" => Ok(Command::Stats),
        other => Err(format!("Unknown command '{}' (try 'help')", other)),
    }
}
