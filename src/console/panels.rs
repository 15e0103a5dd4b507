use std::fmt;
use std::str::FromStr;

/// Top-level panels. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Audio,
    Document,
}

impl Panel {
    pub const ALL: [Panel; 2] = [Panel::Audio, Panel::Document];

    pub fn as_str(&self) -> &'static str {
        match self {
            Panel::Audio => "audio",
            Panel::Document => "document",
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Panel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "audio" => Ok(Panel::Audio),
            "document" | "doc" => Ok(Panel::Document),
            other => Err(format!("Unknown panel '{}'", other)),
        }
    }
}

/// Input modes of the audio panel. Mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioMode {
    Upload,
    Microphone,
}

impl AudioMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioMode::Upload => "upload",
            AudioMode::Microphone => "microphone",
        }
    }
}

impl fmt::Display for AudioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upload" => Ok(AudioMode::Upload),
            "microphone" | "mic" => Ok(AudioMode::Microphone),
            other => Err(format!("Unknown audio mode '{}'", other)),
        }
    }
}

/// Mutually exclusive panel selection.
///
/// The audio panel starts active, in upload mode. Activating the document
/// panel asks the caller for a stats refresh.
#[derive(Debug)]
pub struct PanelRouter {
    active: Panel,
    audio_mode: AudioMode,
}

impl PanelRouter {
    pub fn new() -> Self {
        Self {
            active: Panel::Audio,
            audio_mode: AudioMode::Upload,
        }
    }

    pub fn active(&self) -> Panel {
        self.active
    }

    pub fn is_active(&self, panel: Panel) -> bool {
        self.active == panel
    }

    pub fn audio_mode(&self) -> AudioMode {
        self.audio_mode
    }

    /// Activate `panel`, deactivating the other.
    ///
    /// Returns true when the switch requires a stats refresh (every
    /// activation of the document panel does).
    pub fn select(&mut self, panel: Panel) -> bool {
        self.active = panel;
        panel == Panel::Document
    }

    pub fn select_audio_mode(&mut self, mode: AudioMode) {
        self.audio_mode = mode;
    }
}

impl Default for PanelRouter {
    fn default() -> Self {
        Self::new()
    }
}
