//! Status line: the single latest message describing the last action.

use crate::time::{RationalTime, TimeBound};
use std::fmt;

/// Fixed status messages published by editor actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ready,
    VideoLoaded,
    PhotoLoaded,
    MusicReady,
    Previewing { start: RationalTime, end: TimeBound },
    OverlayAdded,
    OverlayRemoved,
    ScreenshotSaved,
    Recording,
    ExportFinished,
    ResetComplete,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => f.write_str("Ready"),
            Self::VideoLoaded => f.write_str("Video loaded"),
            Self::PhotoLoaded => f.write_str("Photo loaded"),
            Self::MusicReady => f.write_str("Background music ready"),
            Self::Previewing { start, end } => match end {
                TimeBound::Finite(end) => {
                    write!(f, "Previewing {}s – {}s", start.compact(), end.compact())
                }
                TimeBound::Unbounded => write!(f, "Previewing {}s – end", start.compact()),
            },
            Self::OverlayAdded => f.write_str("Overlay added"),
            Self::OverlayRemoved => f.write_str("Overlay removed"),
            Self::ScreenshotSaved => f.write_str("Screenshot saved"),
            Self::Recording => f.write_str("Recording…"),
            Self::ExportFinished => f.write_str("Export finished (WEBM)"),
            Self::ResetComplete => f.write_str("Reset complete"),
        }
    }
}

/// Holds only the most recent status; no history is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLine {
    latest: Status,
}

impl StatusLine {
    pub fn new() -> Self {
        Self {
            latest: Status::Ready,
        }
    }

    /// Overwrite the current message.
    pub fn set(&mut self, status: Status) {
        self.latest = status;
    }

    pub fn latest(&self) -> Status {
        self.latest
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.latest.fmt(f)
    }
}
