//! User actions and asynchronous backend notifications.

use crate::capture::SessionId;
use std::path::PathBuf;

/// A user-initiated action. File actions carry `None` when the picker was
/// dismissed without a selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LoadVideo(Option<PathBuf>),
    LoadPhoto(Option<PathBuf>),
    LoadMusic(Option<PathBuf>),
    TogglePlay,
    /// Apply the trim inputs and start the preview loop.
    SetTrim,
    AddOverlay,
    RemoveOverlay,
    Screenshot,
    Export,
    Reset,
}

/// Notifications delivered to the single editor thread.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// The play-head advanced.
    TimeUpdate,
    /// The deferred export stop is due.
    StopTimerFired(SessionId),
    /// The recorder produced an encoded fragment.
    DataAvailable { session: SessionId, bytes: Vec<u8> },
    /// The recorder flushed its last fragment.
    RecorderStopped(SessionId),
    RecorderFailed { session: SessionId, message: String },
}

impl EditorEvent {
    /// Session the event refers to, if any.
    pub fn session(&self) -> Option<SessionId> {
        match self {
            Self::TimeUpdate => None,
            Self::StopTimerFired(id) | Self::RecorderStopped(id) => Some(*id),
            Self::DataAvailable { session, .. } | Self::RecorderFailed { session, .. } => {
                Some(*session)
            }
        }
    }
}
