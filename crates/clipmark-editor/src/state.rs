//! Editor state: every piece of mutable editing state in one struct.
//!
//! Fields are private; the coordinator mutates them through the
//! crate-visible setters and the UI reads them through the accessors.

use crate::capture::{CaptureSession, SessionCounter, SessionId};
use crate::trim::TrimWindow;
use clipmark_core::{Overlay, OverlayPosition, Status, StatusLine};
use std::fmt;

/// Label of the play/pause affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayLabel {
    #[default]
    Play,
    Pause,
}

impl fmt::Display for PlayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Play => f.write_str("▶ Play"),
            Self::Pause => f.write_str("⏸ Pause"),
        }
    }
}

/// Which preview surface is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Surface {
    #[default]
    Video,
    Photo,
}

/// Raw contents of the editable form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInputs {
    pub trim_start: String,
    pub trim_end: String,
    pub caption: String,
    pub position: OverlayPosition,
}

impl FormInputs {
    /// Clear the text fields. The position selector keeps its choice.
    pub fn clear_text(&mut self) {
        self.trim_start.clear();
        self.trim_end.clear();
        self.caption.clear();
    }
}

#[derive(Debug, Default)]
pub struct EditorState {
    trim: TrimWindow,
    overlay: Option<Overlay>,
    inputs: FormInputs,
    play_label: PlayLabel,
    status: StatusLine,
    visible: Surface,
    capture: Option<CaptureSession>,
    sessions: SessionCounter,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trim(&self) -> TrimWindow {
        self.trim
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn inputs(&self) -> &FormInputs {
        &self.inputs
    }

    pub fn inputs_mut(&mut self) -> &mut FormInputs {
        &mut self.inputs
    }

    pub fn play_label(&self) -> PlayLabel {
        self.play_label
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn visible_surface(&self) -> Surface {
        self.visible
    }

    pub fn capture(&self) -> Option<&CaptureSession> {
        self.capture.as_ref()
    }

    /// Id of the in-flight capture session, if any.
    pub fn active_session(&self) -> Option<SessionId> {
        self.capture.as_ref().map(CaptureSession::id)
    }

    pub(crate) fn set_trim(&mut self, trim: TrimWindow) {
        self.trim = trim;
    }

    /// Replace the caption, returning the one it displaced.
    pub(crate) fn replace_overlay(&mut self, overlay: Option<Overlay>) -> Option<Overlay> {
        std::mem::replace(&mut self.overlay, overlay)
    }

    pub(crate) fn set_play_label(&mut self, label: PlayLabel) {
        self.play_label = label;
    }

    pub(crate) fn publish(&mut self, status: Status) {
        self.status.set(status);
    }

    pub(crate) fn show_surface(&mut self, surface: Surface) {
        self.visible = surface;
    }

    pub(crate) fn next_session_id(&mut self) -> SessionId {
        self.sessions.next()
    }

    pub(crate) fn begin_capture(&mut self, session: CaptureSession) -> Option<CaptureSession> {
        self.capture.replace(session)
    }

    pub(crate) fn capture_mut(&mut self) -> Option<&mut CaptureSession> {
        self.capture.as_mut()
    }

    /// Take the current session only if it is `session`.
    pub(crate) fn take_capture(&mut self, session: SessionId) -> Option<CaptureSession> {
        if self.active_session() == Some(session) {
            self.capture.take()
        } else {
            None
        }
    }

    pub(crate) fn abandon_capture(&mut self) -> Option<CaptureSession> {
        self.capture.take()
    }
}
