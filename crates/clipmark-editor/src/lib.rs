//! ClipMark Editor - the single coordinator behind every user action
//!
//! Implements the editing model over pluggable media backends:
//! - Trim window with boundary watch (preview loop)
//! - Caption overlay (at most one)
//! - Still capture and timed clip export sessions
//! - Reset and status reporting

pub mod backend;
pub mod capture;
pub mod editor;
pub mod event;
pub mod state;
pub mod trim;

pub use backend::{
    ArtifactSink, AudioTrack, CaptureRequest, CaptureTap, MediaOpener, PlaybackSurface,
    StillEncoder, StillSurface, StopScheduler,
};
pub use capture::{CaptureSession, SessionId};
pub use editor::{AudioSyncPolicy, Editor, EditorBackends, EXPORT_FILE_NAME, SCREENSHOT_FILE_NAME};
pub use event::{Action, EditorEvent};
pub use state::{EditorState, FormInputs, PlayLabel, Surface};
pub use trim::TrimWindow;
