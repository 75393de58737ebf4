//! The editor coordinator.
//!
//! `Editor` owns the editing state, the media bindings and the backend
//! seams. Every user action and every backend notification goes through
//! one of its methods on a single thread; nothing else mutates state.

use crate::backend::{
    ArtifactSink, AudioTrack, CaptureRequest, CaptureTap, MediaOpener, PlaybackSurface,
    StillEncoder, StillSurface, StopScheduler,
};
use crate::capture::{CaptureSession, SessionId};
use crate::event::{Action, EditorEvent};
use crate::state::{EditorState, FormInputs, PlayLabel, Surface};
use crate::trim::TrimWindow;
use clipmark_core::{ClipMarkError, Overlay, RationalTime, Result, Status};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name of saved still captures.
pub const SCREENSHOT_FILE_NAME: &str = "screenshot.png";

/// File name of exported clips.
pub const EXPORT_FILE_NAME: &str = "exported_trim.webm";

const NOT_READY: &str = "Load a video first";

/// How background music relates to the primary media clock.
///
/// Only the play/pause lifecycle is ever mirrored; the two clocks are never
/// drift-corrected against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioSyncPolicy {
    /// The music loop keeps its own position across previews and exports.
    #[default]
    FreeRunning,
    /// The music restarts from its beginning whenever a trim preview or
    /// export starts.
    RestartWithTrim,
}

/// Backend implementations the editor drives.
pub struct EditorBackends {
    pub opener: Box<dyn MediaOpener>,
    pub tap: Box<dyn CaptureTap>,
    pub scheduler: Box<dyn StopScheduler>,
    pub stills: Box<dyn StillEncoder>,
    pub sink: Box<dyn ArtifactSink>,
}

/// Currently bound media. Each slot is replaced independently.
#[derive(Default)]
struct MediaBindings {
    video: Option<Box<dyn PlaybackSurface>>,
    photo: Option<Box<dyn StillSurface>>,
    music: Option<Box<dyn AudioTrack>>,
}

impl MediaBindings {
    /// Video binding with known dimensions.
    fn ready_video(&mut self) -> Result<&mut Box<dyn PlaybackSurface>> {
        match self.video.as_mut() {
            Some(video) if video.dimensions().is_some() => Ok(video),
            _ => Err(ClipMarkError::NotReady(NOT_READY.to_string())),
        }
    }

    fn play_music(&mut self) {
        if let Some(music) = self.music.as_mut() {
            if let Err(e) = music.play() {
                warn!(error = %e, "Background music failed to play");
            }
        }
    }

    fn pause_music(&mut self) {
        if let Some(music) = self.music.as_mut() {
            music.pause();
        }
    }

    fn pause_all(&mut self) {
        if let Some(video) = self.video.as_mut() {
            video.pause();
        }
        self.pause_music();
    }
}

/// Single coordinator for every editing action.
pub struct Editor {
    state: EditorState,
    media: MediaBindings,
    backends: EditorBackends,
    audio_sync: AudioSyncPolicy,
}

impl Editor {
    pub fn new(backends: EditorBackends) -> Self {
        Self {
            state: EditorState::new(),
            media: MediaBindings::default(),
            backends,
            audio_sync: AudioSyncPolicy::default(),
        }
    }

    pub fn with_audio_sync(mut self, policy: AudioSyncPolicy) -> Self {
        self.audio_sync = policy;
        self
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Editable form fields (trim inputs, caption, position).
    pub fn inputs_mut(&mut self) -> &mut FormInputs {
        self.state.inputs_mut()
    }

    pub fn audio_sync(&self) -> AudioSyncPolicy {
        self.audio_sync
    }

    pub fn has_video(&self) -> bool {
        self.media.video.is_some()
    }

    pub fn has_music(&self) -> bool {
        self.media.music.is_some()
    }

    /// Whether the video binding is currently playing.
    pub fn is_playing(&self) -> bool {
        self.media.video.as_ref().is_some_and(|v| !v.is_paused())
    }

    pub fn video(&self) -> Option<&dyn PlaybackSurface> {
        self.media.video.as_deref()
    }

    pub fn video_mut(&mut self) -> Option<&mut (dyn PlaybackSurface + 'static)> {
        self.media.video.as_deref_mut()
    }

    pub fn photo(&self) -> Option<&dyn StillSurface> {
        self.media.photo.as_deref()
    }

    /// Route a UI action to its handler.
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        debug!(?action, "Dispatching action");
        match action {
            Action::LoadVideo(path) => self.load_video(path.as_deref()),
            Action::LoadPhoto(path) => self.load_photo(path.as_deref()),
            Action::LoadMusic(path) => self.load_music(path.as_deref()),
            Action::TogglePlay => self.toggle_play(),
            Action::SetTrim => self.set_trim().map(|_| ()),
            Action::AddOverlay => {
                self.add_overlay();
                Ok(())
            }
            Action::RemoveOverlay => {
                self.remove_overlay();
                Ok(())
            }
            Action::Screenshot => self.screenshot().map(|_| ()),
            Action::Export => self.export().map(|_| ()),
            Action::Reset => {
                self.reset();
                Ok(())
            }
        }
    }

    // ── Media loader ───────────────────────────────────────────

    /// Bind a new video, releasing the previous one. `None` is a no-op.
    pub fn load_video(&mut self, path: Option<&Path>) -> Result<()> {
        let Some(path) = path else {
            return Ok(());
        };
        let surface = self.backends.opener.open_video(path)?;
        if let Some(mut old) = self.media.video.replace(surface) {
            old.pause();
            old.release();
        }
        self.state.show_surface(Surface::Video);
        self.state.publish(Status::VideoLoaded);
        info!(path = %path.display(), "Video loaded");
        Ok(())
    }

    /// Bind a new photo, releasing the previous one. `None` is a no-op.
    pub fn load_photo(&mut self, path: Option<&Path>) -> Result<()> {
        let Some(path) = path else {
            return Ok(());
        };
        let still = self.backends.opener.open_photo(path)?;
        if let Some(mut old) = self.media.photo.replace(still) {
            old.release();
        }
        self.state.show_surface(Surface::Photo);
        self.state.publish(Status::PhotoLoaded);
        info!(path = %path.display(), "Photo loaded");
        Ok(())
    }

    /// Replace the background track. The old track is paused and released
    /// first; the visible surface does not change.
    pub fn load_music(&mut self, path: Option<&Path>) -> Result<()> {
        let Some(path) = path else {
            return Ok(());
        };
        if let Some(mut old) = self.media.music.take() {
            old.pause();
            old.release();
        }
        self.media.music = Some(self.backends.opener.open_audio(path)?);
        self.state.publish(Status::MusicReady);
        info!(path = %path.display(), "Background music ready");
        Ok(())
    }

    // ── Playback controller ────────────────────────────────────

    /// Play both streams if the video is paused, otherwise pause both.
    pub fn toggle_play(&mut self) -> Result<()> {
        let video = self
            .media
            .video
            .as_mut()
            .ok_or_else(|| ClipMarkError::NotReady(NOT_READY.to_string()))?;
        if video.is_paused() {
            video.play()?;
            self.media.play_music();
            self.state.set_play_label(PlayLabel::Pause);
        } else {
            video.pause();
            self.media.pause_music();
            self.state.set_play_label(PlayLabel::Play);
        }
        Ok(())
    }

    // ── Trim window ────────────────────────────────────────────

    /// Apply the trim inputs and start previewing the window.
    ///
    /// `start >= end` is rejected and leaves the stored window unchanged.
    pub fn set_trim(&mut self) -> Result<TrimWindow> {
        let duration = self.media.video.as_ref().and_then(|v| v.duration());
        let inputs = self.state.inputs();
        let window = TrimWindow::from_inputs(&inputs.trim_start, &inputs.trim_end, duration)?;

        self.state.set_trim(window);
        self.state.publish(Status::Previewing {
            start: window.start(),
            end: window.end(),
        });
        info!(start = %window.start(), end = %window.end(), "Trim window set");

        if let Some(video) = self.media.video.as_mut() {
            video.seek(window.start());
            video.play()?;
            self.start_music_with_trim();
        }
        Ok(window)
    }

    fn start_music_with_trim(&mut self) {
        if self.audio_sync == AudioSyncPolicy::RestartWithTrim {
            if let Some(music) = self.media.music.as_mut() {
                music.restart();
            }
        }
        self.media.play_music();
    }

    /// Boundary watch: once the play-head reaches the window end, pause both
    /// streams and rewind to the window start. Media that runs out first
    /// stops both streams where it ended.
    ///
    /// Returns `true` when the preview looped back.
    fn on_time_update(&mut self) -> bool {
        let trim = self.state.trim();
        let Some(video) = self.media.video.as_mut() else {
            return false;
        };
        if trim.reached_end(video.position()) {
            video.pause();
            video.seek(trim.start());
            self.media.pause_music();
            self.state.set_play_label(PlayLabel::Play);
            debug!(start = %trim.start(), "Trim end reached, rewound");
            return true;
        }
        if video.has_ended() && !video.is_paused() {
            video.pause();
            let position = video.position();
            self.media.pause_music();
            self.state.set_play_label(PlayLabel::Play);
            debug!(position = %position, "Media ended");
        }
        false
    }

    // ── Overlay manager ────────────────────────────────────────

    /// Replace the caption with the one in the form. Blank text is a no-op.
    pub fn add_overlay(&mut self) -> Option<&Overlay> {
        let inputs = self.state.inputs();
        let overlay = Overlay::new(&inputs.caption, inputs.position)?;
        info!(text = overlay.text(), position = %overlay.position(), "Overlay added");
        self.state.replace_overlay(Some(overlay));
        self.state.publish(Status::OverlayAdded);
        self.state.overlay()
    }

    /// Destroy the caption if present. Returns whether one was removed.
    pub fn remove_overlay(&mut self) -> bool {
        if self.state.replace_overlay(None).is_none() {
            return false;
        }
        self.state.publish(Status::OverlayRemoved);
        info!("Overlay removed");
        true
    }

    // ── Capture: still ─────────────────────────────────────────

    /// Save the visible surface (with caption) as a PNG download.
    pub fn screenshot(&mut self) -> Result<PathBuf> {
        let photo_frame = match self.state.visible_surface() {
            Surface::Photo => match self.media.photo.as_ref() {
                Some(photo) => Some(photo.frame()?.clone()),
                None => None,
            },
            Surface::Video => None,
        };
        let frame = match photo_frame {
            Some(frame) => frame,
            None => self.media.ready_video()?.current_frame()?,
        };
        let png = self
            .backends
            .stills
            .encode(frame, self.state.overlay())?;
        let path = self.backends.sink.offer(SCREENSHOT_FILE_NAME, &png)?;
        self.state.publish(Status::ScreenshotSaved);
        info!(path = %path.display(), bytes = png.len(), "Screenshot saved");
        Ok(path)
    }

    // ── Capture: export ────────────────────────────────────────

    /// Record the trim window in real time and schedule the stop.
    ///
    /// A session still in flight is cancelled and its buffer discarded.
    pub fn export(&mut self) -> Result<SessionId> {
        let trim = self.state.trim();
        let video = self.media.ready_video()?;
        let length = trim.capture_length(video.duration()).ok_or_else(|| {
            ClipMarkError::InvalidParameter(
                "media duration is unknown; set a trim end before exporting".to_string(),
            )
        })?;
        let source = video.source_path().to_path_buf();

        if let Some(previous) = self.state.abandon_capture() {
            self.backends.scheduler.cancel(previous.id());
            self.backends.tap.stop(previous.id());
            warn!(
                session = %previous.id(),
                discarded_bytes = previous.buffered_bytes(),
                "Export restarted, previous capture discarded"
            );
        }

        let session = self.state.next_session_id();
        let request = CaptureRequest {
            session,
            source,
            start: trim.start(),
            length: length.to_duration(),
        };
        self.backends.tap.open(&request)?;
        self.state.begin_capture(CaptureSession::new(session));

        let video = self.media.ready_video()?;
        video.seek(trim.start());
        if let Err(e) = video.play() {
            self.backends.tap.stop(session);
            self.state.abandon_capture();
            return Err(e);
        }
        self.start_music_with_trim();

        self.backends.scheduler.schedule(session, request.length);
        self.state.publish(Status::Recording);
        info!(%session, start = %trim.start(), length = %length, "Recording started");
        Ok(session)
    }

    fn on_stop_timer(&mut self, session: SessionId) {
        let Some(capture) = self.state.capture_mut() else {
            debug!(%session, "Stop timer fired with no capture in flight");
            return;
        };
        if capture.id() != session || capture.is_stopping() {
            debug!(%session, "Ignoring stale stop timer");
            return;
        }
        capture.mark_stopping();
        self.media.pause_all();
        self.backends.tap.stop(session);
        debug!(%session, "Capture stop requested");
    }

    fn on_data_available(&mut self, session: SessionId, bytes: Vec<u8>) {
        let accepted = self
            .state
            .capture_mut()
            .is_some_and(|capture| capture.accept(session, bytes));
        if !accepted {
            debug!(%session, "Dropping fragment from stale capture");
        }
    }

    fn on_recorder_stopped(&mut self, session: SessionId) -> Result<()> {
        let Some(capture) = self.state.take_capture(session) else {
            debug!(%session, "Ignoring stop of stale capture");
            return Ok(());
        };
        let fragments = capture.fragment_count();
        let blob = capture.into_blob();
        let path = self.backends.sink.offer(EXPORT_FILE_NAME, &blob)?;
        self.state.publish(Status::ExportFinished);
        info!(
            %session,
            fragments,
            bytes = blob.len(),
            path = %path.display(),
            "Export finished"
        );
        Ok(())
    }

    fn on_recorder_failed(&mut self, session: SessionId, message: String) -> Result<()> {
        if self.state.take_capture(session).is_none() {
            debug!(%session, %message, "Ignoring failure of stale capture");
            return Ok(());
        }
        self.backends.scheduler.cancel(session);
        self.media.pause_all();
        Err(ClipMarkError::Encoder(message))
    }

    // ── Reset ──────────────────────────────────────────────────

    /// Return playback and annotation state to initial values. Loaded media
    /// stays bound.
    pub fn reset(&mut self) {
        self.media.pause_all();
        if let Some(video) = self.media.video.as_mut() {
            video.seek(RationalTime::ZERO);
        }
        self.state.set_trim(TrimWindow::FULL);
        self.state.inputs_mut().clear_text();
        self.state.replace_overlay(None);
        self.state.set_play_label(PlayLabel::Play);
        self.state.publish(Status::ResetComplete);
        info!("Reset complete");
    }

    // ── Events ─────────────────────────────────────────────────

    /// Handle a backend notification.
    pub fn handle(&mut self, event: EditorEvent) -> Result<()> {
        match event {
            EditorEvent::TimeUpdate => {
                self.on_time_update();
                Ok(())
            }
            EditorEvent::StopTimerFired(session) => {
                self.on_stop_timer(session);
                Ok(())
            }
            EditorEvent::DataAvailable { session, bytes } => {
                self.on_data_available(session, bytes);
                Ok(())
            }
            EditorEvent::RecorderStopped(session) => self.on_recorder_stopped(session),
            EditorEvent::RecorderFailed { session, message } => {
                self.on_recorder_failed(session, message)
            }
        }
    }
}
