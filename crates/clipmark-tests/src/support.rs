//! In-memory backends that record every call the editor makes.

use clipmark_core::{ClipMarkError, FrameBuffer, Overlay, RationalTime, Result};
use clipmark_editor::{
    ArtifactSink, AudioSyncPolicy, AudioTrack, CaptureRequest, CaptureTap, Editor,
    EditorBackends, EditorEvent, MediaOpener, PlaybackSurface, SessionId, StillEncoder,
    StillSurface, StopScheduler,
};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

pub fn secs(seconds: i64) -> RationalTime {
    RationalTime::from_seconds(seconds)
}

// ── Video ──────────────────────────────────────────────────────

#[derive(Debug)]
pub struct VideoLog {
    pub position: RationalTime,
    pub paused: bool,
    pub plays: usize,
    pub seeks: Vec<RationalTime>,
    pub released: usize,
}

impl Default for VideoLog {
    fn default() -> Self {
        Self {
            position: RationalTime::ZERO,
            paused: true,
            plays: 0,
            seeks: Vec::new(),
            released: 0,
        }
    }
}

struct FakeVideo {
    path: PathBuf,
    log: Rc<RefCell<VideoLog>>,
    duration: Option<RationalTime>,
    dimensions: Option<(u32, u32)>,
}

impl FakeVideo {
    fn clamp(&self, position: RationalTime) -> RationalTime {
        match self.duration {
            Some(duration) if position > duration => duration,
            _ => position,
        }
    }
}

/// Models the wall-clock binding: the play-head holds at the duration and
/// playing an ended video starts over from 0.
impl PlaybackSurface for FakeVideo {
    fn play(&mut self) -> Result<()> {
        let ended = self.has_ended();
        let mut log = self.log.borrow_mut();
        if ended {
            log.position = RationalTime::ZERO;
        }
        log.paused = false;
        log.plays += 1;
        Ok(())
    }

    fn pause(&mut self) {
        self.log.borrow_mut().paused = true;
    }

    fn is_paused(&self) -> bool {
        self.log.borrow().paused
    }

    fn has_ended(&self) -> bool {
        self.duration
            .is_some_and(|duration| self.log.borrow().position >= duration)
    }

    fn seek(&mut self, position: RationalTime) {
        let position = self.clamp(position);
        let mut log = self.log.borrow_mut();
        log.position = position;
        log.seeks.push(position);
    }

    fn position(&self) -> RationalTime {
        self.log.borrow().position
    }

    fn duration(&self) -> Option<RationalTime> {
        self.duration
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    fn current_frame(&mut self) -> Result<FrameBuffer> {
        let (width, height) = self
            .dimensions
            .ok_or_else(|| ClipMarkError::Decoder("no frame decoded".into()))?;
        Ok(FrameBuffer::test_pattern(width, height))
    }

    fn source_path(&self) -> &Path {
        &self.path
    }

    fn release(&mut self) {
        self.log.borrow_mut().released += 1;
    }
}

// ── Photo and music ────────────────────────────────────────────

struct FakePhoto {
    path: PathBuf,
    frame: FrameBuffer,
}

impl StillSurface for FakePhoto {
    fn frame(&self) -> Result<&FrameBuffer> {
        Ok(&self.frame)
    }

    fn source_path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug)]
pub struct MusicLog {
    pub paused: bool,
    pub plays: usize,
    pub restarts: usize,
}

impl Default for MusicLog {
    fn default() -> Self {
        Self {
            paused: true,
            plays: 0,
            restarts: 0,
        }
    }
}

struct FakeMusic {
    log: Rc<RefCell<MusicLog>>,
}

impl AudioTrack for FakeMusic {
    fn play(&mut self) -> Result<()> {
        let mut log = self.log.borrow_mut();
        log.paused = false;
        log.plays += 1;
        Ok(())
    }

    fn pause(&mut self) {
        self.log.borrow_mut().paused = true;
    }

    fn is_paused(&self) -> bool {
        self.log.borrow().paused
    }

    fn restart(&mut self) {
        self.log.borrow_mut().restarts += 1;
    }
}

struct FakeOpener {
    video: Rc<RefCell<VideoLog>>,
    music: Rc<RefCell<MusicLog>>,
    duration: Option<RationalTime>,
    dimensions: Option<(u32, u32)>,
}

impl MediaOpener for FakeOpener {
    fn open_video(&mut self, path: &Path) -> Result<Box<dyn PlaybackSurface>> {
        if path.extension().is_some_and(|ext| ext == "txt") {
            return Err(ClipMarkError::Media(format!("{} is not media", path.display())));
        }
        Ok(Box::new(FakeVideo {
            path: path.to_path_buf(),
            log: Rc::clone(&self.video),
            duration: self.duration,
            dimensions: self.dimensions,
        }))
    }

    fn open_photo(&mut self, path: &Path) -> Result<Box<dyn StillSurface>> {
        Ok(Box::new(FakePhoto {
            path: path.to_path_buf(),
            frame: FrameBuffer::new(40, 30),
        }))
    }

    fn open_audio(&mut self, _path: &Path) -> Result<Box<dyn AudioTrack>> {
        Ok(Box::new(FakeMusic {
            log: Rc::clone(&self.music),
        }))
    }
}

// ── Capture ────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct TapLog {
    pub opened: Vec<CaptureRequest>,
    pub stopped: Vec<SessionId>,
}

struct FakeTap {
    log: Rc<RefCell<TapLog>>,
}

impl CaptureTap for FakeTap {
    fn open(&mut self, request: &CaptureRequest) -> Result<()> {
        self.log.borrow_mut().opened.push(request.clone());
        Ok(())
    }

    fn stop(&mut self, session: SessionId) {
        self.log.borrow_mut().stopped.push(session);
    }
}

#[derive(Debug, Default)]
pub struct TimerLog {
    pub scheduled: Vec<(SessionId, Duration)>,
    pub cancelled: Vec<SessionId>,
}

struct FakeScheduler {
    log: Rc<RefCell<TimerLog>>,
}

impl StopScheduler for FakeScheduler {
    fn schedule(&mut self, session: SessionId, after: Duration) {
        self.log.borrow_mut().scheduled.push((session, after));
    }

    fn cancel(&mut self, session: SessionId) {
        self.log.borrow_mut().cancelled.push(session);
    }
}

/// Encodes a description of the still instead of pixels.
struct DescribingStills;

impl StillEncoder for DescribingStills {
    fn encode(&mut self, frame: FrameBuffer, overlay: Option<&Overlay>) -> Result<Vec<u8>> {
        let caption = overlay.map_or(String::new(), |o| format!(" {} {}", o.position(), o.text()));
        Ok(format!("{}x{}{caption}", frame.width, frame.height).into_bytes())
    }
}

pub type Artifacts = Rc<RefCell<Vec<(String, Vec<u8>)>>>;

struct MemorySink {
    artifacts: Artifacts,
}

impl ArtifactSink for MemorySink {
    fn offer(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.artifacts
            .borrow_mut()
            .push((file_name.to_string(), bytes.to_vec()));
        Ok(PathBuf::from("/downloads").join(file_name))
    }
}

// ── Harness ────────────────────────────────────────────────────

pub struct Harness {
    pub editor: Editor,
    pub video: Rc<RefCell<VideoLog>>,
    pub music: Rc<RefCell<MusicLog>>,
    pub tap: Rc<RefCell<TapLog>>,
    pub timers: Rc<RefCell<TimerLog>>,
    pub artifacts: Artifacts,
    duration: Option<RationalTime>,
}

impl Harness {
    /// Editor whose videos are 10 s long at 64x36.
    pub fn new() -> Self {
        Self::with_media(Some(secs(10)), Some((64, 36)))
    }

    pub fn with_media(duration: Option<RationalTime>, dimensions: Option<(u32, u32)>) -> Self {
        let video = Rc::new(RefCell::new(VideoLog::default()));
        let music = Rc::new(RefCell::new(MusicLog::default()));
        let tap = Rc::new(RefCell::new(TapLog::default()));
        let timers = Rc::new(RefCell::new(TimerLog::default()));
        let artifacts = Artifacts::default();
        let backends = EditorBackends {
            opener: Box::new(FakeOpener {
                video: Rc::clone(&video),
                music: Rc::clone(&music),
                duration,
                dimensions,
            }),
            tap: Box::new(FakeTap {
                log: Rc::clone(&tap),
            }),
            scheduler: Box::new(FakeScheduler {
                log: Rc::clone(&timers),
            }),
            stills: Box::new(DescribingStills),
            sink: Box::new(MemorySink {
                artifacts: Rc::clone(&artifacts),
            }),
        };
        Self {
            editor: Editor::new(backends),
            video,
            music,
            tap,
            timers,
            artifacts,
            duration,
        }
    }

    pub fn with_audio_sync(mut self, policy: AudioSyncPolicy) -> Self {
        self.editor = self.editor.with_audio_sync(policy);
        self
    }

    pub fn load_video(&mut self) {
        self.editor
            .load_video(Some(Path::new("clip.mp4")))
            .expect("load video");
    }

    pub fn load_music(&mut self) {
        self.editor
            .load_music(Some(Path::new("loop.mp3")))
            .expect("load music");
    }

    pub fn trim(&mut self, start: &str, end: &str) -> Result<clipmark_editor::TrimWindow> {
        let inputs = self.editor.inputs_mut();
        inputs.trim_start = start.to_string();
        inputs.trim_end = end.to_string();
        self.editor.set_trim()
    }

    /// Let playback run to `position`, held at the media duration, then
    /// deliver the time update the way the frame loop does: only while the
    /// video is playing.
    pub fn advance_to(&mut self, position: RationalTime) {
        let position = match self.duration {
            Some(duration) if position > duration => duration,
            _ => position,
        };
        self.video.borrow_mut().position = position;
        if self.editor.is_playing() {
            self.editor
                .handle(EditorEvent::TimeUpdate)
                .expect("time update");
        }
    }

    pub fn artifact_names(&self) -> Vec<String> {
        self.artifacts
            .borrow()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}
