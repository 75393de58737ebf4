use crate::music::BackgroundTrack;
use crate::photo::PhotoImage;
use crate::video::VideoFile;
use clipmark_core::Result;
use clipmark_editor::{AudioTrack, MediaOpener, PlaybackSurface, StillSurface};
use std::path::Path;

/// Default preview decode width in pixels.
pub const DEFAULT_PREVIEW_WIDTH: u32 = 960;

/// Opens files from disk as ffmpeg/cpal-backed bindings.
#[derive(Debug, Clone)]
pub struct FileOpener {
    preview_width: u32,
}

impl FileOpener {
    pub fn new(preview_width: u32) -> Self {
        Self { preview_width }
    }
}

impl Default for FileOpener {
    fn default() -> Self {
        Self::new(DEFAULT_PREVIEW_WIDTH)
    }
}

impl MediaOpener for FileOpener {
    fn open_video(&mut self, path: &Path) -> Result<Box<dyn PlaybackSurface>> {
        Ok(Box::new(VideoFile::open(path, self.preview_width)?))
    }

    fn open_photo(&mut self, path: &Path) -> Result<Box<dyn StillSurface>> {
        Ok(Box::new(PhotoImage::open(path)?))
    }

    fn open_audio(&mut self, path: &Path) -> Result<Box<dyn AudioTrack>> {
        Ok(Box::new(BackgroundTrack::open(path)?))
    }
}
