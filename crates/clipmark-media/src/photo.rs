//! The photo binding: a still image decoded once with `image`.

use clipmark_core::{ClipMarkError, FrameBuffer, Result};
use clipmark_editor::StillSurface;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A still image bound for display.
///
/// A file `image` cannot decode still binds: `frame` returns the decode
/// error each time the photo is used.
pub struct PhotoImage {
    path: PathBuf,
    frame: std::result::Result<FrameBuffer, String>,
}

impl PhotoImage {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ClipMarkError::NotFound(path.display().to_string()));
        }
        let frame = decode(path);
        match &frame {
            Ok(frame) => info!(
                path = %path.display(),
                width = frame.width,
                height = frame.height,
                "Photo decoded"
            ),
            Err(e) => warn!(path = %path.display(), error = %e, "Photo could not be decoded"),
        }
        Ok(Self {
            path: path.to_path_buf(),
            frame: frame.map_err(|e| e.to_string()),
        })
    }
}

fn decode(path: &Path) -> Result<FrameBuffer> {
    let image = image::open(path)
        .map_err(|e| ClipMarkError::Decoder(format!("{}: {e}", path.display())))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    FrameBuffer::from_rgba(width, height, image.into_raw())
}

impl StillSurface for PhotoImage {
    fn frame(&self) -> Result<&FrameBuffer> {
        self.frame
            .as_ref()
            .map_err(|message| ClipMarkError::Decoder(message.clone()))
    }

    fn source_path(&self) -> &Path {
        &self.path
    }
}
