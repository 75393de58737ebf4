//! Download directory sink.

use clipmark_core::{ClipMarkError, Result};
use clipmark_editor::ArtifactSink;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes artifacts into a directory. An existing name gets a ` (n)`
/// suffix before the extension: `screenshot.png`, `screenshot (1).png`, ...
pub struct DownloadDir {
    dir: PathBuf,
}

impl DownloadDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// First free path for `file_name` inside the directory.
    pub fn free_path(&self, file_name: &str) -> PathBuf {
        let candidate = self.dir.join(file_name);
        if !candidate.exists() {
            return candidate;
        }
        let name = Path::new(file_name);
        let stem = name
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = name.extension().map(|e| e.to_string_lossy().into_owned());
        (1u32..)
            .map(|n| match &ext {
                Some(ext) => self.dir.join(format!("{stem} ({n}).{ext}")),
                None => self.dir.join(format!("{stem} ({n})")),
            })
            .find(|p| !p.exists())
            .unwrap_or(candidate)
    }
}

impl ArtifactSink for DownloadDir {
    fn offer(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return Err(ClipMarkError::InvalidParameter(format!(
                "invalid artifact name {file_name:?}"
            )));
        }
        std::fs::create_dir_all(&self.dir)?;
        let path = self.free_path(file_name);
        std::fs::write(&path, bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "Artifact written");
        Ok(path)
    }
}
