//! Caption font lookup.

use clipmark_core::{ClipMarkError, Result};
use fontdue::{Font, FontSettings};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Arial and its metric-compatible stand-ins, in preference order.
const CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/msttcorefonts/Arial.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/TTF/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// First existing sans-serif font: the configured path, then system paths.
pub fn locate_sans_serif(configured: Option<&Path>) -> Option<PathBuf> {
    configured
        .map(Path::to_path_buf)
        .into_iter()
        .chain(CANDIDATES.iter().map(PathBuf::from))
        .find(|p| p.is_file())
}

pub fn load_font(path: &Path) -> Result<Font> {
    let bytes = std::fs::read(path)
        .map_err(|e| ClipMarkError::Font(format!("{}: {e}", path.display())))?;
    let font = Font::from_bytes(bytes, FontSettings::default())
        .map_err(|e| ClipMarkError::Font(format!("{}: {e}", path.display())))?;
    debug!(path = %path.display(), "Caption font loaded");
    Ok(font)
}
