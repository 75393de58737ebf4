//! Still capture: caption rendering and PNG encoding.

use clipmark_core::{ClipMarkError, FrameBuffer, Overlay, Result, BYTES_PER_PIXEL};
use clipmark_editor::StillEncoder;
use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
use fontdue::Font;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use tracing::debug;

/// Caption size used on screen and in stills.
pub const CAPTION_FONT_PX: f32 = 32.0;

const CAPTION_COLOR: [u8; 4] = [255, 255, 255, 255];

/// Draws a caption centered horizontally with its baseline at the
/// overlay's placement ratio of the frame height.
pub struct CaptionPainter {
    font: Font,
    size_px: f32,
    color: [u8; 4],
}

impl CaptionPainter {
    pub fn new(font: Font, size_px: f32) -> Self {
        Self {
            font,
            size_px,
            color: CAPTION_COLOR,
        }
    }

    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// Advance width of `text` at the caption size.
    pub fn text_width(&self, text: &str) -> f32 {
        text.chars()
            .map(|c| self.font.metrics(c, self.size_px).advance_width)
            .sum()
    }

    pub fn paint(&self, frame: &mut FrameBuffer, overlay: &Overlay) {
        let ascent = self
            .font
            .horizontal_line_metrics(self.size_px)
            .map_or(self.size_px * 0.8, |m| m.ascent);
        let baseline = overlay.baseline_y(frame.height);
        let left = (frame.width as f32 - self.text_width(overlay.text())) / 2.0;

        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings {
            x: left,
            y: baseline - ascent,
            max_width: None,
            max_height: None,
            ..LayoutSettings::default()
        });
        layout.append(&[&self.font], &TextStyle::new(overlay.text(), self.size_px, 0));

        for glyph in layout.glyphs() {
            if glyph.width == 0 || glyph.height == 0 {
                continue;
            }
            let (_, coverage) = self.font.rasterize_config(glyph.key);
            blend_coverage(
                frame,
                glyph.x.round() as i32,
                glyph.y.round() as i32,
                glyph.width,
                &coverage,
                self.color,
            );
        }
    }
}

/// Alpha-blend a glyph coverage mask onto the frame, clipping at the edges.
fn blend_coverage(
    frame: &mut FrameBuffer,
    x: i32,
    y: i32,
    mask_width: usize,
    mask: &[u8],
    color: [u8; 4],
) {
    let (fw, fh) = (frame.width as i32, frame.height as i32);
    for (row, line) in mask.chunks_exact(mask_width).enumerate() {
        let py = y + row as i32;
        if py < 0 || py >= fh {
            continue;
        }
        for (col, &cov) in line.iter().enumerate() {
            let px = x + col as i32;
            if px < 0 || px >= fw || cov == 0 {
                continue;
            }
            let alpha = u16::from(cov) * u16::from(color[3]) / 255;
            let inv = 255 - alpha;
            let idx = (py as usize * frame.width as usize + px as usize) * BYTES_PER_PIXEL;
            let dst = &mut frame.data[idx..idx + BYTES_PER_PIXEL];
            for c in 0..3 {
                dst[c] = ((u16::from(color[c]) * alpha + u16::from(dst[c]) * inv + 127) / 255) as u8;
            }
            dst[3] = dst[3].max(alpha as u8);
        }
    }
}

/// Encode an RGBA frame as PNG.
pub fn encode_png(frame: FrameBuffer) -> Result<Vec<u8>> {
    let (width, height) = frame.dimensions();
    let image = RgbaImage::from_raw(width, height, frame.data)
        .ok_or_else(|| ClipMarkError::Internal("frame size does not match its data".into()))?;
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| ClipMarkError::Encoder(format!("png: {e}")))?;
    Ok(bytes)
}

/// `StillEncoder` producing PNG with the caption baked in.
pub struct PngStillEncoder {
    painter: Option<CaptionPainter>,
}

impl PngStillEncoder {
    pub fn new(painter: Option<CaptionPainter>) -> Self {
        Self { painter }
    }
}

impl StillEncoder for PngStillEncoder {
    fn encode(&mut self, mut frame: FrameBuffer, overlay: Option<&Overlay>) -> Result<Vec<u8>> {
        if let Some(overlay) = overlay {
            let painter = self.painter.as_ref().ok_or_else(|| {
                ClipMarkError::Font("no caption font available; set font_path".into())
            })?;
            painter.paint(&mut frame, overlay);
        }
        let (width, height) = frame.dimensions();
        let png = encode_png(frame)?;
        debug!(width, height, bytes = png.len(), captioned = overlay.is_some(), "Still encoded");
        Ok(png)
    }
}
