//! Preview pane: the visible surface with the caption drawn on top.

use clipmark_core::{FrameBuffer, Overlay};
use egui::{self, Color32, FontId, Pos2, Rect, Vec2};

// ── State ──────────────────────────────────────────────────────

#[derive(Default)]
pub struct PreviewPane {
    texture: Option<egui::TextureHandle>,
    /// Native height of the media behind the texture, for caption scaling.
    native_height: u32,
}

impl PreviewPane {
    /// Upload a new frame. `native_height` is the full-resolution height of
    /// the source, which may exceed the frame's own height.
    pub fn set_frame(&mut self, ctx: &egui::Context, frame: &FrameBuffer, native_height: u32) {
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [frame.width as usize, frame.height as usize],
            &frame.data,
        );
        match self.texture.as_mut() {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("clipmark-preview", image, egui::TextureOptions::LINEAR));
            }
        }
        self.native_height = native_height.max(1);
    }

    pub fn clear(&mut self) {
        self.texture = None;
    }

    // ── Rendering ──────────────────────────────────────────────

    pub fn show(&self, ui: &mut egui::Ui, overlay: Option<&Overlay>, caption_px: f32) {
        let available = ui.available_size();
        let (response, painter) = ui.allocate_painter(available, egui::Sense::hover());
        let area = response.rect;
        painter.rect_filled(area, 0.0, Color32::from_gray(16));

        let Some(texture) = &self.texture else {
            painter.text(
                area.center(),
                egui::Align2::CENTER_CENTER,
                "Load a video or photo to begin",
                FontId::proportional(16.0),
                Color32::from_gray(120),
            );
            return;
        };

        let rect = fit(area, texture.size_vec2());
        painter.image(
            texture.id(),
            rect,
            Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
            Color32::WHITE,
        );

        if let Some(overlay) = overlay {
            let scale = rect.height() / self.native_height as f32;
            let baseline = rect.top() + rect.height() * overlay.position().placement_ratio();
            let font = FontId::proportional((caption_px * scale).max(8.0));
            let galley = painter.layout_no_wrap(overlay.text().to_string(), font, Color32::WHITE);
            // Approximate ascent; the baseline sits at the placement ratio.
            let ascent = galley.size().y * 0.8;
            let top_left = Pos2::new(rect.center().x - galley.size().x / 2.0, baseline - ascent);
            painter.galley(top_left, galley, Color32::WHITE);
        }
    }
}

/// Largest rect with the aspect ratio of `size` centered in `area`.
fn fit(area: Rect, size: Vec2) -> Rect {
    if size.x <= 0.0 || size.y <= 0.0 {
        return area;
    }
    let scale = (area.width() / size.x).min(area.height() / size.y);
    Rect::from_center_size(area.center(), size * scale)
}
