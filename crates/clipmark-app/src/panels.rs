//! Control panels. Each panel edits the form inputs in place and returns
//! the actions the user triggered this frame.

use clipmark_core::OverlayPosition;
use clipmark_editor::{Action, FormInputs, PlayLabel};
use egui::{self, RichText};
use std::path::PathBuf;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "mkv", "m4v", "avi"];
const PHOTO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "m4a", "aac", "flac", "opus"];

const INPUT_WIDTH: f32 = 72.0;

fn pick(kind: &str, extensions: &[&str]) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title(format!("Open {kind}"))
        .add_filter(kind, extensions)
        .pick_file()
}

// ── Media ──────────────────────────────────────────────────────

pub fn show_media_bar(ui: &mut egui::Ui) -> Vec<Action> {
    let mut actions = Vec::new();
    ui.horizontal(|ui| {
        if ui.button("🎬 Video…").clicked() {
            actions.push(Action::LoadVideo(pick("Video", VIDEO_EXTENSIONS)));
        }
        if ui.button("🖼 Photo…").clicked() {
            actions.push(Action::LoadPhoto(pick("Photo", PHOTO_EXTENSIONS)));
        }
        if ui.button("🎵 Music…").clicked() {
            actions.push(Action::LoadMusic(pick("Music", AUDIO_EXTENSIONS)));
        }
    });
    actions
}

// ── Playback and trim ──────────────────────────────────────────

/// Read-only values the controls display.
pub struct ControlsView {
    pub play_label: PlayLabel,
    pub recording: bool,
    /// Current trim window, formatted `start – end`.
    pub trim: String,
}

pub fn show_controls(ui: &mut egui::Ui, view: &ControlsView, inputs: &mut FormInputs) -> Vec<Action> {
    let mut actions = Vec::new();

    ui.heading("Playback");
    if ui.button(view.play_label.to_string()).clicked() {
        actions.push(Action::TogglePlay);
    }

    ui.separator();
    ui.heading("Trim");
    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut inputs.trim_start)
                .hint_text("start s")
                .desired_width(INPUT_WIDTH),
        );
        ui.label("→");
        ui.add(
            egui::TextEdit::singleline(&mut inputs.trim_end)
                .hint_text("end s")
                .desired_width(INPUT_WIDTH),
        );
    });
    if ui.button("✂ Trim & Preview").clicked() {
        actions.push(Action::SetTrim);
    }
    ui.label(RichText::new(format!("Window: {}", view.trim)).weak());

    ui.separator();
    ui.heading("Caption");
    ui.add(egui::TextEdit::singleline(&mut inputs.caption).hint_text("Caption text"));
    egui::ComboBox::from_id_salt("overlay_position")
        .selected_text(inputs.position.as_str())
        .show_ui(ui, |ui| {
            for position in OverlayPosition::ALL {
                ui.selectable_value(&mut inputs.position, position, position.as_str());
            }
        });
    ui.horizontal(|ui| {
        if ui.button("Add overlay").clicked() {
            actions.push(Action::AddOverlay);
        }
        if ui.button("Remove overlay").clicked() {
            actions.push(Action::RemoveOverlay);
        }
    });

    ui.separator();
    ui.heading("Capture");
    ui.horizontal(|ui| {
        if ui.button("📷 Screenshot").clicked() {
            actions.push(Action::Screenshot);
        }
        let label = if view.recording { "⏺ Restart export" } else { "⏺ Export" };
        if ui.button(label).clicked() {
            actions.push(Action::Export);
        }
    });

    ui.separator();
    if ui.button("⟲ Reset").clicked() {
        actions.push(Action::Reset);
    }

    actions
}
