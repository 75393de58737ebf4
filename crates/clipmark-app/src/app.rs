//! Application shell: wires the editor to real media backends and draws it.

use crate::config::AppConfig;
use crate::panels::{self, ControlsView};
use crate::preview::PreviewPane;
use clipmark_core::ClipMarkError;
use clipmark_editor::{Action, Editor, EditorBackends, EditorEvent, Surface};
use clipmark_media::{
    load_font, locate_sans_serif, CaptionPainter, ClipFormat, DownloadDir, FfmpegRecorder,
    FileOpener, PngStillEncoder, ThreadScheduler,
};
use crossbeam_channel::Receiver;
use eframe::egui;
use std::path::PathBuf;
use tracing::{info, warn};

pub struct ClipMarkApp {
    editor: Editor,
    events: Receiver<EditorEvent>,
    config: AppConfig,
    preview: PreviewPane,
    /// Surface and source currently uploaded to the preview texture.
    shown: Option<(Surface, PathBuf)>,
    /// Re-read the paused video frame on the next update.
    preview_dirty: bool,
    alert: Option<String>,
}

impl ClipMarkApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        video_path: Option<PathBuf>,
    ) -> Self {
        let (tx, events) = crossbeam_channel::unbounded();

        let painter = locate_sans_serif(config.font_path.as_deref()).and_then(|path| {
            match load_font(&path) {
                Ok(font) => Some(CaptionPainter::new(font, config.caption_font_px)),
                Err(e) => {
                    warn!(error = %e, "Caption font unavailable");
                    None
                }
            }
        });
        if painter.is_none() {
            warn!("No caption font found; screenshots with a caption will fail");
        }

        let backends = EditorBackends {
            opener: Box::new(FileOpener::new(config.preview_width)),
            tap: Box::new(FfmpegRecorder::new(ClipFormat::webm(), tx.clone())),
            scheduler: Box::new(ThreadScheduler::new(tx)),
            stills: Box::new(PngStillEncoder::new(painter)),
            sink: Box::new(DownloadDir::new(config.output_dir.clone())),
        };
        let editor = Editor::new(backends).with_audio_sync(config.audio_sync);
        info!(output_dir = %config.output_dir.display(), "Editor ready");

        let mut app = Self {
            editor,
            events,
            config,
            preview: PreviewPane::default(),
            shown: None,
            preview_dirty: true,
            alert: None,
        };
        if let Some(path) = video_path {
            app.perform(Action::LoadVideo(Some(path)));
        }
        app
    }

    fn perform(&mut self, action: Action) {
        let result = self.editor.dispatch(action);
        self.report(result);
        self.preview_dirty = true;
    }

    fn report(&mut self, result: clipmark_core::Result<()>) {
        if let Err(e) = result {
            if e.is_user_facing() {
                info!(error = %e, "Action rejected");
            } else {
                warn!(error = %e, "Action failed");
            }
            self.alert = Some(alert_text(&e));
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            let result = self.editor.handle(event);
            self.report(result);
            self.preview_dirty = true;
        }
        if self.editor.is_playing() {
            let result = self.editor.handle(EditorEvent::TimeUpdate);
            self.report(result);
        }
    }

    // ── Preview upload ─────────────────────────────────────────

    fn refresh_preview(&mut self, ctx: &egui::Context) {
        match self.editor.state().visible_surface() {
            Surface::Photo => {
                let Some(photo) = self.editor.photo() else {
                    self.preview.clear();
                    self.shown = None;
                    return;
                };
                let path = photo.source_path().to_path_buf();
                if self.shown.as_ref() != Some(&(Surface::Photo, path.clone())) {
                    let result = photo.frame().map(|frame| {
                        self.preview.set_frame(ctx, frame, frame.height);
                    });
                    if result.is_err() {
                        self.preview.clear();
                    }
                    self.shown = Some((Surface::Photo, path));
                    self.report(result);
                }
            }
            Surface::Video => {
                let playing = self.editor.is_playing();
                let Some(video) = self.editor.video_mut() else {
                    self.preview.clear();
                    self.shown = None;
                    return;
                };
                let path = video.source_path().to_path_buf();
                let switched = self.shown.as_ref() != Some(&(Surface::Video, path.clone()));
                if !(playing || switched || self.preview_dirty) {
                    return;
                }
                match video.preview_frame() {
                    Some(frame) => {
                        let native = video.dimensions().map_or(frame.height, |(_, h)| h);
                        self.preview.set_frame(ctx, &frame, native);
                    }
                    None if switched => self.preview.clear(),
                    None => {}
                }
                self.shown = Some((Surface::Video, path));
            }
        }
        self.preview_dirty = false;
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.alert.clone() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("ClipMark")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.alert = None;
        }
    }
}

fn alert_text(error: &ClipMarkError) -> String {
    match error {
        ClipMarkError::NotReady(message) => message.clone(),
        other => other.to_string(),
    }
}

impl eframe::App for ClipMarkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();
        self.refresh_preview(ctx);

        let recording = self.editor.state().active_session().is_some();
        if self.editor.is_playing() || recording {
            ctx.request_repaint_after(self.config.time_update_interval());
        }

        let mut actions = Vec::new();

        // Media bar
        egui::TopBottomPanel::top("media_bar").show(ctx, |ui| {
            actions.extend(panels::show_media_bar(ui));
        });

        // Status line
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.editor.state().status().to_string());
                if let Some(video) = self.editor.video() {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let total = video
                            .duration()
                            .map_or_else(|| "?".to_string(), |d| d.compact());
                        ui.monospace(format!("{}s / {}s", video.position().compact(), total));
                    });
                }
            });
        });

        // Controls
        egui::SidePanel::right("controls_panel")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                let trim = self.editor.state().trim();
                let view = ControlsView {
                    play_label: self.editor.state().play_label(),
                    recording,
                    trim: match trim.end().finite() {
                        Some(end) => format!("{}s – {}s", trim.start().compact(), end.compact()),
                        None => format!("{}s – end", trim.start().compact()),
                    },
                };
                actions.extend(panels::show_controls(ui, &view, self.editor.inputs_mut()));
            });

        // Preview
        egui::CentralPanel::default().show(ctx, |ui| {
            self.preview.show(
                ui,
                self.editor.state().overlay(),
                self.config.caption_font_px,
            );
        });

        self.show_alert(ctx);

        for action in actions {
            self.perform(action);
        }
    }
}
