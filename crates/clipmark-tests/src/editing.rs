//! Overlay, screenshot, media loading and reset scenarios.

use crate::support::{secs, Harness};
use clipmark_core::{OverlayPosition, RationalTime, Status};
use clipmark_editor::{Action, PlayLabel, Surface, TrimWindow, SCREENSHOT_FILE_NAME};
use std::path::{Path, PathBuf};

fn caption(h: &mut Harness, text: &str, position: OverlayPosition) {
    let inputs = h.editor.inputs_mut();
    inputs.caption = text.to_string();
    inputs.position = position;
    h.editor.dispatch(Action::AddOverlay).unwrap();
}

// ── Overlay ────────────────────────────────────────────────────

#[test]
fn at_most_one_overlay_exists() {
    let mut h = Harness::new();
    caption(&mut h, "First", OverlayPosition::Top);
    caption(&mut h, "Second", OverlayPosition::Bottom);

    let overlay = h.editor.state().overlay().unwrap();
    assert_eq!(overlay.text(), "Second");
    assert_eq!(overlay.position(), OverlayPosition::Bottom);
    assert_eq!(h.editor.state().status().latest(), Status::OverlayAdded);

    assert!(h.editor.remove_overlay());
    assert!(h.editor.state().overlay().is_none());
    assert_eq!(h.editor.state().status().latest(), Status::OverlayRemoved);
}

#[test]
fn whitespace_caption_adds_nothing() {
    let mut h = Harness::new();
    caption(&mut h, "   ", OverlayPosition::Middle);
    assert!(h.editor.state().overlay().is_none());
    assert_eq!(h.editor.state().status().latest(), Status::Ready);
}

// ── Screenshot ─────────────────────────────────────────────────

#[test]
fn screenshot_before_load_fails_without_artifact() {
    let mut h = Harness::new();
    let err = h.editor.dispatch(Action::Screenshot).unwrap_err();
    assert_eq!(err.to_string(), "Load a video first");
    assert!(h.artifacts.borrow().is_empty());
}

#[test]
fn screenshot_before_dimensions_known_fails() {
    let mut h = Harness::with_media(Some(secs(10)), None);
    h.load_video();
    assert!(h.editor.screenshot().is_err());
    assert!(h.artifacts.borrow().is_empty());
}

#[test]
fn screenshot_captures_video_frame_with_caption() {
    let mut h = Harness::new();
    h.load_video();
    caption(&mut h, "Hello", OverlayPosition::Bottom);

    let path = h.editor.screenshot().unwrap();
    assert_eq!(path, Path::new("/downloads/screenshot.png"));
    let artifacts = h.artifacts.borrow();
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].0, SCREENSHOT_FILE_NAME);
    assert_eq!(artifacts[0].1, b"64x36 bottom Hello");
    assert_eq!(h.editor.state().status().latest(), Status::ScreenshotSaved);
}

#[test]
fn screenshot_uses_photo_when_photo_is_visible() {
    let mut h = Harness::new();
    h.load_video();
    h.editor.load_photo(Some(Path::new("still.jpg"))).unwrap();
    assert_eq!(h.editor.state().visible_surface(), Surface::Photo);

    h.editor.screenshot().unwrap();
    assert_eq!(h.artifacts.borrow()[0].1, b"40x30");

    h.load_video();
    h.editor.screenshot().unwrap();
    assert_eq!(h.artifacts.borrow()[1].1, b"64x36");
}

#[test]
fn photo_alone_can_be_captured() {
    let mut h = Harness::new();
    h.editor.load_photo(Some(Path::new("still.png"))).unwrap();
    caption(&mut h, "On photo", OverlayPosition::Top);

    h.editor.screenshot().unwrap();
    assert_eq!(h.artifacts.borrow()[0].1, b"40x30 top On photo");
}

// ── Media loading ──────────────────────────────────────────────

#[test]
fn replacing_video_releases_previous_binding() {
    let mut h = Harness::new();
    h.load_video();
    h.editor.toggle_play().unwrap();
    h.load_video();

    assert_eq!(h.video.borrow().released, 1);
    assert!(h.video.borrow().paused);
    assert_eq!(h.editor.state().status().latest(), Status::VideoLoaded);
}

#[test]
fn unreadable_video_keeps_current_binding() {
    let mut h = Harness::new();
    h.load_video();

    let result = h
        .editor
        .dispatch(Action::LoadVideo(Some(PathBuf::from("notes.txt"))));
    assert!(result.is_err());
    assert!(h.editor.has_video());
    assert_eq!(h.editor.video().unwrap().source_path(), Path::new("clip.mp4"));
}

#[test]
fn dismissed_pickers_change_nothing() {
    let mut h = Harness::new();
    for action in [
        Action::LoadVideo(None),
        Action::LoadPhoto(None),
        Action::LoadMusic(None),
    ] {
        h.editor.dispatch(action).unwrap();
    }
    assert!(!h.editor.has_video());
    assert!(!h.editor.has_music());
    assert!(h.editor.photo().is_none());
    assert_eq!(h.editor.state().status().latest(), Status::Ready);
}

#[test]
fn music_load_reports_ready_without_switching_surface() {
    let mut h = Harness::new();
    h.editor.load_photo(Some(Path::new("still.png"))).unwrap();
    h.load_music();
    assert_eq!(h.editor.state().status().latest(), Status::MusicReady);
    assert_eq!(h.editor.state().visible_surface(), Surface::Photo);
}

// ── Reset ──────────────────────────────────────────────────────

#[test]
fn reset_restores_initial_editing_state() {
    let mut h = Harness::new();
    h.load_video();
    h.load_music();
    h.trim("2", "8").unwrap();
    h.advance_to(secs(4));
    caption(&mut h, "Bye", OverlayPosition::Middle);

    h.editor.dispatch(Action::Reset).unwrap();

    let state = h.editor.state();
    assert_eq!(state.trim(), TrimWindow::FULL);
    assert!(state.overlay().is_none());
    assert_eq!(state.play_label(), PlayLabel::Play);
    assert_eq!(state.status().latest(), Status::ResetComplete);
    assert!(state.inputs().trim_start.is_empty());
    assert!(state.inputs().trim_end.is_empty());
    assert!(state.inputs().caption.is_empty());
    assert_eq!(state.inputs().position, OverlayPosition::Middle);

    assert_eq!(h.video.borrow().position, RationalTime::ZERO);
    assert!(h.video.borrow().paused);
    assert!(h.music.borrow().paused);
    assert!(h.editor.has_video());
    assert!(h.editor.has_music());
}

#[test]
fn reset_without_media_only_resets_state() {
    let mut h = Harness::new();
    caption(&mut h, "Note", OverlayPosition::Top);
    h.editor.reset();
    assert!(h.editor.state().overlay().is_none());
    assert_eq!(h.editor.state().status().latest(), Status::ResetComplete);
}
