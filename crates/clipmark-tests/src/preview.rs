//! Trim window and preview loop scenarios.

use crate::support::{secs, Harness};
use clipmark_core::{ClipMarkError, RationalTime, Status, TimeBound};
use clipmark_editor::{AudioSyncPolicy, PlayLabel, TrimWindow};

#[test]
fn preview_loops_back_to_window_start() {
    let mut h = Harness::new();
    h.load_video();

    let window = h.trim("2", "5").unwrap();
    assert_eq!(window.start(), secs(2));
    assert_eq!(window.end(), TimeBound::Finite(secs(5)));
    assert_eq!(
        h.editor.state().status().latest(),
        Status::Previewing {
            start: secs(2),
            end: TimeBound::Finite(secs(5)),
        }
    );
    assert_eq!(h.video.borrow().position, secs(2));
    assert!(h.editor.is_playing());

    h.advance_to(RationalTime::from_seconds_f64(4.9));
    assert!(h.editor.is_playing());

    h.advance_to(secs(5));
    assert!(!h.editor.is_playing());
    assert_eq!(h.video.borrow().position, secs(2));
    assert_eq!(h.editor.state().play_label(), PlayLabel::Play);
}

#[test]
fn preview_loop_repeats_on_replay() {
    let mut h = Harness::new();
    h.load_video();
    h.trim("2", "5").unwrap();
    h.advance_to(secs(5));

    h.editor.toggle_play().unwrap();
    assert!(h.editor.is_playing());
    h.advance_to(RationalTime::from_seconds_f64(5.2));

    assert!(!h.editor.is_playing());
    assert_eq!(h.video.borrow().position, secs(2));
    let rewinds = h.video.borrow().seeks.iter().filter(|&&t| t == secs(2)).count();
    assert_eq!(rewinds, 3);
}

#[test]
fn open_window_loops_at_media_end() {
    let mut h = Harness::new();
    h.load_video();
    h.load_music();

    let window = h.trim("3", "").unwrap();
    assert_eq!(window.end(), TimeBound::Finite(secs(10)));
    assert!(!h.music.borrow().paused);

    h.advance_to(secs(12));
    assert!(!h.editor.is_playing());
    assert_eq!(h.video.borrow().position, secs(3));
    assert!(h.music.borrow().paused);
    assert_eq!(h.editor.state().play_label(), PlayLabel::Play);

    h.editor.toggle_play().unwrap();
    assert_eq!(h.video.borrow().position, secs(3));
}

#[test]
fn untrimmed_video_stops_at_media_end() {
    let mut h = Harness::new();
    h.load_video();
    h.load_music();
    h.editor.toggle_play().unwrap();

    h.advance_to(secs(11));
    assert!(!h.editor.is_playing());
    assert_eq!(h.video.borrow().position, secs(10));
    assert!(h.music.borrow().paused);
    assert_eq!(h.editor.state().play_label(), PlayLabel::Play);

    h.editor.toggle_play().unwrap();
    assert_eq!(h.video.borrow().position, RationalTime::ZERO);
    assert!(!h.music.borrow().paused);
}

#[test]
fn equal_bounds_are_rejected_and_window_kept() {
    let mut h = Harness::new();
    h.load_video();

    let err = h.trim("5", "5").unwrap_err();
    assert!(matches!(err, ClipMarkError::InvalidTrim { .. }));
    assert_eq!(err.to_string(), "Start must be less than End (start 5.000s, end 5.000s)");
    assert_eq!(h.editor.state().trim(), TrimWindow::FULL);
    assert_eq!(h.editor.state().status().latest(), Status::VideoLoaded);
    assert!(!h.editor.is_playing());
}

#[test]
fn inverted_window_keeps_previous_valid_window() {
    let mut h = Harness::new();
    h.load_video();
    let previous = h.trim("1", "4").unwrap();

    assert!(h.trim("8", "3").is_err());
    assert_eq!(h.editor.state().trim(), previous);
}

#[test]
fn blank_inputs_span_whole_video() {
    let mut h = Harness::new();
    h.load_video();

    let window = h.trim("", "").unwrap();
    assert_eq!(window.start(), RationalTime::ZERO);
    assert_eq!(window.end(), TimeBound::Finite(secs(10)));
}

#[test]
fn unknown_duration_never_reaches_the_end() {
    let mut h = Harness::with_media(None, Some((64, 36)));
    h.load_video();

    let window = h.trim("abc", "").unwrap();
    assert_eq!(window, TrimWindow::FULL);

    h.advance_to(secs(3600));
    assert!(h.editor.is_playing());
}

#[test]
fn music_follows_play_and_pause() {
    let mut h = Harness::new();
    h.load_video();
    h.load_music();

    h.editor.toggle_play().unwrap();
    assert!(!h.music.borrow().paused);
    assert_eq!(h.editor.state().play_label(), PlayLabel::Pause);

    h.editor.toggle_play().unwrap();
    assert!(h.music.borrow().paused);
    assert_eq!(h.editor.state().play_label(), PlayLabel::Play);
}

#[test]
fn music_alone_is_never_played_by_toggle() {
    let mut h = Harness::new();
    h.load_music();

    let err = h.editor.toggle_play().unwrap_err();
    assert_eq!(err.to_string(), "Load a video first");
    assert_eq!(h.music.borrow().plays, 0);
}

#[test]
fn free_running_music_keeps_position_across_previews() {
    let mut h = Harness::new();
    h.load_video();
    h.load_music();

    h.trim("1", "3").unwrap();
    h.advance_to(secs(3));
    assert!(h.music.borrow().paused);
    h.trim("1", "3").unwrap();

    assert_eq!(h.music.borrow().restarts, 0);
    assert_eq!(h.music.borrow().plays, 2);
}

#[test]
fn restart_policy_rewinds_music_with_each_preview() {
    let mut h = Harness::new().with_audio_sync(AudioSyncPolicy::RestartWithTrim);
    h.load_video();
    h.load_music();

    h.trim("1", "3").unwrap();
    h.trim("2", "4").unwrap();

    assert_eq!(h.music.borrow().restarts, 2);
    assert!(!h.music.borrow().paused);
}
