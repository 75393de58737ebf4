//! Clip export sessions end to end over the fake recorder and timer.

use crate::support::{secs, Harness};
use clipmark_core::{ClipMarkError, Status};
use clipmark_editor::{AudioSyncPolicy, EditorEvent, EXPORT_FILE_NAME};
use std::path::Path;
use std::time::Duration;

#[test]
fn export_records_window_and_offers_one_clip() {
    let mut h = Harness::new();
    h.load_video();
    h.trim("0", "3").unwrap();

    let session = h.editor.export().unwrap();
    {
        let tap = h.tap.borrow();
        assert_eq!(tap.opened.len(), 1);
        assert_eq!(tap.opened[0].session, session);
        assert_eq!(tap.opened[0].source, Path::new("clip.mp4"));
        assert_eq!(tap.opened[0].start, secs(0));
    }
    assert_eq!(h.timers.borrow().scheduled, vec![(session, Duration::from_secs(3))]);
    assert_eq!(h.editor.state().status().latest(), Status::Recording);
    assert!(h.editor.is_playing());

    h.editor.handle(EditorEvent::StopTimerFired(session)).unwrap();
    assert_eq!(h.tap.borrow().stopped, vec![session]);
    assert!(!h.editor.is_playing());

    for chunk in [b"head".to_vec(), b"body".to_vec(), b"tail".to_vec()] {
        h.editor
            .handle(EditorEvent::DataAvailable { session, bytes: chunk })
            .unwrap();
    }
    h.editor.handle(EditorEvent::RecorderStopped(session)).unwrap();

    let artifacts = h.artifacts.borrow();
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].0, EXPORT_FILE_NAME);
    assert_eq!(artifacts[0].1, b"headbodytail");
    assert_eq!(h.editor.state().status().latest(), Status::ExportFinished);
    assert!(h.editor.state().active_session().is_none());
}

#[test]
fn export_starts_playback_at_window_start() {
    let mut h = Harness::new();
    h.load_video();
    h.trim("4", "6").unwrap();
    h.advance_to(secs(6));

    h.editor.export().unwrap();
    assert_eq!(h.video.borrow().position, secs(4));
    assert_eq!(h.timers.borrow().scheduled[0].1, Duration::from_secs(2));
}

#[test]
fn export_of_open_window_runs_to_media_end() {
    let mut h = Harness::new();
    h.load_video();
    h.trim("7", "").unwrap();

    h.editor.export().unwrap();
    assert_eq!(h.timers.borrow().scheduled[0].1, Duration::from_secs(3));
}

#[test]
fn export_needs_known_end() {
    let mut h = Harness::with_media(None, Some((64, 36)));
    h.load_video();

    let err = h.editor.export().unwrap_err();
    assert!(matches!(err, ClipMarkError::InvalidParameter(_)));
    assert!(h.tap.borrow().opened.is_empty());
}

#[test]
fn export_before_video_is_ready() {
    let mut h = Harness::with_media(Some(secs(10)), None);
    let err = h.editor.export().unwrap_err();
    assert_eq!(err.to_string(), "Load a video first");

    h.load_video();
    let err = h.editor.export().unwrap_err();
    assert_eq!(err.to_string(), "Load a video first");
    assert!(h.tap.borrow().opened.is_empty());
    assert!(h.timers.borrow().scheduled.is_empty());
}

#[test]
fn second_export_discards_first_session() {
    let mut h = Harness::new();
    h.load_video();
    h.trim("0", "2").unwrap();

    let first = h.editor.export().unwrap();
    h.editor
        .handle(EditorEvent::DataAvailable {
            session: first,
            bytes: b"old".to_vec(),
        })
        .unwrap();

    let second = h.editor.export().unwrap();
    assert_ne!(first, second);
    assert_eq!(h.timers.borrow().cancelled, vec![first]);
    assert_eq!(h.tap.borrow().stopped, vec![first]);
    assert_eq!(h.editor.state().active_session(), Some(second));

    // Late events from the first session change nothing.
    h.editor
        .handle(EditorEvent::DataAvailable {
            session: first,
            bytes: b"late".to_vec(),
        })
        .unwrap();
    h.editor.handle(EditorEvent::StopTimerFired(first)).unwrap();
    h.editor.handle(EditorEvent::RecorderStopped(first)).unwrap();
    assert!(h.artifacts.borrow().is_empty());
    assert_eq!(h.tap.borrow().stopped, vec![first]);

    h.editor
        .handle(EditorEvent::DataAvailable {
            session: second,
            bytes: b"new".to_vec(),
        })
        .unwrap();
    h.editor.handle(EditorEvent::StopTimerFired(second)).unwrap();
    h.editor.handle(EditorEvent::RecorderStopped(second)).unwrap();

    let artifacts = h.artifacts.borrow();
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].1, b"new");
}

#[test]
fn duplicate_stop_timer_stops_once() {
    let mut h = Harness::new();
    h.load_video();
    h.trim("0", "1").unwrap();
    let session = h.editor.export().unwrap();

    h.editor.handle(EditorEvent::StopTimerFired(session)).unwrap();
    h.editor.handle(EditorEvent::StopTimerFired(session)).unwrap();
    assert_eq!(h.tap.borrow().stopped, vec![session]);
}

#[test]
fn recorder_failure_ends_session_with_error() {
    let mut h = Harness::new();
    h.load_video();
    h.trim("0", "2").unwrap();
    let session = h.editor.export().unwrap();

    let err = h
        .editor
        .handle(EditorEvent::RecorderFailed {
            session,
            message: "encoder crashed".into(),
        })
        .unwrap_err();
    assert!(matches!(err, ClipMarkError::Encoder(_)));
    assert!(h.editor.state().active_session().is_none());
    assert_eq!(h.timers.borrow().cancelled, vec![session]);
    assert!(!h.editor.is_playing());
    assert!(h.artifacts.borrow().is_empty());
}

#[test]
fn restart_policy_rewinds_music_for_export() {
    let mut h = Harness::new().with_audio_sync(AudioSyncPolicy::RestartWithTrim);
    h.load_video();
    h.load_music();

    h.trim("0", "2").unwrap();
    let before = h.music.borrow().restarts;
    h.editor.export().unwrap();

    assert_eq!(h.music.borrow().restarts, before + 1);
    assert!(!h.music.borrow().paused);
}
