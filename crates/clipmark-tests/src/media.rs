//! Editor wired to the real file-backed media components.

use clipmark_core::{ClipMarkError, OverlayPosition, Status};
use clipmark_editor::{
    Action, ArtifactSink, Editor, EditorBackends, EditorEvent, SessionId, StopScheduler, Surface,
};
use clipmark_media::{
    ClipFormat, DownloadDir, FfmpegRecorder, FileOpener, PngStillEncoder, ThreadScheduler,
};
use crossbeam_channel::{unbounded, Receiver};
use std::path::Path;
use std::time::Duration;

fn real_editor(out: &Path) -> (Editor, Receiver<EditorEvent>) {
    let (tx, rx) = unbounded();
    let backends = EditorBackends {
        opener: Box::new(FileOpener::default()),
        tap: Box::new(FfmpegRecorder::new(ClipFormat::webm(), tx.clone())),
        scheduler: Box::new(ThreadScheduler::new(tx)),
        stills: Box::new(PngStillEncoder::new(None)),
        sink: Box::new(DownloadDir::new(out)),
    };
    (Editor::new(backends), rx)
}

fn write_photo(path: &Path, width: u32, height: u32) {
    let img = image::RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            image::Rgba([255, 0, 0, 255])
        } else {
            image::Rgba([0, 0, 255, 255])
        }
    });
    img.save(path).unwrap();
}

#[test]
fn photo_screenshot_lands_in_download_dir() {
    let media = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let photo = media.path().join("still.png");
    write_photo(&photo, 32, 16);

    let (mut editor, _rx) = real_editor(out.path());
    editor.dispatch(Action::LoadPhoto(Some(photo))).unwrap();
    assert_eq!(editor.state().status().latest(), Status::PhotoLoaded);

    let first = editor.screenshot().unwrap();
    let second = editor.screenshot().unwrap();
    assert_eq!(first, out.path().join("screenshot.png"));
    assert_eq!(second, out.path().join("screenshot (1).png"));

    let decoded = image::open(&first).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (32, 16));
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(decoded.get_pixel(31, 15).0, [0, 0, 255, 255]);
}

#[test]
fn caption_without_font_fails_and_writes_nothing() {
    let media = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let photo = media.path().join("still.png");
    write_photo(&photo, 8, 8);

    let (mut editor, _rx) = real_editor(out.path());
    editor.load_photo(Some(photo.as_path())).unwrap();
    let inputs = editor.inputs_mut();
    inputs.caption = "Title".into();
    inputs.position = OverlayPosition::Middle;
    editor.add_overlay();

    let err = editor.screenshot().unwrap_err();
    assert!(matches!(err, ClipMarkError::Font(_)));
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn undecodable_photo_binds_and_fails_at_screenshot() {
    let media = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let photo = media.path().join("corrupt.jpg");
    std::fs::write(&photo, b"\xff\xd8 truncated").unwrap();

    let (mut editor, _rx) = real_editor(out.path());
    editor.load_photo(Some(photo.as_path())).unwrap();
    assert_eq!(editor.state().status().latest(), Status::PhotoLoaded);
    assert_eq!(editor.state().visible_surface(), Surface::Photo);

    let err = editor.screenshot().unwrap_err();
    assert!(matches!(err, ClipMarkError::Decoder(_)));
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn missing_photo_is_reported() {
    let out = tempfile::tempdir().unwrap();
    let (mut editor, _rx) = real_editor(out.path());
    let err = editor
        .load_photo(Some(Path::new("/no/such/photo.png")))
        .unwrap_err();
    assert!(matches!(err, ClipMarkError::NotFound(_)));
    assert!(editor.photo().is_none());
}

#[test]
fn download_dir_rejects_nested_names() {
    let out = tempfile::tempdir().unwrap();
    let mut sink = DownloadDir::new(out.path());
    assert!(sink.offer("../escape.png", b"x").is_err());
    assert!(sink.offer("", b"x").is_err());

    let path = sink.offer("exported_trim.webm", &[0x1a, 0x45, 0xdf, 0xa3]).unwrap();
    assert_eq!(std::fs::read(path).unwrap(), [0x1a, 0x45, 0xdf, 0xa3]);
}

#[test]
fn stop_timer_fires_once_after_delay() {
    let (tx, rx) = unbounded();
    let mut scheduler = ThreadScheduler::new(tx);
    let session = SessionId::new(7);

    scheduler.schedule(session, Duration::from_millis(30));
    let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(event, EditorEvent::StopTimerFired(session));
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
}

#[test]
fn cancelled_stop_timer_never_fires() {
    let (tx, rx) = unbounded();
    let mut scheduler = ThreadScheduler::new(tx);
    let session = SessionId::new(1);

    scheduler.schedule(session, Duration::from_millis(200));
    scheduler.cancel(session);
    assert!(rx.recv_timeout(Duration::from_millis(400)).is_err());
}
