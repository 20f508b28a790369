use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::Fps;

fn session(seed: u64, dpr: f64) -> RenderSession {
    RenderSession::new(SceneConfig {
        seed,
        device_pixel_ratio: dpr,
        fps: Fps::new(30, 1).unwrap(),
        duration_secs: 1.0,
    })
    .unwrap()
}

fn range(start: u64, end: u64) -> FrameRange {
    FrameRange::new(FrameIndex(start), FrameIndex(end)).unwrap()
}

#[test]
fn invalid_config_is_rejected() {
    let err = RenderSession::new(SceneConfig {
        device_pixel_ratio: -1.0,
        ..SceneConfig::default()
    })
    .unwrap_err();
    assert!(matches!(err, SceneError::Validation(_)));
}

#[test]
fn full_range_covers_duration() {
    let s = session(1, 1.0);
    assert_eq!(s.full_range(), range(0, 30));
}

#[test]
fn frame_has_physical_size_and_opaque_sky() {
    let frame = session(1, 0.5).render_frame(FrameIndex(0)).unwrap();
    assert_eq!((frame.width, frame.height), (480, 270));
    assert!(frame.premultiplied);
    let px = frame.pixel(2, 2).unwrap();
    assert_eq!(px[3], 255);
}

#[test]
fn single_frame_matches_range_frame() {
    let s = session(9, 0.5);
    let mut sink = InMemorySink::new();
    let stats = s.render_range(range(0, 4), &mut sink).unwrap();
    assert_eq!(
        stats,
        RenderStats {
            frames_total: 4,
            frames_rendered: 4
        }
    );

    let (idx, from_range) = &sink.frames()[3];
    assert_eq!(*idx, FrameIndex(3));
    let single = s.render_frame(FrameIndex(3)).unwrap();
    assert!(single.data == from_range.data, "frame 3 differs between paths");
}

#[test]
fn ranges_starting_mid_timeline_are_consistent() {
    let s = session(9, 0.5);
    let mut full = InMemorySink::new();
    s.render_range(range(0, 5), &mut full).unwrap();
    let mut tail = InMemorySink::new();
    s.render_range(range(3, 5), &mut tail).unwrap();

    let idx: Vec<u64> = tail.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![3, 4]);
    assert!(tail.frames()[0].1.data == full.frames()[3].1.data);
    assert!(tail.frames()[1].1.data == full.frames()[4].1.data);
}

#[test]
fn empty_range_still_opens_and_closes_the_sink() {
    let mut sink = InMemorySink::new();
    let stats = session(1, 0.5).render_range(range(2, 2), &mut sink).unwrap();
    assert_eq!(stats.frames_rendered, 0);
    assert!(sink.config().is_some());
    assert!(sink.is_finished());
}

#[test]
fn sink_receives_session_geometry() {
    let mut sink = InMemorySink::new();
    session(1, 0.5).render_range(range(0, 1), &mut sink).unwrap();
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (480, 270));
    assert_eq!(cfg.fps, Fps::new(30, 1).unwrap());
}
