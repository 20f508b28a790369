use super::*;
use crate::foundation::core::Fps;

fn temp_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("rickshaw-png-{tag}-{}", std::process::id()))
}

#[test]
fn file_names_are_zero_padded() {
    assert_eq!(PngSequenceSink::file_name(FrameIndex(0)), "frame_00000.png");
    assert_eq!(PngSequenceSink::file_name(FrameIndex(42)), "frame_00042.png");
}

#[test]
fn writes_straight_alpha_pngs() {
    let dir = temp_dir("seq");
    let mut sink = PngSequenceSink::new(&dir);
    sink.begin(SinkConfig {
        width: 2,
        height: 1,
        fps: Fps::new(24, 1).unwrap(),
    })
    .unwrap();
    let frame = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![64, 0, 0, 128, 0, 0, 255, 255],
        premultiplied: true,
    };
    sink.push_frame(FrameIndex(5), &frame).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.written(), &[dir.join("frame_00005.png")]);
    let img = image::open(dir.join("frame_00005.png")).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 1));
    let px = img.get_pixel(0, 0).0;
    assert_eq!(px[3], 128);
    assert!((i32::from(px[0]) - 128).abs() <= 1, "{px:?}");
    assert_eq!(img.get_pixel(1, 0).0, [0, 0, 255, 255]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn end_without_begin_is_an_error() {
    let mut sink = PngSequenceSink::new(temp_dir("unused"));
    assert!(sink.end().is_err());
}
