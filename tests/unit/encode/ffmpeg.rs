use super::*;
use crate::foundation::core::Fps;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::new(60, 1).unwrap(),
    }
}

fn args_of(cmd: &Command) -> Vec<String> {
    cmd.get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

fn value_after(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1).cloned())
}

#[test]
fn command_reads_rawvideo_and_writes_h264() {
    let opts = FfmpegSinkOpts::new("out/scene.mp4");
    let cfg = SinkConfig {
        fps: Fps::new(30000, 1001).unwrap(),
        ..cfg(960, 540)
    };
    let cmd = encoder_command(&opts, &cfg);
    let args = args_of(&cmd);

    assert_eq!(cmd.get_program(), "ffmpeg");
    assert_eq!(args.first().map(String::as_str), Some("-y"));
    assert_eq!(value_after(&args, "-f").as_deref(), Some("rawvideo"));
    assert_eq!(value_after(&args, "-s").as_deref(), Some("960x540"));
    assert_eq!(value_after(&args, "-r").as_deref(), Some("30000/1001"));
    assert_eq!(value_after(&args, "-i").as_deref(), Some("pipe:0"));
    assert_eq!(value_after(&args, "-c:v").as_deref(), Some("libx264"));
    assert_eq!(args.last().map(String::as_str), Some("out/scene.mp4"));

    // Input format comes before `-i`, output format after it.
    let input = args.iter().position(|a| a == "-i").unwrap();
    let pix_fmts: Vec<usize> = args
        .iter()
        .enumerate()
        .filter(|(_, a)| *a == "-pix_fmt")
        .map(|(i, _)| i)
        .collect();
    assert_eq!(pix_fmts.len(), 2);
    assert!(pix_fmts[0] < input && pix_fmts[1] > input);
    assert_eq!(args[pix_fmts[0] + 1], "rgba");
    assert_eq!(args[pix_fmts[1] + 1], "yuv420p");
    assert!(args.iter().position(|a| a == "-r").unwrap() < input);
}

#[test]
fn command_refuses_overwrite_when_disabled() {
    let opts = FfmpegSinkOpts {
        overwrite: false,
        ..FfmpegSinkOpts::new("scene.mp4")
    };
    let args = args_of(&encoder_command(&opts, &cfg(4, 4)));
    assert!(args.contains(&"-n".to_owned()));
    assert!(!args.contains(&"-y".to_owned()));
}

#[test]
fn flatten_transparent_pixel_is_background() {
    let mut dst = vec![0u8; 4];
    flatten_over_bg(&mut dst, &[0, 0, 0, 0], [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_opaque_pixel_is_unchanged() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_over_bg(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn flatten_half_covered_pixel_mixes_with_background() {
    // Premultiplied white at alpha 128 over black stays at 128 per channel.
    let mut dst = vec![0u8; 4];
    flatten_over_bg(&mut dst, &[128, 128, 128, 128], [0, 0, 0, 255]).unwrap();
    assert_eq!(dst, vec![128, 128, 128, 255]);

    flatten_over_bg(&mut dst, &[0, 0, 0, 128], [255, 255, 255, 255]).unwrap();
    assert_eq!(dst, vec![127, 127, 127, 255]);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_over_bg(&mut dst, &[0; 4], [0; 4]).is_err());
}

#[test]
fn mp4_config_requires_even_dimensions() {
    assert!(validate_mp4_config(&cfg(960, 540)).is_ok());
    assert!(validate_mp4_config(&cfg(961, 540)).is_err());
    assert!(validate_mp4_config(&cfg(960, 0)).is_err());
    let mut zero_fps = cfg(960, 540);
    zero_fps.fps.den = 0;
    assert!(validate_mp4_config(&zero_fps).is_err());
}

#[test]
fn push_before_begin_is_an_error() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    };
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn refuses_to_overwrite_when_disabled() {
    let dir = std::env::temp_dir().join(format!("rickshaw-ffmpeg-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let out = dir.join("exists.mp4");
    std::fs::write(&out, b"x").unwrap();

    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        overwrite: false,
        ..FfmpegSinkOpts::new(&out)
    });
    let err = sink.begin(cfg(960, 540)).unwrap_err();
    assert!(err.to_string().contains("already exists"), "{err}");
    let _ = std::fs::remove_dir_all(&dir);
}
