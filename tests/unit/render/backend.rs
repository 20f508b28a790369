use super::*;
use crate::compile::plan::{Layer, Paint};
use crate::foundation::core::{Rect, Rgba8};
use crate::render::recording::{RecordingBackend, SurfaceCall};

#[test]
fn surface_desc_scales_logical_canvas() {
    let desc = SurfaceDesc::scene(2.0);
    let p = desc.physical();
    assert_eq!((p.width, p.height), (1920, 1080));
    assert_eq!(desc.physical_u16().unwrap(), (1920, 1080));
}

#[test]
fn surface_desc_rejects_unusable_ratios() {
    for dpr in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e-6, 100.0] {
        let err = SurfaceDesc::scene(dpr).physical_u16().unwrap_err();
        assert!(
            matches!(err, SceneError::Surface(_)),
            "dpr {dpr} should fail with a surface error, got {err}"
        );
    }
}

#[test]
fn straight_alpha_conversion_unpremultiplies() {
    let frame = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![64, 32, 0, 128, 10, 20, 30, 255],
        premultiplied: true,
    };
    let straight = frame.to_straight_rgba8();
    assert_eq!(&straight[4..], &[10, 20, 30, 255]);
    assert_eq!(straight[3], 128);
    assert!(straight[0] > 64);

    let already = FrameRGBA {
        premultiplied: false,
        ..frame.clone()
    };
    assert_eq!(already.to_straight_rgba8(), already.data);
}

#[test]
fn pixel_lookup_is_bounds_checked() {
    let frame = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![1, 2, 3, 4],
        premultiplied: true,
    };
    assert_eq!(frame.pixel(0, 0), Some([1, 2, 3, 4]));
    assert_eq!(frame.pixel(1, 0), None);
    assert_eq!(frame.pixel(0, 1), None);
}

#[test]
fn render_plan_clears_then_draws_then_finishes() {
    let mut backend = RecordingBackend::new(SurfaceDesc::scene(1.0)).unwrap();
    let plan = FramePlan {
        canvas: Canvas::logical(),
        device_pixel_ratio: 1.0,
        timestamp_ms: 0.0,
        ops: vec![DrawOp::FillRect {
            rect: Rect::new(0.0, 0.0, 1.0, 1.0),
            paint: Paint::Solid(Rgba8::rgb(1, 2, 3)),
            transform: Affine::IDENTITY,
            layer: Layer::Road,
        }],
    };
    backend.render_plan(&plan).unwrap();
    assert_eq!(
        backend.calls(),
        &[
            SurfaceCall::Clear,
            SurfaceCall::FillRect(Layer::Road),
            SurfaceCall::Finish
        ]
    );
}

#[test]
fn create_backend_reports_surface_failures() {
    assert!(create_backend(BackendKind::Cpu, SurfaceDesc::scene(0.0)).is_err());
    assert!(create_backend(BackendKind::Recording, SurfaceDesc::scene(1.0)).is_ok());
}
