use super::*;

fn op(layer: Layer) -> DrawOp {
    DrawOp::FillRect {
        rect: Rect::new(0.0, 0.0, 1.0, 1.0),
        paint: Paint::Solid(Rgba8::rgb(1, 2, 3)),
        transform: Affine::IDENTITY,
        layer,
    }
}

#[test]
fn layer_counts_group_consecutive_ops() {
    let plan = FramePlan {
        canvas: Canvas::logical(),
        device_pixel_ratio: 1.0,
        timestamp_ms: 0.0,
        ops: vec![
            op(Layer::Background),
            op(Layer::Background),
            op(Layer::Road),
            op(Layer::Fog),
        ],
    };
    assert_eq!(
        plan.layer_counts(),
        vec![(Layer::Background, 2), (Layer::Road, 1), (Layer::Fog, 1)]
    );
}

#[test]
fn device_transform_scales_uniformly() {
    let plan = FramePlan {
        canvas: Canvas::logical(),
        device_pixel_ratio: 2.0,
        timestamp_ms: 0.0,
        ops: vec![],
    };
    let p = plan.device_transform() * Point::new(10.0, 5.0);
    assert_eq!(p, Point::new(20.0, 10.0));
}

#[test]
fn gradient_helpers_keep_stop_order() {
    let a = Rgba8::rgb(0, 0, 0);
    let b = Rgba8::rgb(255, 255, 255);
    let Paint::Linear { stops, .. } =
        Paint::linear(Point::ZERO, Point::new(0.0, 1.0), &[(0.0, a), (1.0, b)])
    else {
        panic!("expected linear paint");
    };
    assert_eq!(stops, vec![ColorStop::new(0.0, a), ColorStop::new(1.0, b)]);

    let Paint::Radial {
        start_center,
        end_center,
        start_radius,
        end_radius,
        ..
    } = Paint::radial(Point::new(3.0, 4.0), 6.0, 48.0, &[(0.0, a), (1.0, b)])
    else {
        panic!("expected radial paint");
    };
    assert_eq!(start_center, end_center);
    assert_eq!((start_radius, end_radius), (6.0, 48.0));
}
