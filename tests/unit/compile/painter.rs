use super::*;
use crate::compile::plan::Layer;
use kurbo::Shape as _;

fn plan_at(seed: u64, t: f64) -> (SceneState, FramePlan) {
    let mut state = SceneState::new(seed, 0.0);
    let tick = state.advance(t);
    let plan = compile_frame(&state, tick, 1.0);
    (state, plan)
}

#[test]
fn layers_are_emitted_back_to_front() {
    let (_, plan) = plan_at(1, 1_234.0);
    assert!(
        plan.ops.windows(2).all(|w| w[0].layer() <= w[1].layer()),
        "ops must be grouped in layer order"
    );
    assert_eq!(
        plan.layer_counts(),
        vec![
            (Layer::Background, 2),
            (Layer::Skyline, 10),
            (Layer::Road, 3),
            (Layer::Rickshaw, 28),
            (Layer::Foreground, 13),
            (Layer::Fog, 5),
        ]
    );
}

#[test]
fn compile_is_pure_for_a_given_state() {
    let mut state = SceneState::new(5, 0.0);
    let tick = state.advance(16.0);
    let a = compile_frame(&state, tick, 2.0);
    let b = compile_frame(&state, tick, 2.0);
    assert_eq!(a, b);
    assert_eq!(a.device_pixel_ratio, 2.0);
    assert_eq!(a.canvas, Canvas::logical());
}

#[test]
fn centerline_dash_offset_follows_timestamp() {
    for t in [0.0, 100.0, 9_999.0] {
        let (_, plan) = plan_at(2, t);
        let dashed: Vec<&Dash> = plan
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::StrokePath {
                    stroke:
                        StrokeStyle {
                            dash: Some(dash), ..
                        },
                    ..
                } => Some(dash),
                _ => None,
            })
            .collect();
        assert_eq!(dashed.len(), 1);
        assert_eq!(dashed[0].offset, motion::dash_offset(t));
        assert_eq!(dashed[0].pattern, vec![16.0, 26.0]);
    }
}

#[test]
fn spokes_rotate_with_wheel_angle() {
    let t = 2_000.0;
    let (_, plan) = plan_at(3, t);
    let spokes: Vec<&DrawOp> = plan
        .ops
        .iter()
        .filter(|op| matches!(op, DrawOp::StrokePath { transform, .. } if *transform != Affine::IDENTITY))
        .collect();
    assert_eq!(spokes.len(), 2 * motion::SPOKES);

    let (x, y) = motion::rickshaw_origin(t);
    for (i, wheel) in motion::Wheel::ALL.into_iter().enumerate() {
        let offset = wheel.offset_x();
        let DrawOp::StrokePath { transform, .. } = spokes[i * motion::SPOKES] else {
            unreachable!();
        };
        let tip = *transform * Point::new(RIM_RADIUS, 0.0);
        let angle = motion::wheel_rotation_deg(t, wheel).to_radians();
        let expected = Point::new(
            x + offset + angle.cos() * RIM_RADIUS,
            y + 48.0 + angle.sin() * RIM_RADIUS,
        );
        assert!((tip - expected).hypot() < 1e-9, "{wheel:?}");
    }
}

#[test]
fn fog_ellipses_follow_layer_offsets() {
    let (state, plan) = plan_at(4, 500.0);
    let fog: Vec<&DrawOp> = plan
        .ops
        .iter()
        .filter(|op| op.layer() == Layer::Fog)
        .collect();
    for (op, layer) in fog.iter().zip(state.fog_layers()) {
        let DrawOp::FillPath { path, paint, .. } = op else {
            panic!("fog must be filled paths");
        };
        let bbox = path.bounding_box();
        assert!((bbox.center().x - motion::fog_center_x(layer.offset)).abs() < 0.5);
        assert!((bbox.center().y - layer.y).abs() < 0.5);
        assert!((bbox.height() - 2.0 * layer.height).abs() < 1.0);
        assert!(matches!(paint, Paint::Linear { stops, .. } if stops.len() == 3));
    }
}

#[test]
fn foreground_band_tracks_scroll() {
    let mut state = SceneState::new(6, 0.0);
    let mut tick = state.advance(0.0);
    for i in 1..10 {
        tick = state.advance(f64::from(i) * 16.0);
    }
    let plan = compile_frame(&state, tick, 1.0);
    let band = plan
        .ops
        .iter()
        .find(|op| op.layer() == Layer::Foreground)
        .expect("foreground band");
    let DrawOp::FillRect { rect, .. } = band else {
        panic!("band must be a rect");
    };
    let scroll = state.clock().foreground_scroll;
    assert!((scroll + 8.0).abs() < 1e-9);
    assert!((rect.x0 - (-W + scroll)).abs() < 1e-9);
    assert!((rect.width() - 2.0 * W).abs() < 1e-9);
}
