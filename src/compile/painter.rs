//! Scene painter: turns the current [`SceneState`] into a [`FramePlan`].
//!
//! Layers are emitted strictly back to front: background, skyline, road, rickshaw, foreground,
//! fog. All coordinates are logical (960x540); the device pixel ratio is applied by the backend.

use std::f64::consts::PI;

use kurbo::Shape as _;

use crate::compile::plan::{Dash, DrawOp, FramePlan, Layer, Paint, StrokeStyle};
use crate::foundation::core::{
    Affine, BezPath, Canvas, Point, Rect, Rgba8, SCENE_HEIGHT, SCENE_WIDTH, Vec2,
};
use crate::scene::model::{FrameTick, SceneState};
use crate::scene::motion::{self, Wheel};

const W: f64 = SCENE_WIDTH;
const H: f64 = SCENE_HEIGHT;

/// Flattening tolerance for circles, ellipses and arcs.
const TOLERANCE: f64 = 0.1;

const WHEEL_RADIUS: f64 = 46.0;
const RIM_RADIUS: f64 = 32.0;

/// Compile one frame.
///
/// `state` must already have been advanced to `tick` (see [`SceneState::advance`]); the painter
/// itself never mutates scene state.
pub fn compile_frame(state: &SceneState, tick: FrameTick, device_pixel_ratio: f64) -> FramePlan {
    let t = tick.timestamp_ms;
    let mut b = PlanBuilder::new();

    draw_background(&mut b);
    draw_skyline(&mut b, state);
    draw_road(&mut b, t);
    draw_rickshaw(&mut b, t);
    draw_foreground(&mut b, state);
    draw_fog(&mut b, state);

    FramePlan {
        canvas: Canvas::logical(),
        device_pixel_ratio,
        timestamp_ms: t,
        ops: b.ops,
    }
}

struct PlanBuilder {
    ops: Vec<DrawOp>,
    layer: Layer,
}

impl PlanBuilder {
    fn new() -> Self {
        Self {
            ops: Vec::with_capacity(96),
            layer: Layer::Background,
        }
    }

    fn layer(&mut self, layer: Layer) {
        self.layer = layer;
    }

    fn fill_rect(&mut self, rect: Rect, paint: Paint) {
        self.ops.push(DrawOp::FillRect {
            rect,
            paint,
            transform: Affine::IDENTITY,
            layer: self.layer,
        });
    }

    fn fill(&mut self, path: BezPath, paint: Paint) {
        self.ops.push(DrawOp::FillPath {
            path,
            paint,
            transform: Affine::IDENTITY,
            layer: self.layer,
        });
    }

    fn stroke(&mut self, path: BezPath, paint: Paint, stroke: StrokeStyle) {
        self.stroke_with(path, paint, stroke, Affine::IDENTITY);
    }

    fn stroke_with(&mut self, path: BezPath, paint: Paint, stroke: StrokeStyle, transform: Affine) {
        self.ops.push(DrawOp::StrokePath {
            path,
            paint,
            stroke,
            transform,
            layer: self.layer,
        });
    }
}

fn rect_xywh(x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect::new(x, y, x + w, y + h)
}

fn line(from: (f64, f64), to: (f64, f64)) -> BezPath {
    let mut p = BezPath::new();
    p.move_to(from);
    p.line_to(to);
    p
}

fn circle(center: (f64, f64), r: f64) -> BezPath {
    kurbo::Circle::new(center, r).to_path(TOLERANCE)
}

fn ellipse(center: (f64, f64), rx: f64, ry: f64) -> BezPath {
    kurbo::Ellipse::new(center, (rx, ry), 0.0).to_path(TOLERANCE)
}

fn draw_background(b: &mut PlanBuilder) {
    b.layer(Layer::Background);
    b.fill_rect(
        rect_xywh(0.0, 0.0, W, H),
        Paint::linear(
            Point::new(0.0, 0.0),
            Point::new(0.0, H),
            &[
                (0.0, Rgba8::rgb(0x1c, 0x2d, 0x3f)),
                (0.5, Rgba8::rgb(0x24, 0x3c, 0x4b)),
                (1.0, Rgba8::rgb(0x4d, 0x52, 0x4b)),
            ],
        ),
    );

    let sun = (W * 0.75, H * 0.2);
    b.fill(
        circle(sun, 220.0),
        Paint::radial(
            sun.into(),
            10.0,
            220.0,
            &[
                (0.0, Rgba8::rgba(255, 202, 128, 0.38)),
                (1.0, Rgba8::rgba(255, 202, 128, 0.0)),
            ],
        ),
    );
}

fn draw_skyline(b: &mut PlanBuilder, state: &SceneState) {
    b.layer(Layer::Skyline);
    let horizon = H * 0.35;
    for block in state.skyline() {
        b.fill_rect(
            rect_xywh(block.x, horizon - block.height, block.width, block.height),
            Paint::Solid(block.color),
        );
    }

    // Haze band softening the skyline's base.
    b.fill_rect(
        rect_xywh(-W * 0.1, H * 0.5, W * 1.2, H * 0.3),
        Paint::Solid(Rgba8::rgba(30, 49, 58, 0.4)),
    );
}

fn draw_road(b: &mut PlanBuilder, t: f64) {
    b.layer(Layer::Road);
    let road_top = H * 0.55;
    b.fill_rect(
        rect_xywh(0.0, road_top, W, H - road_top),
        Paint::linear(
            Point::new(0.0, road_top),
            Point::new(0.0, H),
            &[(0.0, Rgba8::rgb(0x2b, 0x2f, 0x33)), (1.0, Rgba8::rgb(0x1a, 0x1c, 0x1f))],
        ),
    );

    b.stroke(
        line((W * 0.1, H * 0.62), (W * 0.9, H * 0.68)),
        Paint::Solid(Rgba8::rgba(255, 225, 180, 0.45)),
        StrokeStyle {
            width: 2.0,
            dash: Some(Dash {
                pattern: motion::CENTERLINE_DASH.to_vec(),
                offset: motion::dash_offset(t),
            }),
        },
    );

    b.stroke(
        line((0.0, H * 0.55), (W, H * 0.65)),
        Paint::Solid(Rgba8::rgba(255, 255, 255, 0.12)),
        StrokeStyle::solid(3.0),
    );
}

fn draw_rickshaw(b: &mut PlanBuilder, t: f64) {
    b.layer(Layer::Rickshaw);
    let (x, y) = motion::rickshaw_origin(t);

    for wheel in Wheel::ALL {
        draw_wheel(
            b,
            (x + wheel.offset_x(), y + 48.0),
            motion::wheel_rotation_deg(t, wheel),
        );
    }

    let mut chassis = BezPath::new();
    chassis.move_to((x - 120.0, y + 18.0));
    chassis.quad_to((x - 40.0, y - 10.0), (x + 110.0, y - 4.0));
    chassis.line_to((x + 110.0, y + 20.0));
    chassis.line_to((x - 110.0, y + 32.0));
    chassis.close_path();
    b.fill(chassis.clone(), Paint::Solid(Rgba8::rgb(0x2e, 0x5a, 0x4f)));
    b.stroke(chassis, Paint::Solid(Rgba8::rgb(0x21, 0x43, 0x3a)), StrokeStyle::solid(6.0));

    let mut seat = BezPath::new();
    seat.move_to((x - 78.0, y - 82.0));
    seat.quad_to((x, y - 148.0), (x + 92.0, y - 100.0));
    seat.line_to((x + 70.0, y - 28.0));
    seat.line_to((x - 60.0, y - 40.0));
    seat.close_path();
    b.fill(seat, Paint::Solid(Rgba8::rgb(0x3d, 0x76, 0x6a)));

    let mut canopy = BezPath::new();
    canopy.move_to((x - 90.0, y - 76.0));
    canopy.quad_to((x, y - 170.0), (x + 98.0, y - 82.0));
    canopy.quad_to((x + 70.0, y - 40.0), (x - 50.0, y - 42.0));
    canopy.close_path();
    b.fill(
        canopy,
        Paint::linear(
            Point::new(x - 90.0, y - 150.0),
            Point::new(x + 90.0, y - 20.0),
            &[
                (0.0, Rgba8::rgb(0x1b, 0x3b, 0x56)),
                (0.5, Rgba8::rgb(0x28, 0x4c, 0x6c)),
                (1.0, Rgba8::rgb(0x1b, 0x32, 0x48)),
            ],
        ),
    );

    let lamp = (x + 132.0, y + 12.0);
    b.fill(
        circle(lamp, 48.0),
        Paint::radial(
            lamp.into(),
            6.0,
            48.0,
            &[
                (0.0, Rgba8::rgba(255, 235, 180, 0.65)),
                (1.0, Rgba8::rgba(255, 235, 180, 0.0)),
            ],
        ),
    );

    draw_driver(b, x, y, t);
}

fn draw_wheel(b: &mut PlanBuilder, center: (f64, f64), rotation_deg: f64) {
    b.fill(circle(center, WHEEL_RADIUS), Paint::Solid(Rgba8::rgb(0x1a, 0x1a, 0x1a)));
    b.stroke(
        circle(center, RIM_RADIUS),
        Paint::Solid(Rgba8::rgb(0xd5, 0xd4, 0xce)),
        StrokeStyle::solid(4.0),
    );

    let hub = Affine::translate(Vec2::new(center.0, center.1))
        * Affine::rotate(rotation_deg.to_radians());
    let spoke_paint = Paint::Solid(Rgba8::rgba(210, 210, 210, 0.7));
    for spoke in 0..motion::SPOKES {
        let angle = spoke as f64 * PI / 3.0;
        b.stroke_with(
            line((0.0, 0.0), (angle.cos() * RIM_RADIUS, angle.sin() * RIM_RADIUS)),
            spoke_paint.clone(),
            StrokeStyle::solid(3.0),
            hub,
        );
    }
}

fn draw_driver(b: &mut PlanBuilder, x: f64, y: f64, t: f64) {
    let dx = x - 16.0;
    let dy = y - 20.0;

    let mut lungi = BezPath::new();
    lungi.move_to((dx - 18.0, dy + 12.0));
    lungi.quad_to((dx + motion::lungi_sway(t), dy + 72.0), (dx + 26.0, dy + 68.0));
    lungi.line_to((dx + 8.0, dy + 12.0));
    lungi.close_path();
    b.fill(
        lungi,
        Paint::linear(
            Point::new(dx - 20.0, dy + 58.0),
            Point::new(dx + 24.0, dy + 6.0),
            &[(0.0, Rgba8::rgb(0x24, 0x49, 0x5b)), (1.0, Rgba8::rgb(0x3a, 0x6c, 0x80))],
        ),
    );

    let mut jacket = BezPath::new();
    jacket.move_to((dx - 10.0, dy - 22.0));
    jacket.quad_to((dx + 6.0, dy + 12.0), (dx + 2.0, dy + 48.0));
    jacket.line_to((dx - 22.0, dy + 32.0));
    jacket.quad_to((dx - 28.0, dy), (dx - 18.0, dy - 30.0));
    jacket.close_path();
    b.fill(jacket, Paint::Solid(Rgba8::rgb(0x5f, 0x5e, 0x6d)));

    b.fill(circle((dx + 4.0, dy - 28.0), 14.0), Paint::Solid(Rgba8::rgb(0xc4, 0x92, 0x62)));

    let hair_arc = kurbo::Arc {
        center: Point::new(dx + 2.0, dy - 32.0),
        radii: Vec2::new(14.0, 14.0),
        start_angle: PI * 0.2,
        sweep_angle: PI * 0.6,
        x_rotation: 0.0,
    };
    let mut hair = BezPath::new();
    hair.move_to(hair_arc.center + Vec2::from_angle(hair_arc.start_angle) * 14.0);
    hair.extend(hair_arc.append_iter(TOLERANCE));
    hair.line_to((dx + 8.0, dy - 14.0));
    hair.quad_to((dx - 6.0, dy - 10.0), (dx - 2.0, dy - 34.0));
    hair.close_path();
    b.fill(hair, Paint::Solid(Rgba8::rgb(0x2d, 0x24, 0x1c)));

    let handle_y = y - 12.0;
    b.stroke(
        line((x - 24.0, handle_y), (x + 90.0, handle_y + 12.0)),
        Paint::Solid(Rgba8::rgb(0x3b, 0x3f, 0x45)),
        StrokeStyle::solid(9.0),
    );

    let mut arm = BezPath::new();
    arm.move_to((dx - 8.0, dy + 8.0));
    arm.quad_to((dx + 24.0, dy + 2.0), (x + 84.0, handle_y + 15.0));
    b.stroke(arm, Paint::Solid(Rgba8::rgb(0xcf, 0xa8, 0x7a)), StrokeStyle::solid(7.0));

    let mut frame = line((x - 70.0, y - 60.0), (x + 70.0, y - 48.0));
    frame.move_to((x - 60.0, y - 32.0));
    frame.line_to((x + 66.0, y - 22.0));
    b.stroke(
        frame,
        Paint::Solid(Rgba8::rgba(221, 208, 170, 0.6)),
        StrokeStyle::solid(3.0),
    );
}

fn draw_foreground(b: &mut PlanBuilder, state: &SceneState) {
    b.layer(Layer::Foreground);
    let scroll = state.clock().foreground_scroll;
    b.fill_rect(
        rect_xywh(-W + scroll, H * 0.85, W * 2.0, H * 0.2),
        Paint::Solid(Rgba8::rgba(90, 96, 90, 0.35)),
    );

    let pebble = Paint::Solid(Rgba8::rgba(255, 255, 255, 0.085));
    for i in 0..motion::PEBBLES {
        b.fill(
            ellipse((motion::pebble_x(i, scroll), motion::pebble_y(i)), 86.0, 22.0),
            pebble.clone(),
        );
    }
}

fn draw_fog(b: &mut PlanBuilder, state: &SceneState) {
    b.layer(Layer::Fog);
    for layer in state.fog_layers() {
        let mist = |alpha: f64| Rgba8::rgba(180, 190, 198, alpha);
        b.fill(
            ellipse(
                (motion::fog_center_x(layer.offset), layer.y),
                200.0,
                layer.height,
            ),
            Paint::linear(
                Point::new(layer.offset - 120.0, layer.y),
                Point::new(layer.offset + 180.0, layer.y + layer.height),
                &[
                    (0.0, mist(0.0)),
                    (0.4, mist(layer.opacity * 0.6)),
                    (1.0, mist(0.0)),
                ],
            ),
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/painter.rs"]
mod tests;
