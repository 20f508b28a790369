use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8};

/// Gradient color stop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    /// Position along the gradient in `[0, 1]`.
    pub offset: f32,
    /// Straight-alpha color at `offset`.
    pub color: Rgba8,
}

impl ColorStop {
    /// Create a stop.
    pub fn new(offset: f32, color: Rgba8) -> Self {
        Self { offset, color }
    }
}

/// How a shape is filled or stroked.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    /// Flat color.
    Solid(Rgba8),
    /// Linear gradient between two points (in the op's local space).
    Linear {
        /// Gradient start point.
        start: Point,
        /// Gradient end point.
        end: Point,
        /// Color stops, ascending offsets.
        stops: Vec<ColorStop>,
    },
    /// Two-circle radial gradient (in the op's local space).
    Radial {
        /// Centre of the start circle.
        start_center: Point,
        /// Radius of the start circle.
        start_radius: f32,
        /// Centre of the end circle.
        end_center: Point,
        /// Radius of the end circle.
        end_radius: f32,
        /// Color stops, ascending offsets.
        stops: Vec<ColorStop>,
    },
}

impl Paint {
    /// Linear gradient from `(offset, color)` pairs.
    pub fn linear(start: Point, end: Point, stops: &[(f32, Rgba8)]) -> Self {
        Self::Linear {
            start,
            end,
            stops: stops.iter().map(|&(o, c)| ColorStop::new(o, c)).collect(),
        }
    }

    /// Radial gradient between two concentric circles, from `(offset, color)` pairs.
    pub fn radial(center: Point, r0: f32, r1: f32, stops: &[(f32, Rgba8)]) -> Self {
        Self::Radial {
            start_center: center,
            start_radius: r0,
            end_center: center,
            end_radius: r1,
            stops: stops.iter().map(|&(o, c)| ColorStop::new(o, c)).collect(),
        }
    }
}

/// Line dash pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct Dash {
    /// Alternating on/off lengths.
    pub pattern: Vec<f64>,
    /// Phase offset into the pattern.
    pub offset: f64,
}

/// Stroke parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Line width in logical pixels.
    pub width: f64,
    /// Optional dash pattern; solid when `None`.
    pub dash: Option<Dash>,
}

impl StrokeStyle {
    /// Solid stroke of `width`.
    pub fn solid(width: f64) -> Self {
        Self { width, dash: None }
    }
}

/// Scene layer an op belongs to, in back-to-front order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// Sky gradient and sun glow.
    Background,
    /// Skyline blocks and haze band.
    Skyline,
    /// Ground, centerline and horizon edge.
    Road,
    /// Wheels, body, canopy, headlight and driver.
    Rickshaw,
    /// Dust band and pebbles.
    Foreground,
    /// Fog bands.
    Fog,
}

/// A single draw operation in logical coordinates.
///
/// `transform` maps the op's local space to logical scene space; backends pre-multiply their own
/// device-pixel-ratio scale.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill an axis-aligned rectangle.
    FillRect {
        /// Rectangle in local space.
        rect: Rect,
        /// Fill paint.
        paint: Paint,
        /// Local-to-scene transform.
        transform: Affine,
        /// Owning layer.
        layer: Layer,
    },
    /// Fill a closed path (non-zero winding).
    FillPath {
        /// Path in local space.
        path: BezPath,
        /// Fill paint.
        paint: Paint,
        /// Local-to-scene transform.
        transform: Affine,
        /// Owning layer.
        layer: Layer,
    },
    /// Stroke a path.
    StrokePath {
        /// Path in local space.
        path: BezPath,
        /// Stroke paint.
        paint: Paint,
        /// Stroke width and dashing.
        stroke: StrokeStyle,
        /// Local-to-scene transform.
        transform: Affine,
        /// Owning layer.
        layer: Layer,
    },
}

impl DrawOp {
    /// Layer this op belongs to.
    pub fn layer(&self) -> Layer {
        match self {
            DrawOp::FillRect { layer, .. }
            | DrawOp::FillPath { layer, .. }
            | DrawOp::StrokePath { layer, .. } => *layer,
        }
    }
}

/// Backend-agnostic description of one frame.
///
/// Executing a plan means: reset the transform, clear the whole surface, re-apply
/// `device_pixel_ratio` scaling, then run `ops` in order.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePlan {
    /// Logical canvas the ops are authored against.
    pub canvas: Canvas,
    /// Raster pixels per logical pixel.
    pub device_pixel_ratio: f64,
    /// Host timestamp the plan was compiled for, in ms.
    pub timestamp_ms: f64,
    /// Draw ops, back to front.
    pub ops: Vec<DrawOp>,
}

impl FramePlan {
    /// Base transform every op is composed with.
    pub fn device_transform(&self) -> Affine {
        Affine::scale(self.device_pixel_ratio)
    }

    /// Number of ops per layer, in layer order.
    pub fn layer_counts(&self) -> Vec<(Layer, usize)> {
        let mut out: Vec<(Layer, usize)> = Vec::new();
        for op in &self.ops {
            if let Some((layer, n)) = out.last_mut()
                && *layer == op.layer()
            {
                *n += 1;
                continue;
            }
            out.push((op.layer(), 1));
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/plan.rs"]
mod tests;
