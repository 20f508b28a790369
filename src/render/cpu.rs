use crate::compile::plan::{DrawOp, Paint, StrokeStyle};
use crate::foundation::core::{Affine, BezPath, Point, Rgba8};
use crate::foundation::error::{SceneError, SceneResult};
use crate::render::backend::{FrameRGBA, RenderBackend, SurfaceDesc};

const MITER_LIMIT: f64 = 10.0;

/// CPU raster backend built on `vello_cpu`.
///
/// Ops are recorded into a fresh `RenderContext` per frame and rasterized into a persistent
/// premultiplied pixmap on [`RenderBackend::finish_frame`].
pub struct CpuBackend {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
    ctx: Option<vello_cpu::RenderContext>,
}

impl CpuBackend {
    /// Acquire a surface of `desc`'s physical size.
    pub fn new(desc: SurfaceDesc) -> SceneResult<Self> {
        let (width, height) = desc.physical_u16()?;
        Ok(Self {
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(width, height),
            ctx: None,
        })
    }

    /// Physical surface width.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Physical surface height.
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }
}

impl std::fmt::Debug for CpuBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuBackend")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("recording", &self.ctx.is_some())
            .finish()
    }
}

impl RenderBackend for CpuBackend {
    fn clear_surface(&mut self) -> SceneResult<()> {
        clear_pixmap(&mut self.pixmap, [0, 0, 0, 0]);
        self.ctx = Some(vello_cpu::RenderContext::new(self.width, self.height));
        Ok(())
    }

    fn exec_op(&mut self, op: &DrawOp, base: Affine) -> SceneResult<()> {
        let ctx = self
            .ctx
            .as_mut()
            .ok_or_else(|| SceneError::render("draw before the surface was cleared"))?;
        draw_op(ctx, op, base);
        Ok(())
    }

    fn finish_frame(&mut self) -> SceneResult<()> {
        let Some(mut ctx) = self.ctx.take() else {
            return Err(SceneError::render("finish_frame without a recorded frame"));
        };
        ctx.flush();
        ctx.render_to_pixmap(&mut self.pixmap);
        Ok(())
    }

    fn readback_rgba8(&mut self) -> SceneResult<FrameRGBA> {
        if self.ctx.is_some() {
            self.finish_frame()?;
        }
        Ok(FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn draw_op(ctx: &mut vello_cpu::RenderContext, op: &DrawOp, base: Affine) {
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

    match op {
        DrawOp::FillRect {
            rect,
            paint,
            transform,
            layer: _,
        } => {
            ctx.set_transform(affine_to_cpu(base * *transform));
            set_paint(ctx, paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1));
        }
        DrawOp::FillPath {
            path,
            paint,
            transform,
            layer: _,
        } => {
            ctx.set_transform(affine_to_cpu(base * *transform));
            set_paint(ctx, paint);
            ctx.fill_path(&bezpath_to_cpu(path));
        }
        DrawOp::StrokePath {
            path,
            paint,
            stroke,
            transform,
            layer: _,
        } => {
            ctx.set_transform(affine_to_cpu(base * *transform));
            set_paint(ctx, paint);
            ctx.set_stroke(stroke_to_cpu(stroke));
            ctx.stroke_path(&bezpath_to_cpu(path));
        }
    }
}

fn set_paint(ctx: &mut vello_cpu::RenderContext, paint: &Paint) {
    use vello_cpu::peniko::Gradient;

    match paint {
        Paint::Solid(c) => ctx.set_paint(color_to_cpu(*c)),
        Paint::Linear { start, end, stops } => {
            let stops = stops_to_cpu(stops);
            ctx.set_paint(
                Gradient::new_linear(point_to_cpu(*start), point_to_cpu(*end))
                    .with_stops(stops.as_slice()),
            );
        }
        Paint::Radial {
            start_center,
            start_radius,
            end_center,
            end_radius,
            stops,
        } => {
            let stops = stops_to_cpu(stops);
            ctx.set_paint(
                Gradient::new_two_point_radial(
                    point_to_cpu(*start_center),
                    *start_radius,
                    point_to_cpu(*end_center),
                    *end_radius,
                )
                .with_stops(stops.as_slice()),
            );
        }
    }
}

fn stops_to_cpu(stops: &[crate::compile::plan::ColorStop]) -> Vec<vello_cpu::peniko::ColorStop> {
    stops
        .iter()
        .map(|s| vello_cpu::peniko::ColorStop {
            offset: s.offset,
            color: color_to_cpu(s.color).into(),
        })
        .collect()
}

/// Butt caps, miter joins, miter limit 10.
fn stroke_to_cpu(stroke: &StrokeStyle) -> vello_cpu::kurbo::Stroke {
    use vello_cpu::kurbo::{Cap, Join, Stroke};

    let out = Stroke::new(stroke.width)
        .with_caps(Cap::Butt)
        .with_join(Join::Miter)
        .with_miter_limit(MITER_LIMIT);
    match &stroke.dash {
        Some(dash) => out.with_dashes(dash.offset, dash.pattern.iter().copied()),
        None => out,
    }
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
