use crate::compile::plan::{DrawOp, FramePlan};
use crate::foundation::core::{Affine, Canvas};
use crate::foundation::error::{SceneError, SceneResult};
use crate::foundation::math::unpremultiply_px;

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha** by default. The `premultiplied` flag is included to make
/// this explicit at API boundaries.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)` as stored.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Copy of the pixel data with straight (non-premultiplied) alpha.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            out.extend_from_slice(&unpremultiply_px([px[0], px[1], px[2], px[3]]));
        }
        out
    }
}

/// Description of the drawing surface a renderer asks for at mount.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceDesc {
    /// Logical resolution the scene is authored in.
    pub canvas: Canvas,
    /// Raster pixels per logical pixel.
    pub device_pixel_ratio: f64,
}

impl SurfaceDesc {
    /// The scene's fixed 960x540 logical surface at `device_pixel_ratio`.
    pub fn scene(device_pixel_ratio: f64) -> Self {
        Self {
            canvas: Canvas::logical(),
            device_pixel_ratio,
        }
    }

    /// Physical raster size.
    pub fn physical(&self) -> Canvas {
        self.canvas.scaled(self.device_pixel_ratio)
    }

    /// Physical size as `u16`, failing when the surface cannot be allocated.
    pub(crate) fn physical_u16(&self) -> SceneResult<(u16, u16)> {
        if !self.device_pixel_ratio.is_finite() || self.device_pixel_ratio <= 0.0 {
            return Err(SceneError::surface(format!(
                "device pixel ratio {} is not usable",
                self.device_pixel_ratio
            )));
        }
        let p = self.physical();
        if p.width == 0 || p.height == 0 {
            return Err(SceneError::surface("surface has zero area"));
        }
        let w: u16 = p
            .width
            .try_into()
            .map_err(|_| SceneError::surface("surface width exceeds u16"))?;
        let h: u16 = p
            .height
            .try_into()
            .map_err(|_| SceneError::surface("surface height exceeds u16"))?;
        Ok((w, h))
    }
}

/// A drawing surface that can execute a compiled [`FramePlan`].
///
/// Most users do not drive a backend directly; the
/// [`SceneRenderer`](crate::SceneRenderer) calls [`RenderBackend::render_plan`] once per frame.
pub trait RenderBackend {
    /// Reset the transform and clear the whole surface to transparent.
    fn clear_surface(&mut self) -> SceneResult<()>;

    /// Draw one op. `base` is the device-pixel-ratio transform, applied before the op's own.
    fn exec_op(&mut self, op: &DrawOp, base: Affine) -> SceneResult<()>;

    /// Flush recorded ops to the surface.
    fn finish_frame(&mut self) -> SceneResult<()> {
        Ok(())
    }

    /// Read back the surface contents.
    fn readback_rgba8(&mut self) -> SceneResult<FrameRGBA>;

    /// Clear, then execute every op back to front, then flush.
    fn render_plan(&mut self, plan: &FramePlan) -> SceneResult<()> {
        self.clear_surface()?;
        let base = plan.device_transform();
        for op in &plan.ops {
            self.exec_op(op, base)?;
        }
        self.finish_frame()
    }
}

impl<B: RenderBackend + ?Sized> RenderBackend for Box<B> {
    fn clear_surface(&mut self) -> SceneResult<()> {
        (**self).clear_surface()
    }

    fn exec_op(&mut self, op: &DrawOp, base: Affine) -> SceneResult<()> {
        (**self).exec_op(op, base)
    }

    fn finish_frame(&mut self) -> SceneResult<()> {
        (**self).finish_frame()
    }

    fn readback_rgba8(&mut self) -> SceneResult<FrameRGBA> {
        (**self).readback_rgba8()
    }

    fn render_plan(&mut self, plan: &FramePlan) -> SceneResult<()> {
        (**self).render_plan(plan)
    }
}

/// Available backend kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    /// CPU raster backend powered by `vello_cpu`.
    Cpu,
    /// Records surface calls without rasterizing.
    Recording,
}

/// Acquire a drawing surface of the requested kind.
pub fn create_backend(kind: BackendKind, desc: SurfaceDesc) -> SceneResult<Box<dyn RenderBackend>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::render::cpu::CpuBackend::new(desc)?)),
        BackendKind::Recording => Ok(Box::new(
            crate::render::recording::RecordingBackend::new(desc)?,
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
