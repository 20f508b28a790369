use crate::foundation::core::{Rgba8, SCENE_HEIGHT, SCENE_WIDTH};
use crate::scene::motion;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of fog bands drifting over the scene.
pub const FOG_LAYERS: usize = 5;
/// Number of skyline blocks along the horizon.
pub const SKYLINE_BLOCKS: usize = 9;

/// Fog layers that scroll past `-W - FOG_EXIT_MARGIN` are recycled.
const FOG_EXIT_MARGIN: f64 = 200.0;
/// Recycled fog layers re-enter within `[W, W + FOG_REENTRY_SPAN)`.
pub const FOG_REENTRY_SPAN: f64 = 400.0;

/// One horizontally drifting fog band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FogLayer {
    /// Horizontal position in logical pixels; decreases over time and wraps.
    pub offset: f64,
    /// Drift speed in logical pixels per second.
    pub speed: f64,
    /// Fixed vertical baseline.
    pub y: f64,
    /// Peak opacity in `[0, 1]`.
    pub opacity: f64,
    /// Vertical radius of the band.
    pub height: f64,
}

impl FogLayer {
    fn seeded(index: usize, rng: &mut StdRng) -> Self {
        let i = index as f64;
        Self {
            offset: rng.gen_range(0.0..1.0) * SCENE_WIDTH,
            speed: 18.0 + i * 9.0,
            y: SCENE_HEIGHT * 0.25 + i * 38.0,
            opacity: 0.12 + i * 0.05,
            height: 90.0 + i * 25.0,
        }
    }

    /// Drift left by `speed * delta_ms / 1000`; recycle past the left edge.
    ///
    /// Returns `true` when the layer was recycled to the right of the surface.
    pub fn advance(&mut self, delta_ms: f64, rng: &mut impl Rng) -> bool {
        self.offset -= self.speed * delta_ms / 1000.0;
        if self.offset < -SCENE_WIDTH - FOG_EXIT_MARGIN {
            self.offset = SCENE_WIDTH + rng.gen_range(0.0..1.0) * FOG_REENTRY_SPAN;
            return true;
        }
        false
    }
}

/// One flat-shaded skyline silhouette block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkylineBlock {
    /// Left edge.
    pub x: f64,
    /// Block width.
    pub width: f64,
    /// Height above the horizon line.
    pub height: f64,
    /// Fill color (translucent).
    pub color: Rgba8,
}

impl SkylineBlock {
    fn seeded(index: usize, rng: &mut StdRng) -> Self {
        let i = index as f64;
        let width_mul = 0.08 + rng.gen_range(0.0..1.0) * 0.08;
        let x = i * (SCENE_WIDTH / 8.0) + rng.gen_range(0.0..1.0) * (SCENE_WIDTH / 20.0)
            - SCENE_WIDTH * 0.05;
        let stagger = if index % 2 == 0 { 18.0 } else { -6.0 };
        let height = SCENE_HEIGHT * (0.22 + rng.gen_range(0.0..1.0) * 0.18) + stagger;
        Self {
            x,
            width: SCENE_WIDTH * width_mul,
            height,
            color: Rgba8::rgba(22, 41, 53, 0.28 + i * 0.04),
        }
    }
}

/// Frame clock: previous timestamp and the foreground scroll accumulator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneClock {
    /// Timestamp of the previous frame (or of mount), in ms.
    pub last_timestamp_ms: f64,
    /// Foreground scroll position, in `(-W, 0]`.
    pub foreground_scroll: f64,
}

/// Timing of one frame as seen by the draw routines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    /// Host timestamp of this frame, in ms.
    pub timestamp_ms: f64,
    /// Elapsed time since the previous frame, in ms.
    pub delta_ms: f64,
}

/// Construction options for a scene instance.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneOpts {
    /// Seed for the one-time randomized layout (skyline jitter, fog start offsets, fog re-entry).
    pub seed: u64,
    /// Raster pixels per logical pixel.
    pub device_pixel_ratio: f64,
}

impl Default for SceneOpts {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            device_pixel_ratio: 1.0,
        }
    }
}

/// Seed used when the host does not provide one.
pub const DEFAULT_SEED: u64 = 0x5EED_D4CA;

/// Mutable per-instance scene state, threaded through every frame.
///
/// Each mounted renderer owns exactly one `SceneState`; nothing here is shared between instances.
#[derive(Clone, Debug)]
pub struct SceneState {
    fog: [FogLayer; FOG_LAYERS],
    skyline: [SkylineBlock; SKYLINE_BLOCKS],
    clock: SceneClock,
    rng: StdRng,
}

impl SceneState {
    /// Build fresh state. `mount_ms` seeds the frame clock so the first delta is measured from
    /// mount time.
    pub fn new(seed: u64, mount_ms: f64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let fog = std::array::from_fn(|i| FogLayer::seeded(i, &mut rng));
        let skyline = std::array::from_fn(|i| SkylineBlock::seeded(i, &mut rng));
        Self {
            fog,
            skyline,
            clock: SceneClock {
                last_timestamp_ms: mount_ms,
                foreground_scroll: 0.0,
            },
            rng,
        }
    }

    /// Fog layers, back to front.
    pub fn fog_layers(&self) -> &[FogLayer] {
        &self.fog
    }

    /// Skyline blocks, left to right.
    pub fn skyline(&self) -> &[SkylineBlock] {
        &self.skyline
    }

    /// Current frame clock.
    pub fn clock(&self) -> SceneClock {
        self.clock
    }

    /// Advance all time-dependent state to `timestamp_ms`.
    ///
    /// The foreground strip moves one fixed step per call; fog layers move by elapsed time.
    pub fn advance(&mut self, timestamp_ms: f64) -> FrameTick {
        let delta_ms = timestamp_ms - self.clock.last_timestamp_ms;
        self.clock.last_timestamp_ms = timestamp_ms;
        self.clock.foreground_scroll = motion::step_foreground(self.clock.foreground_scroll);

        for (i, layer) in self.fog.iter_mut().enumerate() {
            if layer.advance(delta_ms, &mut self.rng) {
                tracing::trace!(layer = i, offset = layer.offset, "fog layer recycled");
            }
        }

        FrameTick {
            timestamp_ms,
            delta_ms,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
