//! Closed-form motion curves.
//!
//! Everything here is a pure function of the host timestamp (milliseconds) or of explicit layer
//! state, so a frame can be reproduced from `(seed, timestamp)` alone.

use crate::foundation::core::{SCENE_HEIGHT, SCENE_WIDTH};

/// Dash pattern of the road centerline: 16px on, 26px off.
pub const CENTERLINE_DASH: [f64; 2] = [16.0, 26.0];
/// Horizontal distance the foreground strip moves per frame, independent of elapsed time.
pub const FOREGROUND_STEP: f64 = 0.8;
/// Number of spokes per wheel.
pub const SPOKES: usize = 6;
/// Number of pebble ellipses tiled across the foreground.
pub const PEBBLES: usize = 12;

/// Road centerline dash offset: `(t / 18) mod 42`.
pub fn dash_offset(t_ms: f64) -> f64 {
    (t_ms / 18.0) % (CENTERLINE_DASH[0] + CENTERLINE_DASH[1])
}

/// One of the rickshaw's two wheels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wheel {
    /// Wheel under the passenger seat.
    Rear,
    /// Wheel under the driver.
    Front,
}

impl Wheel {
    /// Both wheels, rear first.
    pub const ALL: [Wheel; 2] = [Wheel::Rear, Wheel::Front];

    /// Horizontal offset from the rickshaw body anchor.
    pub fn offset_x(self) -> f64 {
        match self {
            Wheel::Rear => -120.0,
            Wheel::Front => 120.0,
        }
    }

    /// Spin multiplier; the wheels turn at slightly different rates.
    pub fn spin_rate(self) -> f64 {
        match self {
            Wheel::Rear => 1.1,
            Wheel::Front => 1.25,
        }
    }
}

/// Wheel rotation in degrees: `(t / 260 * rate) mod 360`.
pub fn wheel_rotation_deg(t_ms: f64, wheel: Wheel) -> f64 {
    ((t_ms / 260.0) * wheel.spin_rate()) % 360.0
}

/// Vertical bounce of the rickshaw body.
pub fn bounce(t_ms: f64) -> f64 {
    (t_ms / 320.0).sin() * 4.0
}

/// Slow horizontal drift of the rickshaw body.
pub fn drift(t_ms: f64) -> f64 {
    (t_ms / 1500.0).sin() * 8.0
}

/// Sway of the lungi hem control point.
pub fn lungi_sway(t_ms: f64) -> f64 {
    (t_ms / 380.0).sin() * 10.0
}

/// Rickshaw body anchor at time `t`.
pub fn rickshaw_origin(t_ms: f64) -> (f64, f64) {
    (
        SCENE_WIDTH * 0.42 + drift(t_ms),
        SCENE_HEIGHT * 0.62 + bounce(t_ms),
    )
}

/// One fixed foreground step: `(scroll - 0.8) mod W`, keeping the dividend's sign.
pub fn step_foreground(scroll: f64) -> f64 {
    (scroll - FOREGROUND_STEP) % SCENE_WIDTH
}

/// Centre x of pebble `i` for a given foreground scroll.
pub fn pebble_x(i: usize, scroll: f64) -> f64 {
    ((i as f64 * 120.0 + scroll * 2.0) % (SCENE_WIDTH + 120.0)) - 60.0
}

/// Centre y of pebble `i`.
pub fn pebble_y(i: usize) -> f64 {
    SCENE_HEIGHT * 0.83 + (i as f64 * 1.3).sin() * 6.0
}

/// On-screen centre x of a fog ellipse for a layer offset.
pub fn fog_center_x(offset: f64) -> f64 {
    offset % (SCENE_WIDTH + 200.0) - 100.0
}

#[cfg(test)]
#[path = "../../tests/unit/scene/motion.rs"]
mod tests;
