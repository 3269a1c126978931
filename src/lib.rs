//! Gravity Pong - two-paddle arc pong with a rotating gravity-well arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (paddles, ball, hazard cells, gravity well, scoring)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, menus and raw input capture live outside this crate; they feed a
//! [`sim::TickInput`] per frame and read back a [`sim::RenderSnapshot`].

pub mod sim;
pub mod tuning;

pub use tuning::{GravityPreset, Tuning, TuningError, GRAVITY_PRESETS};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Reference frame step (60 Hz), used by the demo driver and tests
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Default board size
    pub const DEFAULT_BOARD_WIDTH: f32 = 1280.0;
    pub const DEFAULT_BOARD_HEIGHT: f32 = 720.0;

    /// Upper bound on swept-sampling substeps for one tick
    pub const MAX_SWEEP_SAMPLES: usize = 64;

    /// Extra clearance when pushing the ball out of a paddle arc
    pub const ARC_CLEARANCE: f32 = 1.4;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

/// Rotate `point` about `pivot` by `angle` radians
#[inline]
pub fn rotate_about(point: Vec2, pivot: Vec2, angle: f32) -> Vec2 {
    pivot + Vec2::from_angle(angle).rotate(point - pivot)
}
