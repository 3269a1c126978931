//! Arc geometry for the curved paddles
//!
//! Each paddle collides as a circular arc centered on the paddle's geometric
//! center, in paddle-local polar coordinates:
//! - radius: centerline distance from the paddle center
//! - thickness: radial extent (inner = radius - thickness/2, outer = radius + thickness/2)
//! - mid_theta, sweep: angular extent, centered on the direction facing the board center

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Side;
use crate::{cartesian_to_polar, normalize_angle, polar_to_cartesian};

/// A thickened arc in paddle-local polar space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaddleArc {
    /// Arc center (board coordinates)
    pub center: Vec2,
    /// Centerline radius
    pub radius: f32,
    /// Radial thickness (extends radius ± thickness/2)
    pub thickness: f32,
    /// Direction the arc faces (radians, normalized to [-π, π))
    pub mid_theta: f32,
    /// Total angular sweep (radians)
    pub sweep: f32,
}

impl PaddleArc {
    /// Arc for a paddle on `side`, opening toward the center line
    pub fn facing_center(side: Side, center: Vec2, radius: f32, thickness: f32, sweep: f32) -> Self {
        let mid_theta = match side {
            Side::Near => 0.0,
            Side::Far => -std::f32::consts::PI,
        };
        Self {
            center,
            radius,
            thickness,
            mid_theta,
            sweep,
        }
    }

    #[inline]
    pub fn inner_radius(&self) -> f32 {
        self.radius - self.thickness / 2.0
    }

    #[inline]
    pub fn outer_radius(&self) -> f32 {
        self.radius + self.thickness / 2.0
    }

    #[inline]
    pub fn half_sweep(&self) -> f32 {
        self.sweep / 2.0
    }

    /// Signed angular offset of `theta` from the arc's mid-angle, in [-π, π)
    #[inline]
    fn offset_from_mid(&self, theta: f32) -> f32 {
        normalize_angle(theta - self.mid_theta)
    }

    /// Check if an angle is within the arc's angular extent
    pub fn contains_angle(&self, theta: f32) -> bool {
        self.offset_from_mid(theta).abs() <= self.half_sweep()
    }

    /// Clamp an angle onto the arc's angular extent
    pub fn clamp_angle(&self, theta: f32) -> f32 {
        let half = self.half_sweep();
        normalize_angle(self.mid_theta + self.offset_from_mid(theta).clamp(-half, half))
    }

    /// Paddle-local polar coordinates of a board point
    #[inline]
    pub fn to_local_polar(&self, point: Vec2) -> (f32, f32) {
        cartesian_to_polar(point - self.center)
    }

    /// Board point at the given local polar coordinates
    #[inline]
    pub fn point_at(&self, r: f32, theta: f32) -> Vec2 {
        self.center + polar_to_cartesian(r, theta)
    }

    /// Outward unit normal at an angle
    #[inline]
    pub fn normal_at(&self, theta: f32) -> Vec2 {
        Vec2::new(theta.cos(), theta.sin())
    }

    /// Sample points along the centerline (for rendering or debugging)
    pub fn sample_centerline(&self, num_points: usize) -> Vec<Vec2> {
        let start = self.mid_theta - self.half_sweep();
        (0..num_points)
            .map(|i| {
                let t = i as f32 / (num_points - 1).max(1) as f32;
                self.point_at(self.radius, start + t * self.sweep)
            })
            .collect()
    }
}
