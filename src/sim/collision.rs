//! Collision detection and response
//!
//! The tricky part: a fast ball against a thin curved paddle. Contact is tested
//! in paddle-local polar coordinates, sampled along the ball's path so it
//! cannot tunnel through the arc in a single tick.

use glam::Vec2;
use rand::Rng;

use super::arc::PaddleArc;
use super::state::{Ball, Rect, Side};
use crate::consts::{ARC_CLEARANCE, MAX_SWEEP_SAMPLES};
use crate::tuning::Tuning;

/// Smallest share of the rebound speed kept on the x axis
const MIN_AWAY_FRACTION: f32 = 0.2;

/// Where the ball met a paddle arc
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleContact {
    /// Sampled ball center at first contact
    pub point: Vec2,
    /// Paddle-local angle of the contact
    pub theta: f32,
}

/// Hit test at a single ball position.
///
/// Contact exists when the ball center sits in the annulus
/// `[R - ball_r - t/2, R + ball_r + t/2]` and inside the arc's sweep.
pub fn paddle_contact_at(arc: &PaddleArc, ball_pos: Vec2, ball_radius: f32) -> Option<PaddleContact> {
    let (dist, theta) = arc.to_local_polar(ball_pos);
    let inner = arc.inner_radius() - ball_radius;
    let outer = arc.outer_radius() + ball_radius;

    if dist >= inner && dist <= outer && arc.contains_angle(theta) {
        Some(PaddleContact {
            point: ball_pos,
            theta,
        })
    } else {
        None
    }
}

/// Swept hit test from `from` to `to`, stepping at most `step` per sample.
/// Returns the first sampled contact.
pub fn sweep_paddle_contact(
    arc: &PaddleArc,
    from: Vec2,
    to: Vec2,
    ball_radius: f32,
    step: f32,
) -> Option<PaddleContact> {
    let travel = to - from;
    let samples = if step > 0.0 {
        ((travel.length() / step).ceil() as usize).clamp(1, MAX_SWEEP_SAMPLES)
    } else {
        1
    };

    (1..=samples)
        .map(|i| from + travel * (i as f32 / samples as f32))
        .find_map(|p| paddle_contact_at(arc, p, ball_radius))
}

/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Rescale to `[min, max]` keeping direction; a zero vector takes `fallback`'s direction
pub fn clamp_speed(velocity: Vec2, min: f32, max: f32, fallback: Vec2) -> Vec2 {
    let speed = velocity.length();
    if speed <= f32::EPSILON {
        return fallback.normalize_or_zero() * min;
    }
    velocity * (speed.clamp(min, max) / speed)
}

/// Rebound off a moving arc paddle.
///
/// Reflects about the (clamped) contact normal, adds energy when the paddle
/// drives into the ball, carries part of the paddle's motion, jitters vy,
/// clamps speed, forces the ball away from the paddle's side and pushes it
/// clear of the arc.
pub fn dynamic_bounce<R: Rng>(
    ball: &mut Ball,
    arc: &PaddleArc,
    side: Side,
    paddle_vel: Vec2,
    contact: &PaddleContact,
    tuning: &Tuning,
    rng: &mut R,
) {
    let theta = arc.clamp_angle(contact.theta);
    let normal = arc.normal_at(theta);

    let impact = paddle_vel.dot(normal);
    let restitution = tuning.bounce_restitution + (impact * tuning.bounce_impact_gain).max(0.0);
    let mut vel = reflect_velocity(ball.vel, normal) * restitution
        + paddle_vel * tuning.bounce_paddle_carry;
    vel.y += (rng.random::<f32>() - 0.5) * tuning.bounce_jitter;

    vel = clamp_speed(
        vel,
        tuning.bounce_min_speed,
        tuning.bounce_max_speed,
        normal,
    );
    ball.vel = force_away(vel, side);
    ball.pos = arc.point_at(arc.outer_radius() + ball.radius + ARC_CLEARANCE, theta);
}

/// Flip vx so it leaves `side`; a purely vertical rebound gets tilted just
/// enough to leave, at the same speed.
fn force_away(mut vel: Vec2, side: Side) -> Vec2 {
    let away = side.away_sign();
    if vel.x * away < 0.0 {
        vel.x = -vel.x;
    }

    let speed = vel.length();
    let min_x = speed * MIN_AWAY_FRACTION;
    if vel.x * away < min_x {
        let y_sign = if vel.y < 0.0 { -1.0 } else { 1.0 };
        vel = Vec2::new(away * min_x, y_sign * (speed * speed - min_x * min_x).sqrt());
    }
    vel
}

/// Circle vs axis-aligned box (closest-point test)
pub fn circle_overlaps_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = center.clamp(rect.min, rect.max());
    center.distance_squared(closest) < radius * radius
}
