//! Ball integration and top/bottom wall bounces
//!
//! The side edges are goal lines and are left to scoring.

use glam::Vec2;

use super::state::Ball;

/// Advance the ball by one tick. A stuck ball stays put and ignores gravity.
pub fn integrate(ball: &mut Ball, gravity: Vec2) {
    ball.prev_pos = ball.pos;
    if ball.stuck {
        return;
    }
    ball.vel += gravity;
    ball.pos += ball.vel;
}

/// Reflect off the top/bottom edges, keeping the ball inside
/// `[radius, height - radius]`. Returns whether a wall was hit.
pub fn resolve_walls(ball: &mut Ball, height: f32) -> bool {
    let r = ball.radius;
    if ball.pos.y - r < 0.0 {
        ball.pos.y = r;
        ball.vel.y = ball.vel.y.abs();
        true
    } else if ball.pos.y + r > height {
        ball.pos.y = (height - r).max(r);
        ball.vel.y = -ball.vel.y.abs();
        true
    } else {
        false
    }
}
