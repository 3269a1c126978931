//! Paddle control: human input or AI policy → clamped pose + velocity

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{ArenaGeometry, Ball, Paddle};
use crate::tuning::Tuning;

/// Directional press flags (key-style control)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl KeyState {
    /// Unit-step direction (y grows downward)
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Who drives a paddle this tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PaddleControl {
    /// Hold position
    #[default]
    Idle,
    /// Pointer-style: paddle center goes straight to `target` (clamped)
    Pointer { target: Vec2 },
    /// Key-style: fixed step per held direction
    Keys(KeyState),
    /// Built-in tracker
    Ai,
}

impl Paddle {
    /// Apply one tick of control and derive velocity from the position delta
    pub fn apply_control(
        &mut self,
        control: &PaddleControl,
        ball: &Ball,
        geometry: &ArenaGeometry,
        tuning: &Tuning,
    ) {
        self.prev_pos = self.pos;

        let target = match *control {
            PaddleControl::Idle => self.pos,
            PaddleControl::Pointer { target } => target - self.size() / 2.0,
            PaddleControl::Keys(keys) => self.pos + keys.direction() * tuning.paddle_speed,
            PaddleControl::Ai => self.ai_target(ball, geometry, tuning),
        };

        self.pos = geometry.clamp_paddle(self.side, target);
        self.vel = self.pos - self.prev_pos;
    }

    /// Track the ball's y (and optionally its clamped x) at a capped speed
    fn ai_target(&self, ball: &Ball, geometry: &ArenaGeometry, tuning: &Tuning) -> Vec2 {
        let step = tuning.ai_speed;

        let want_y = ball.pos.y - self.height / 2.0;
        let y = self.pos.y + (want_y - self.pos.y).clamp(-step, step);

        let x = if tuning.ai_track_x {
            let (x0, x1) = geometry.x_range(self.side);
            let want_x = ball.pos.x.clamp(x0, x1.max(x0));
            self.pos.x + (want_x - self.pos.x).clamp(-step, step)
        } else {
            self.pos.x
        };

        Vec2::new(x, y)
    }
}
