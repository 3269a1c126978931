//! Match state machine: Serving → Rallying → point → Serving | Finished

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::state::{Ball, Side};
use crate::tuning::{ServePolicy, Tuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchStatus {
    /// Fresh ball at center, first tick not yet run
    Serving,
    Rallying,
    /// No further ticks are accepted
    Finished { winner: Side },
}

/// Result of awarding a point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointOutcome {
    /// Play continues with a new serve
    Continue,
    /// The scorer reached the win threshold
    MatchWon,
    /// Match already over, nothing changed
    Ignored,
}

#[derive(Debug, Clone)]
pub struct MatchState {
    /// Points per side, indexed by [`Side::index`]
    pub score: [u32; 2],
    pub win_score: u32,
    pub status: MatchStatus,
    /// Ball still inside this side's contact annulus since its last bounce
    pub in_contact: [bool; 2],
    last_serve: Option<Side>,
}

impl MatchState {
    pub fn new(win_score: u32) -> Self {
        Self {
            score: [0; 2],
            win_score,
            status: MatchStatus::Serving,
            in_contact: [false; 2],
            last_serve: None,
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self.status, MatchStatus::Finished { .. })
    }

    pub fn winner(&self) -> Option<Side> {
        match self.status {
            MatchStatus::Finished { winner } => Some(winner),
            _ => None,
        }
    }

    /// Pick the side the next serve travels toward
    pub fn next_serve<R: Rng>(&mut self, policy: ServePolicy, rng: &mut R) -> Side {
        let toward = match (policy, self.last_serve) {
            (ServePolicy::Alternate, Some(last)) => last.opponent(),
            _ => {
                if rng.random_bool(0.5) {
                    Side::Far
                } else {
                    Side::Near
                }
            }
        };
        self.last_serve = Some(toward);
        self.status = MatchStatus::Serving;
        toward
    }

    /// First tick after a serve
    pub fn begin_rally(&mut self) {
        if self.status == MatchStatus::Serving {
            self.status = MatchStatus::Rallying;
        }
    }

    pub fn award_point(&mut self, scorer: Side) -> PointOutcome {
        if self.is_finished() {
            return PointOutcome::Ignored;
        }
        let score = &mut self.score[scorer.index()];
        *score += 1;
        if *score >= self.win_score {
            self.status = MatchStatus::Finished { winner: scorer };
            PointOutcome::MatchWon
        } else {
            PointOutcome::Continue
        }
    }
}

/// Serve velocity toward `toward`: fixed x speed, vy random in sign and magnitude
pub fn serve_velocity<R: Rng>(toward: Side, tuning: &Tuning, rng: &mut R) -> Vec2 {
    // Traveling toward a side means moving away from the opponent's goal
    let vx = toward.opponent().away_sign() * tuning.serve_speed_x;
    let vy_sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let vy = rng.random_range(tuning.serve_vy_min..=tuning.serve_vy_max);
    Vec2::new(vx, vy_sign * vy)
}

/// Which side scores if the ball's leading edge is past a goal line
pub fn goal_crossing(ball: &Ball, width: f32) -> Option<Side> {
    if ball.pos.x - ball.radius < 0.0 {
        Some(Side::Far)
    } else if ball.pos.x + ball.radius > width {
        Some(Side::Near)
    } else {
        None
    }
}
