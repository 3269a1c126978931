//! Read-only view of a finished tick, for renderers and tooling

use glam::Vec2;
use serde::Serialize;

use super::arc::PaddleArc;
use super::gravity::WellPhase;
use super::scoring::MatchStatus;
use super::state::{GameState, ObstacleKind, Side};

#[derive(Debug, Clone, Serialize)]
pub struct PaddleView {
    pub side: Side,
    /// Top-left
    pub pos: Vec2,
    pub size: Vec2,
    pub center: Vec2,
    pub arc: PaddleArc,
}

#[derive(Debug, Clone, Serialize)]
pub struct BallView {
    pub pos: Vec2,
    pub radius: f32,
    pub stuck: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WellStatus {
    Inactive,
    Active,
    Decaying,
}

#[derive(Debug, Clone, Serialize)]
pub struct WellView {
    pub status: WellStatus,
    pub angle: f32,
    /// Seconds of the active period left
    pub remaining: f32,
    pub preset: Option<&'static str>,
    pub magnitude: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObstacleView {
    pub pos: Vec2,
    pub size: f32,
    pub kind: ObstacleKind,
    /// Remaining life in [0, 1]
    pub life: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub width: f32,
    pub height: f32,
    pub paddles: [PaddleView; 2],
    pub ball: BallView,
    pub well: WellView,
    pub obstacles: Vec<ObstacleView>,
    pub score: [u32; 2],
    pub status: MatchStatus,
    pub clock: f32,
}

impl GameState {
    pub fn snapshot(&self) -> RenderSnapshot {
        let paddles = self.paddles.clone().map(|p| PaddleView {
            side: p.side,
            pos: p.pos,
            size: p.size(),
            center: p.center(),
            arc: p.arc(&self.tuning),
        });

        let status = match self.well.phase {
            WellPhase::Inactive => WellStatus::Inactive,
            WellPhase::Active { .. } => WellStatus::Active,
            WellPhase::Decaying { .. } => WellStatus::Decaying,
        };
        let engaged = self.well.is_engaged();

        RenderSnapshot {
            width: self.geometry.width,
            height: self.geometry.height,
            paddles,
            ball: BallView {
                pos: self.ball.pos,
                radius: self.ball.radius,
                stuck: self.ball.stuck,
            },
            well: WellView {
                status,
                angle: self.well.angle,
                remaining: self.well.remaining(self.clock),
                preset: self.well.preset().filter(|_| engaged).map(|p| p.name),
                magnitude: if engaged { self.well.magnitude } else { 0.0 },
            },
            obstacles: self
                .obstacles
                .cells
                .iter()
                .filter(|c| !c.is_expired(self.clock))
                .map(|c| ObstacleView {
                    pos: c.pos,
                    size: c.size,
                    kind: c.kind,
                    life: c.remaining_fraction(self.clock),
                })
                .collect(),
            score: self.matches.score,
            status: self.matches.status,
            clock: self.clock,
        }
    }
}
