//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep, delayed effects on the sim clock
//! - Seeded RNG only
//! - Stable iteration order (paddles by side, cells by spawn order)
//! - No rendering or platform dependencies

pub mod arc;
pub mod collision;
pub mod gravity;
pub mod kinematics;
pub mod obstacles;
pub mod paddle;
pub mod schedule;
pub mod scoring;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use arc::PaddleArc;
pub use collision::{circle_overlaps_rect, dynamic_bounce, sweep_paddle_contact, PaddleContact};
pub use gravity::{GravityWell, WellPhase};
pub use obstacles::{EffectContext, ObstacleField};
pub use paddle::{KeyState, PaddleControl};
pub use schedule::{Schedule, ScheduledEvent};
pub use scoring::{MatchState, MatchStatus, PointOutcome};
pub use snapshot::{RenderSnapshot, WellStatus};
pub use state::{
    ArenaGeometry, Ball, GameEvent, GameState, Obstacle, ObstacleKind, Paddle, Rect, Side,
};
pub use tick::{TickInput, tick};
