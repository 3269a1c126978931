//! Game state and core simulation types
//!
//! Everything a tick reads or writes hangs off [`GameState`]; components only
//! touch the fields they own.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arc::PaddleArc;
use super::gravity::GravityWell;
use super::obstacles::ObstacleField;
use super::schedule::Schedule;
use super::scoring::MatchState;
use crate::consts::{DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH};
use crate::tuning::Tuning;

/// Which half of the board a paddle defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Left paddle, defends x = 0
    Near,
    /// Right paddle, defends x = board width
    Far,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Near, Side::Far];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Near => 0,
            Side::Far => 1,
        }
    }

    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Near => Side::Far,
            Side::Far => Side::Near,
        }
    }

    /// Sign of an x-velocity that travels away from this side's paddle
    #[inline]
    pub fn away_sign(self) -> f32 {
        match self {
            Side::Near => 1.0,
            Side::Far => -1.0,
        }
    }
}

/// Axis-aligned rectangle (top-left + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Touching edges count as overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        !(a_max.x < other.min.x
            || self.min.x > b_max.x
            || a_max.y < other.min.y
            || self.min.y > b_max.y)
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && b_max.x <= a_max.x
            && b_max.y <= a_max.y
    }
}

/// Board bounds and per-side paddle travel ranges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaGeometry {
    pub width: f32,
    pub height: f32,
    /// Allowed top-left x for the near paddle
    pub near_x: (f32, f32),
    /// Allowed top-left x for the far paddle
    pub far_x: (f32, f32),
    /// Allowed top-left y for both paddles
    pub y_range: (f32, f32),
}

impl ArenaGeometry {
    pub fn new(width: f32, height: f32, tuning: &Tuning) -> Self {
        let half = width / 2.0;
        let near_x = (0.0, (half - tuning.paddle_margin - tuning.paddle_width).max(0.0));
        let far_x = (
            (half + tuning.paddle_margin).min(width - tuning.paddle_width),
            (width - tuning.paddle_width).max(0.0),
        );
        Self {
            width,
            height,
            near_x,
            far_x,
            y_range: (0.0, (height - tuning.paddle_height).max(0.0)),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(Vec2::ZERO, Vec2::new(self.width, self.height))
    }

    pub fn x_range(&self, side: Side) -> (f32, f32) {
        match side {
            Side::Near => self.near_x,
            Side::Far => self.far_x,
        }
    }

    /// Clamp a paddle's top-left corner into its side's rectangle
    pub fn clamp_paddle(&self, side: Side, pos: Vec2) -> Vec2 {
        let (x0, x1) = self.x_range(side);
        Vec2::new(
            pos.x.clamp(x0, x1.max(x0)),
            pos.y.clamp(self.y_range.0, self.y_range.1),
        )
    }
}

/// A player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub side: Side,
    /// Top-left of the bounding box
    pub pos: Vec2,
    /// Position at the start of the current tick
    pub prev_pos: Vec2,
    /// Position delta over the last tick
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Paddle {
    /// Paddle at its starting spot, vertically centered, inset from its goal line
    pub fn new(side: Side, geometry: &ArenaGeometry, tuning: &Tuning) -> Self {
        let (x0, x1) = geometry.x_range(side);
        let x = match side {
            Side::Near => x0 + tuning.paddle_inset,
            Side::Far => x1 - tuning.paddle_inset,
        };
        let y = geometry.height / 2.0 - tuning.paddle_height / 2.0;
        let pos = geometry.clamp_paddle(side, Vec2::new(x, y));
        Self {
            side,
            pos,
            prev_pos: pos,
            vel: Vec2::ZERO,
            width: tuning.paddle_width,
            height: tuning.paddle_height,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size() / 2.0
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size())
    }

    /// The paddle's collision arc
    pub fn arc(&self, tuning: &Tuning) -> PaddleArc {
        PaddleArc::facing_center(
            self.side,
            self.center(),
            tuning.arc_radius,
            self.width,
            tuning.arc_sweep,
        )
    }
}

/// The ball; a fresh one is created on every serve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Serve counter, lets delayed events recognise a ball that has since been replaced
    pub serial: u32,
    pub pos: Vec2,
    /// Position at the start of the current tick (swept collision)
    pub prev_pos: Vec2,
    /// Velocity (board units per tick)
    pub vel: Vec2,
    pub radius: f32,
    /// Frozen by a sticky hazard
    pub stuck: bool,
    /// Seconds until the sticky hazard lets go
    pub stuck_remaining: f32,
}

impl Ball {
    pub fn new(serial: u32, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            serial,
            pos,
            prev_pos: pos,
            vel,
            radius,
            stuck: false,
            stuck_remaining: 0.0,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Hazard / power-up cell types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Speeds the ball up
    Accelerant,
    /// Bounces the ball back horizontally
    Reflector,
    /// Sends the ball off in a random direction
    Randomizer,
    /// Holds the ball for a moment, then flings it
    StickyHazard,
    /// Starts the gravity well
    GravityTrigger,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 5] = [
        ObstacleKind::Accelerant,
        ObstacleKind::Reflector,
        ObstacleKind::Randomizer,
        ObstacleKind::StickyHazard,
        ObstacleKind::GravityTrigger,
    ];
}

/// A hazard cell, fixed in the unrotated board frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    pub kind: ObstacleKind,
    /// Clock time of spawn (seconds)
    pub spawned_at: f32,
    /// Lifetime (seconds)
    pub life: f32,
}

impl Obstacle {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(self.size))
    }

    #[inline]
    pub fn expires_at(&self) -> f32 {
        self.spawned_at + self.life
    }

    #[inline]
    pub fn is_expired(&self, now: f32) -> bool {
        self.expires_at() <= now
    }

    /// Remaining life in [0, 1]
    pub fn remaining_fraction(&self, now: f32) -> f32 {
        if self.life <= 0.0 {
            return 0.0;
        }
        ((self.expires_at() - now) / self.life).clamp(0.0, 1.0)
    }

    /// Zero the remaining life so the cell despawns on the next sweep
    pub fn consume(&mut self, now: f32) {
        self.life = (now - self.spawned_at).max(0.0);
    }
}

/// Notifications produced by a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    /// `side` won the point
    PointScored { side: Side },
    MatchFinished { winner: Side },
    PaddleHit { side: Side },
    ObstacleTriggered { kind: ObstacleKind },
    WellActivated { preset: &'static str, spin: f32 },
    WellDecayStarted,
    WellDeactivated,
    BallReleased,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub geometry: ArenaGeometry,
    /// Simulation clock (seconds)
    pub clock: f32,
    /// Accepted tick counter
    pub time_ticks: u64,
    /// Indexed by [`Side::index`]
    pub paddles: [Paddle; 2],
    pub ball: Ball,
    pub obstacles: ObstacleField,
    pub well: GravityWell,
    pub matches: MatchState,
    pub schedule: Schedule,
    /// Events from the most recent accepted tick
    pub events: Vec<GameEvent>,
    pub rng: Pcg32,
    next_ball_serial: u32,
}

impl GameState {
    /// Default board and balance, seeded RNG
    pub fn new(seed: u64) -> Self {
        Self::with_rng(
            Tuning::default(),
            DEFAULT_BOARD_WIDTH,
            DEFAULT_BOARD_HEIGHT,
            Pcg32::seed_from_u64(seed),
        )
    }

    /// Full control over balance, board size and random source
    pub fn with_rng(tuning: Tuning, width: f32, height: f32, rng: Pcg32) -> Self {
        let geometry = ArenaGeometry::new(width, height, &tuning);
        let paddles = [
            Paddle::new(Side::Near, &geometry, &tuning),
            Paddle::new(Side::Far, &geometry, &tuning),
        ];
        let ball = Ball::new(0, geometry.center(), Vec2::ZERO, tuning.ball_radius);
        let matches = MatchState::new(tuning.win_score);

        let mut state = Self {
            tuning,
            geometry,
            clock: 0.0,
            time_ticks: 0,
            paddles,
            ball,
            obstacles: ObstacleField::default(),
            well: GravityWell::default(),
            matches,
            schedule: Schedule::default(),
            events: Vec::new(),
            rng,
            next_ball_serial: 1,
        };
        state.serve();
        log::info!(
            "Match started on {}x{} board, first to {}",
            width,
            height,
            state.tuning.win_score
        );
        state
    }

    #[inline]
    pub fn paddle(&self, side: Side) -> &Paddle {
        &self.paddles[side.index()]
    }

    /// Re-create the ball at board center with a fresh serve velocity
    pub fn serve(&mut self) {
        let serial = self.next_ball_serial;
        self.next_ball_serial += 1;

        let toward = self.matches.next_serve(self.tuning.serve_policy, &mut self.rng);
        let vel = super::scoring::serve_velocity(toward, &self.tuning, &mut self.rng);
        self.ball = Ball::new(serial, self.geometry.center(), vel, self.tuning.ball_radius);
        self.matches.in_contact = [false; 2];
        self.schedule
            .cancel(|e| matches!(e, super::schedule::ScheduledEvent::ReleaseBall { .. }));
    }

    /// Zero scores and start over on the same board
    pub fn restart(&mut self) {
        self.matches = MatchState::new(self.tuning.win_score);
        self.obstacles = ObstacleField::default();
        self.well = GravityWell::default();
        self.schedule = Schedule::default();
        self.events.clear();
        self.paddles = [
            Paddle::new(Side::Near, &self.geometry, &self.tuning),
            Paddle::new(Side::Far, &self.geometry, &self.tuning),
        ];
        self.serve();
        log::info!("Match restarted");
    }

    /// Board size changed: recompute ranges and pull everything back inside
    pub fn resize(&mut self, width: f32, height: f32) {
        self.geometry = ArenaGeometry::new(width, height, &self.tuning);
        for paddle in &mut self.paddles {
            paddle.pos = self.geometry.clamp_paddle(paddle.side, paddle.pos);
            paddle.prev_pos = paddle.pos;
            paddle.vel = Vec2::ZERO;
        }

        let r = self.ball.radius;
        self.ball.pos = Vec2::new(
            self.ball.pos.x.clamp(r, (width - r).max(r)),
            self.ball.pos.y.clamp(r, (height - r).max(r)),
        );
        self.ball.prev_pos = self.ball.pos;

        let bounds = self.geometry.bounds();
        self.obstacles.retain_inside(&bounds);
        log::debug!("Board resized to {}x{}", width, height);
    }
}
