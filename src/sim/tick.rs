//! Fixed-order simulation step
//!
//! One call advances every component once: scheduled events, paddles, well
//! rotation, ball integration, collisions, scoring, then the obstacle field.
//! The order is load-bearing; scoring must see the post-collision ball.

use super::collision::{dynamic_bounce, sweep_paddle_contact};
use super::kinematics::{integrate, resolve_walls};
use super::obstacles::{release_ball, EffectContext};
use super::paddle::PaddleControl;
use super::schedule::ScheduledEvent;
use super::scoring::{goal_crossing, PointOutcome};
use super::state::{GameEvent, GameState, Side};

/// Per-side control for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub near: PaddleControl,
    pub far: PaddleControl,
}

impl TickInput {
    /// Both sides driven by the built-in AI
    pub fn ai_vs_ai() -> Self {
        Self {
            near: PaddleControl::Ai,
            far: PaddleControl::Ai,
        }
    }

    pub fn control(&self, side: Side) -> &PaddleControl {
        match side {
            Side::Near => &self.near,
            Side::Far => &self.far,
        }
    }
}

/// Advance the game state by `dt` seconds. Ignored once the match is finished.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.matches.is_finished() {
        return;
    }
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

    state.events.clear();
    state.time_ticks += 1;
    state.clock += dt;
    let now = state.clock;

    run_scheduled(state, now);

    for side in Side::BOTH {
        state.paddles[side.index()].apply_control(
            input.control(side),
            &state.ball,
            &state.geometry,
            &state.tuning,
        );
    }

    state.well.advance(dt);
    if state.ball.stuck {
        state.ball.stuck_remaining = (state.ball.stuck_remaining - dt).max(0.0);
    }

    integrate(&mut state.ball, state.well.acceleration(dt));
    resolve_walls(&mut state.ball, state.geometry.height);
    state.matches.begin_rally();

    if !state.ball.stuck {
        resolve_paddles(state);
        resolve_obstacles(state, now);
    }

    let pivot = state.geometry.center();
    state
        .well
        .apply_center_boost(&mut state.ball, pivot, &state.tuning);
    resolve_walls(&mut state.ball, state.geometry.height);

    if let Some(scorer) = goal_crossing(&state.ball, state.geometry.width) {
        score_point(state, scorer);
        if state.matches.is_finished() {
            return;
        }
    }

    let keep_out = state.paddles.each_ref().map(|p| p.rect());
    state.obstacles.tick(
        now,
        &state.geometry,
        &keep_out,
        &state.tuning,
        &mut state.rng,
    );
}

/// Fire everything the schedule has due at `now`
fn run_scheduled(state: &mut GameState, now: f32) {
    for event in state.schedule.drain_due(now) {
        match event {
            ScheduledEvent::ReleaseBall { serial } => {
                // Stale if the ball was re-served since it got stuck
                if serial == state.ball.serial
                    && release_ball(&mut state.ball, &state.tuning, &mut state.rng)
                {
                    log::debug!("Ball {} released at speed {:.2}", serial, state.ball.speed());
                    state.events.push(GameEvent::BallReleased);
                }
            }
            ScheduledEvent::BeginWellDecay => {
                if state.well.begin_decay(now, &state.tuning, &mut state.schedule) {
                    state.events.push(GameEvent::WellDecayStarted);
                }
            }
            ScheduledEvent::WellDecayStep => {
                if state.well.decay_step(now, &state.tuning, &mut state.schedule) {
                    state.events.push(GameEvent::WellDeactivated);
                }
            }
        }
    }
}

/// Swept arc test for both paddles, with the per-side contact marker
/// suppressing repeat bounces while the ball grazes the annulus
fn resolve_paddles(state: &mut GameState) {
    let step = state.ball.radius * state.tuning.sweep_step_factor;

    for side in Side::BOTH {
        let paddle = &state.paddles[side.index()];
        let arc = paddle.arc(&state.tuning);
        let paddle_vel = paddle.vel;

        let ball = &mut state.ball;
        let contact = sweep_paddle_contact(&arc, ball.prev_pos, ball.pos, ball.radius, step);
        let marker = &mut state.matches.in_contact[side.index()];

        let Some(contact) = contact else {
            *marker = false;
            continue;
        };

        let approaching = ball.vel.x * side.away_sign() < 0.0;
        if approaching && !*marker {
            ball.pos = contact.point;
            dynamic_bounce(
                ball,
                &arc,
                side,
                paddle_vel,
                &contact,
                &state.tuning,
                &mut state.rng,
            );
            *marker = true;
            state.events.push(GameEvent::PaddleHit { side });
        }
    }
}

/// At most one cell fires per tick: the first overlapping one
fn resolve_obstacles(state: &mut GameState, now: f32) {
    let local = state.well.unrotate(state.ball.pos, state.geometry.center());
    let Some(index) = state.obstacles.first_overlap(local, state.ball.radius, now) else {
        return;
    };

    let kind = state.obstacles.consume(index, now);
    let mut ctx = EffectContext {
        ball: &mut state.ball,
        well: &mut state.well,
        schedule: &mut state.schedule,
        events: &mut state.events,
        tuning: &state.tuning,
        rng: &mut state.rng,
        now,
    };
    kind.apply(&mut ctx);
}

fn score_point(state: &mut GameState, scorer: Side) {
    state.events.push(GameEvent::PointScored { side: scorer });
    if state.well.force_reset(&mut state.schedule) {
        state.events.push(GameEvent::WellDeactivated);
    }

    let outcome = state.matches.award_point(scorer);
    let [near, far] = state.matches.score;
    match outcome {
        PointOutcome::Continue => {
            log::info!("Point to {:?} ({}-{})", scorer, near, far);
            state.serve();
        }
        PointOutcome::MatchWon => {
            log::info!("{:?} wins {}-{}", scorer, near, far);
            state.schedule.clear();
            state.events.push(GameEvent::MatchFinished { winner: scorer });
        }
        PointOutcome::Ignored => {}
    }
}
