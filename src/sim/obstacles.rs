//! Hazard / power-up cells
//!
//! The field keeps up to `max_blocks` non-overlapping cells alive, respawning
//! them at random spots away from the paddles and the center line. A cell fires
//! its effect once, on the first tick the ball overlaps it, then despawns.

use glam::Vec2;
use rand::Rng;

use super::collision::circle_overlaps_rect;
use super::gravity::GravityWell;
use super::schedule::{Schedule, ScheduledEvent};
use super::state::{ArenaGeometry, Ball, GameEvent, Obstacle, ObstacleKind, Rect};
use crate::tuning::Tuning;

/// Live cells, in spawn order
#[derive(Debug, Clone, Default)]
pub struct ObstacleField {
    pub cells: Vec<Obstacle>,
    next_id: u32,
}

impl ObstacleField {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Drop expired cells, then top the field back up to the cap.
    /// Returns how many cells were spawned.
    pub fn tick<R: Rng>(
        &mut self,
        now: f32,
        geometry: &ArenaGeometry,
        keep_out: &[Rect],
        tuning: &Tuning,
        rng: &mut R,
    ) -> usize {
        self.cells.retain(|c| !c.is_expired(now));

        let mut spawned = 0;
        while self.cells.len() < tuning.max_blocks {
            let Some(pos) = self.find_spot(geometry, keep_out, tuning, rng) else {
                log::trace!(
                    "No free spot after {} attempts, retrying next tick",
                    tuning.placement_attempts
                );
                break;
            };

            let kind = ObstacleKind::ALL[rng.random_range(0..ObstacleKind::ALL.len())];
            let life = rng.random_range(tuning.block_life_min..=tuning.block_life_max);
            let id = self.next_id;
            self.next_id += 1;
            self.cells.push(Obstacle {
                id,
                pos,
                size: tuning.block_size,
                kind,
                spawned_at: now,
                life,
            });
            spawned += 1;
        }
        spawned
    }

    /// Random placement with a bounded number of attempts
    fn find_spot<R: Rng>(
        &self,
        geometry: &ArenaGeometry,
        keep_out: &[Rect],
        tuning: &Tuning,
        rng: &mut R,
    ) -> Option<Vec2> {
        let size = tuning.block_size;
        let margin = tuning.block_edge_margin;
        let span = Vec2::new(
            geometry.width - 2.0 * margin - size,
            geometry.height - 2.0 * margin - size,
        );
        if span.x < 0.0 || span.y < 0.0 {
            return None;
        }

        let mid = geometry.width / 2.0;
        let band = (mid - tuning.block_center_band, mid + tuning.block_center_band);

        (0..tuning.placement_attempts).find_map(|_| {
            let pos = Vec2::new(
                margin + rng.random::<f32>() * span.x,
                margin + rng.random::<f32>() * span.y,
            );
            let cell = Rect::new(pos, Vec2::splat(size));

            let in_band = cell.max().x >= band.0 && cell.min.x <= band.1;
            let blocked = in_band
                || keep_out.iter().any(|r| r.overlaps(&cell))
                || self.cells.iter().any(|c| c.rect().overlaps(&cell));
            (!blocked).then_some(pos)
        })
    }

    /// First live cell (in spawn order) the ball overlaps. `ball_pos` must
    /// already be in the unrotated board frame.
    pub fn first_overlap(&self, ball_pos: Vec2, ball_radius: f32, now: f32) -> Option<usize> {
        self.cells
            .iter()
            .position(|c| !c.is_expired(now) && circle_overlaps_rect(ball_pos, ball_radius, &c.rect()))
    }

    /// Mark a cell as used up and return its kind
    pub fn consume(&mut self, index: usize, now: f32) -> ObstacleKind {
        let cell = &mut self.cells[index];
        cell.consume(now);
        cell.kind
    }

    /// Drop cells that no longer fit inside `bounds`
    pub fn retain_inside(&mut self, bounds: &Rect) {
        self.cells.retain(|c| bounds.contains_rect(&c.rect()));
    }
}

/// Everything an effect may touch
pub struct EffectContext<'a, R: Rng> {
    pub ball: &'a mut Ball,
    pub well: &'a mut GravityWell,
    pub schedule: &'a mut Schedule,
    pub events: &'a mut Vec<GameEvent>,
    pub tuning: &'a Tuning,
    pub rng: &'a mut R,
    pub now: f32,
}

impl ObstacleKind {
    /// Run this cell type's effect
    pub fn apply<R: Rng>(self, ctx: &mut EffectContext<'_, R>) {
        log::debug!("Ball hit {:?} cell", self);
        ctx.events.push(GameEvent::ObstacleTriggered { kind: self });
        match self {
            ObstacleKind::Accelerant => accelerate(ctx),
            ObstacleKind::Reflector => reflect(ctx),
            ObstacleKind::Randomizer => randomize(ctx),
            ObstacleKind::StickyHazard => stick(ctx),
            ObstacleKind::GravityTrigger => trigger_well(ctx),
        }
    }
}

fn accelerate<R: Rng>(ctx: &mut EffectContext<'_, R>) {
    ctx.ball.vel *= ctx.tuning.accelerant_factor;
}

fn reflect<R: Rng>(ctx: &mut EffectContext<'_, R>) {
    ctx.ball.vel.x = -ctx.ball.vel.x;
}

fn randomize<R: Rng>(ctx: &mut EffectContext<'_, R>) {
    ctx.ball.vel = random_velocity(
        ctx.rng,
        ctx.tuning.randomizer_speed_min,
        ctx.tuning.randomizer_speed_max,
    );
}

fn stick<R: Rng>(ctx: &mut EffectContext<'_, R>) {
    let hold = ctx
        .rng
        .random_range(ctx.tuning.sticky_duration_min..=ctx.tuning.sticky_duration_max);
    ctx.ball.stuck = true;
    ctx.ball.stuck_remaining = hold;
    ctx.schedule.push(
        ctx.now + hold,
        ScheduledEvent::ReleaseBall {
            serial: ctx.ball.serial,
        },
    );
}

fn trigger_well<R: Rng>(ctx: &mut EffectContext<'_, R>) {
    if ctx.well.activate(ctx.now, ctx.tuning, ctx.rng, ctx.schedule) {
        if let Some(preset) = ctx.well.preset() {
            ctx.events.push(GameEvent::WellActivated {
                preset: preset.name,
                spin: ctx.well.spin_dir,
            });
        }
    }
}

/// Free a stuck ball with a random heading in the sticky release band.
/// Returns false if the ball was not stuck.
pub fn release_ball<R: Rng>(ball: &mut Ball, tuning: &Tuning, rng: &mut R) -> bool {
    if !ball.stuck {
        return false;
    }
    ball.vel = random_velocity(
        rng,
        tuning.sticky_release_speed_min,
        tuning.sticky_release_speed_max,
    );
    ball.stuck = false;
    ball.stuck_remaining = 0.0;
    true
}

/// Uniform heading, speed uniform in `[min, max]`
pub fn random_velocity<R: Rng>(rng: &mut R, min: f32, max: f32) -> Vec2 {
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    let speed = rng.random_range(min..=max);
    Vec2::from_angle(angle) * speed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Paddle, Side};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (ArenaGeometry, Tuning, [Rect; 2], Pcg32) {
        let tuning = Tuning::default();
        let geometry = ArenaGeometry::new(1280.0, 720.0, &tuning);
        let paddles = [
            Paddle::new(Side::Near, &geometry, &tuning).rect(),
            Paddle::new(Side::Far, &geometry, &tuning).rect(),
        ];
        (geometry, tuning, paddles, Pcg32::seed_from_u64(42))
    }

    fn cell(kind: ObstacleKind, x: f32, y: f32) -> Obstacle {
        Obstacle {
            id: 0,
            pos: Vec2::new(x, y),
            size: 38.0,
            kind,
            spawned_at: 0.0,
            life: 3.0,
        }
    }

    #[test]
    fn test_fills_to_cap_without_overlap() {
        let (geo, tuning, paddles, mut rng) = setup();
        let mut field = ObstacleField::default();
        let spawned = field.tick(0.0, &geo, &paddles, &tuning, &mut rng);
        assert_eq!(spawned, tuning.max_blocks);
        assert_eq!(field.len(), tuning.max_blocks);

        for (i, a) in field.cells.iter().enumerate() {
            assert!(a.life >= tuning.block_life_min && a.life <= tuning.block_life_max);
            for p in &paddles {
                assert!(!a.rect().overlaps(p));
            }
            let mid = geo.width / 2.0;
            assert!(a.rect().max().x < mid - tuning.block_center_band || a.pos.x > mid + tuning.block_center_band);
            for b in field.cells.iter().skip(i + 1) {
                assert!(!a.rect().overlaps(&b.rect()));
            }
        }
    }

    #[test]
    fn test_expired_cells_are_replaced() {
        let (geo, tuning, paddles, mut rng) = setup();
        let mut field = ObstacleField::default();
        field.tick(0.0, &geo, &paddles, &tuning, &mut rng);
        let first_ids: Vec<u32> = field.cells.iter().map(|c| c.id).collect();

        // Every cell lives at most block_life_max
        field.tick(tuning.block_life_max, &geo, &paddles, &tuning, &mut rng);
        assert_eq!(field.len(), tuning.max_blocks);
        assert!(field.cells.iter().all(|c| !first_ids.contains(&c.id)));
    }

    #[test]
    fn test_no_room_is_not_an_error() {
        let (_, tuning, _, mut rng) = setup();
        let tiny = ArenaGeometry::new(200.0, 200.0, &tuning);
        let mut field = ObstacleField::default();
        assert_eq!(field.tick(0.0, &tiny, &[], &tuning, &mut rng), 0);
        assert!(field.is_empty());
    }

    #[test]
    fn test_first_overlap_in_spawn_order_and_consume() {
        let mut field = ObstacleField::default();
        field.cells.push(cell(ObstacleKind::Reflector, 300.0, 300.0));
        field.cells.push(cell(ObstacleKind::Accelerant, 320.0, 300.0));

        let hit = field.first_overlap(Vec2::new(330.0, 320.0), 12.0, 1.0);
        assert_eq!(hit, Some(0));
        assert_eq!(field.consume(0, 1.0), ObstacleKind::Reflector);

        // Consumed cell no longer matches
        assert_eq!(field.first_overlap(Vec2::new(330.0, 320.0), 12.0, 1.0), Some(1));
        assert_eq!(field.first_overlap(Vec2::new(600.0, 600.0), 12.0, 1.0), None);
    }

    fn apply(kind: ObstacleKind, ball: &mut Ball, well: &mut GravityWell, schedule: &mut Schedule, seed: u64) -> Vec<GameEvent> {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut events = Vec::new();
        let mut ctx = EffectContext {
            ball,
            well,
            schedule,
            events: &mut events,
            tuning: &tuning,
            rng: &mut rng,
            now: 10.0,
        };
        kind.apply(&mut ctx);
        events
    }

    #[test]
    fn test_accelerant_and_reflector() {
        let mut well = GravityWell::default();
        let mut schedule = Schedule::default();
        let mut ball = Ball::new(1, Vec2::ZERO, Vec2::new(6.0, -4.0), 12.0);

        apply(ObstacleKind::Accelerant, &mut ball, &mut well, &mut schedule, 1);
        assert!((ball.vel - Vec2::new(6.42, -4.28)).length() < 1e-4);

        apply(ObstacleKind::Reflector, &mut ball, &mut well, &mut schedule, 1);
        assert!((ball.vel - Vec2::new(-6.42, -4.28)).length() < 1e-4);
    }

    #[test]
    fn test_randomizer_speed_band() {
        let tuning = Tuning::default();
        for seed in 0..50 {
            let mut well = GravityWell::default();
            let mut schedule = Schedule::default();
            let mut ball = Ball::new(1, Vec2::ZERO, Vec2::new(6.0, 0.0), 12.0);
            let events = apply(ObstacleKind::Randomizer, &mut ball, &mut well, &mut schedule, seed);
            let speed = ball.speed();
            assert!(speed >= tuning.randomizer_speed_min - 1e-4 && speed <= tuning.randomizer_speed_max + 1e-4);
            assert_eq!(events, vec![GameEvent::ObstacleTriggered { kind: ObstacleKind::Randomizer }]);
        }
    }

    #[test]
    fn test_sticky_freezes_and_schedules_release() {
        let tuning = Tuning::default();
        let mut well = GravityWell::default();
        let mut schedule = Schedule::default();
        let mut ball = Ball::new(7, Vec2::ZERO, Vec2::new(6.0, 2.0), 12.0);

        apply(ObstacleKind::StickyHazard, &mut ball, &mut well, &mut schedule, 3);
        assert!(ball.stuck);
        assert_eq!(ball.vel, Vec2::new(6.0, 2.0));
        assert!(ball.stuck_remaining >= tuning.sticky_duration_min && ball.stuck_remaining <= tuning.sticky_duration_max);

        let due = schedule.next_due(|e| *e == ScheduledEvent::ReleaseBall { serial: 7 });
        assert!((due.unwrap() - (10.0 + ball.stuck_remaining)).abs() < 1e-4);
    }

    #[test]
    fn test_release_ball_band() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut ball = Ball::new(1, Vec2::ZERO, Vec2::new(6.0, 2.0), 12.0);
        assert!(!release_ball(&mut ball, &tuning, &mut rng));

        ball.stuck = true;
        assert!(release_ball(&mut ball, &tuning, &mut rng));
        assert!(!ball.stuck);
        let speed = ball.speed();
        assert!(speed >= tuning.sticky_release_speed_min - 1e-4 && speed <= tuning.sticky_release_speed_max + 1e-4);
    }

    #[test]
    fn test_gravity_trigger_activates_once() {
        let mut well = GravityWell::default();
        let mut schedule = Schedule::default();
        let mut ball = Ball::new(1, Vec2::ZERO, Vec2::new(6.0, 2.0), 12.0);

        let events = apply(ObstacleKind::GravityTrigger, &mut ball, &mut well, &mut schedule, 9);
        assert!(well.is_active());
        assert_eq!(ball.vel, Vec2::new(6.0, 2.0));
        assert!(events.iter().any(|e| matches!(e, GameEvent::WellActivated { .. })));
        let params = (well.preset, well.magnitude, well.spin_dir);

        let events = apply(ObstacleKind::GravityTrigger, &mut ball, &mut well, &mut schedule, 10);
        assert_eq!(params, (well.preset, well.magnitude, well.spin_dir));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::WellActivated { .. })));
    }
}
