//! Rotating gravity well
//!
//! Inactive → Active (gravity cell hit) → Decaying (duration elapsed) → Inactive.
//! While engaged the arena rotates about the board center and the ball feels a
//! pull that rotates with it. A scored point drops the well straight back to
//! Inactive.

use glam::Vec2;
use rand::Rng;

use super::schedule::{Schedule, ScheduledEvent};
use super::state::Ball;
use crate::rotate_about;
use crate::tuning::{CenterBoost, GravityPreset, Tuning, GRAVITY_PRESETS};

use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WellPhase {
    Inactive,
    Active {
        /// Clock time of activation
        started_at: f32,
    },
    Decaying {
        steps_left: u32,
        /// Angle removed per step
        step_angle: f32,
    },
}

#[derive(Debug, Clone)]
pub struct GravityWell {
    pub phase: WellPhase,
    /// Index into [`GRAVITY_PRESETS`]
    pub preset: Option<usize>,
    pub magnitude: f32,
    /// ±1
    pub spin_dir: f32,
    pub spin_speed: f32,
    /// Arena rotation (radians, kept within ±2π)
    pub angle: f32,
    pub duration: f32,
    /// Ball was inside the center band last tick (once-per-crossing boost)
    center_latched: bool,
}

impl Default for GravityWell {
    fn default() -> Self {
        Self {
            phase: WellPhase::Inactive,
            preset: None,
            magnitude: 0.0,
            spin_dir: 0.0,
            spin_speed: 0.0,
            angle: 0.0,
            duration: 0.0,
            center_latched: false,
        }
    }
}

impl GravityWell {
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self.phase, WellPhase::Active { .. })
    }

    #[inline]
    pub fn is_decaying(&self) -> bool {
        matches!(self.phase, WellPhase::Decaying { .. })
    }

    /// Active or decaying: the arena is rotated and gravity applies
    #[inline]
    pub fn is_engaged(&self) -> bool {
        !matches!(self.phase, WellPhase::Inactive)
    }

    pub fn preset(&self) -> Option<&'static GravityPreset> {
        self.preset.map(|i| &GRAVITY_PRESETS[i])
    }

    /// Start the well. Returns false (and changes nothing) if one is already running.
    pub fn activate<R: Rng>(
        &mut self,
        now: f32,
        tuning: &Tuning,
        rng: &mut R,
        schedule: &mut Schedule,
    ) -> bool {
        if self.is_engaged() {
            return false;
        }

        let preset = rng.random_range(0..GRAVITY_PRESETS.len());
        self.preset = Some(preset);
        self.magnitude = GRAVITY_PRESETS[preset].gravity;
        self.spin_dir = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.spin_speed = tuning.spin_speed;
        self.angle = 0.0;
        self.duration = tuning.well_duration;
        self.center_latched = false;
        self.phase = WellPhase::Active { started_at: now };

        schedule.cancel(is_well_event);
        schedule.push(now + tuning.well_duration, ScheduledEvent::BeginWellDecay);

        log::info!(
            "Gravity well active: {} ({} g), spin {:+}",
            GRAVITY_PRESETS[preset].name,
            self.magnitude,
            self.spin_dir
        );
        true
    }

    /// Rotate the arena by one tick (only while Active)
    pub fn advance(&mut self, dt: f32) {
        if !self.is_active() {
            return;
        }
        self.angle += self.spin_speed * self.spin_dir * dt;
        if self.angle > TAU {
            self.angle -= TAU;
        } else if self.angle < -TAU {
            self.angle += TAU;
        }
    }

    /// Velocity change this tick from the rotating pull
    pub fn acceleration(&self, dt: f32) -> Vec2 {
        if !self.is_engaged() {
            return Vec2::ZERO;
        }
        Vec2::new(self.angle.sin(), self.angle.cos()) * self.magnitude * dt
    }

    /// Map a board point into the unrotated board frame
    pub fn unrotate(&self, point: Vec2, pivot: Vec2) -> Vec2 {
        if !self.is_engaged() {
            return point;
        }
        rotate_about(point, pivot, -self.angle)
    }

    /// Kick the ball along its direction of travel while it straddles the
    /// (unrotated) center line. Returns whether the boost fired.
    pub fn apply_center_boost(&mut self, ball: &mut Ball, pivot: Vec2, tuning: &Tuning) -> bool {
        if !self.is_engaged() || ball.stuck {
            self.center_latched = false;
            return false;
        }

        let local = self.unrotate(ball.pos, pivot);
        let in_band = (local.x - pivot.x).abs() < ball.radius;
        let fire = match tuning.center_boost {
            CenterBoost::EveryTick => in_band,
            CenterBoost::OncePerCrossing => in_band && !self.center_latched,
        };
        self.center_latched = in_band;

        if !fire || ball.vel.x == 0.0 {
            return false;
        }
        ball.vel.x += self.magnitude * tuning.center_boost_factor * ball.vel.x.signum();
        true
    }

    /// Active period is over: walk the angle back to zero in fixed steps
    pub fn begin_decay(&mut self, now: f32, tuning: &Tuning, schedule: &mut Schedule) -> bool {
        if !self.is_active() {
            return false;
        }
        let steps = tuning.decay_steps.max(1);
        self.phase = WellPhase::Decaying {
            steps_left: steps,
            step_angle: self.angle / steps as f32,
        };
        schedule.push(now + tuning.decay_interval, ScheduledEvent::WellDecayStep);
        log::info!("Gravity well decaying from {:.3} rad", self.angle);
        true
    }

    /// One decay step. Returns true when the well has just gone Inactive.
    pub fn decay_step(&mut self, now: f32, tuning: &Tuning, schedule: &mut Schedule) -> bool {
        let WellPhase::Decaying {
            steps_left,
            step_angle,
        } = self.phase
        else {
            return false;
        };

        self.angle -= step_angle;
        let steps_left = steps_left.saturating_sub(1);
        if steps_left == 0 {
            self.deactivate();
            log::info!("Gravity well settled");
            return true;
        }

        self.phase = WellPhase::Decaying {
            steps_left,
            step_angle,
        };
        schedule.push(now + tuning.decay_interval, ScheduledEvent::WellDecayStep);
        false
    }

    /// Drop straight to Inactive, discarding any pending decay. Returns whether
    /// anything was running.
    pub fn force_reset(&mut self, schedule: &mut Schedule) -> bool {
        schedule.cancel(is_well_event);
        if !self.is_engaged() {
            return false;
        }
        self.deactivate();
        log::info!("Gravity well cancelled");
        true
    }

    /// Seconds left in the Active period (zero otherwise)
    pub fn remaining(&self, now: f32) -> f32 {
        match self.phase {
            WellPhase::Active { started_at } => (started_at + self.duration - now).max(0.0),
            _ => 0.0,
        }
    }

    fn deactivate(&mut self) {
        self.phase = WellPhase::Inactive;
        self.angle = 0.0;
        self.center_latched = false;
    }
}

fn is_well_event(event: &ScheduledEvent) -> bool {
    matches!(
        event,
        ScheduledEvent::BeginWellDecay | ScheduledEvent::WellDecayStep
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn active_well(seed: u64) -> (GravityWell, Schedule, Tuning, Pcg32) {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut schedule = Schedule::default();
        let mut well = GravityWell::default();
        assert!(well.activate(0.0, &tuning, &mut rng, &mut schedule));
        (well, schedule, tuning, rng)
    }

    #[test]
    fn test_activate_picks_preset_and_schedules_decay() {
        let (well, schedule, tuning, _) = active_well(11);
        assert!(well.is_active());
        assert!(!well.is_decaying());
        let preset = well.preset().unwrap();
        assert_eq!(well.magnitude, preset.gravity);
        assert!(GRAVITY_PRESETS.iter().any(|p| p.gravity == well.magnitude));
        assert!(well.spin_dir == 1.0 || well.spin_dir == -1.0);
        assert_eq!(
            schedule.next_due(|e| *e == ScheduledEvent::BeginWellDecay),
            Some(tuning.well_duration)
        );
    }

    #[test]
    fn test_second_activation_is_noop() {
        let (mut well, mut schedule, tuning, mut rng) = active_well(5);
        well.advance(0.5);
        let before = (well.preset, well.magnitude, well.spin_dir, well.angle, well.phase);

        assert!(!well.activate(10.0, &tuning, &mut rng, &mut schedule));
        assert_eq!(
            before,
            (well.preset, well.magnitude, well.spin_dir, well.angle, well.phase)
        );
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn test_angle_advances_and_wraps() {
        let (mut well, _, tuning, _) = active_well(2);
        well.advance(1.0);
        assert!((well.angle - tuning.spin_speed * well.spin_dir).abs() < 1e-6);

        for _ in 0..20 {
            well.advance(1.0);
            assert!(well.angle.abs() <= TAU);
        }
    }

    #[test]
    fn test_acceleration_follows_angle() {
        let (mut well, _, _, _) = active_well(3);
        let a0 = well.acceleration(0.5);
        assert!(a0.x.abs() < 1e-6);
        assert!((a0.y - well.magnitude * 0.5).abs() < 1e-5);

        well.angle = std::f32::consts::FRAC_PI_2;
        let a1 = well.acceleration(1.0);
        assert!((a1.x - well.magnitude).abs() < 1e-4);
        assert!(a1.y.abs() < 1e-4);

        assert_eq!(GravityWell::default().acceleration(1.0), Vec2::ZERO);
    }

    #[test]
    fn test_decay_walks_angle_to_zero() {
        let (mut well, mut schedule, tuning, _) = active_well(4);
        well.angle = 1.0;
        assert_eq!(schedule.drain_due(60.0), vec![ScheduledEvent::BeginWellDecay]);
        assert!(well.begin_decay(60.0, &tuning, &mut schedule));
        assert!(well.is_decaying());
        assert!(!well.is_active());

        let mut now = 60.0;
        let mut steps = 0;
        loop {
            now += tuning.decay_interval;
            let due = schedule.drain_due(now);
            assert_eq!(due, vec![ScheduledEvent::WellDecayStep]);
            steps += 1;
            if well.decay_step(now, &tuning, &mut schedule) {
                break;
            }
            assert!(well.angle < 1.0 && well.angle > 0.0);
        }
        assert_eq!(steps, tuning.decay_steps);
        assert_eq!(well.angle, 0.0);
        assert!(!well.is_engaged());
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_activate_ignored_while_decaying() {
        let (mut well, mut schedule, tuning, mut rng) = active_well(8);
        well.begin_decay(60.0, &tuning, &mut schedule);
        assert!(!well.activate(60.01, &tuning, &mut rng, &mut schedule));
        assert!(well.is_decaying());
    }

    #[test]
    fn test_force_reset_discards_pending_decay() {
        let (mut well, mut schedule, _, _) = active_well(9);
        well.advance(2.0);
        assert!(well.force_reset(&mut schedule));
        assert!(!well.is_engaged());
        assert_eq!(well.angle, 0.0);
        assert!(schedule.is_empty());
        assert!(!well.force_reset(&mut schedule));
    }

    #[test]
    fn test_center_boost_every_tick() {
        let (mut well, _, tuning, _) = active_well(10);
        let pivot = Vec2::new(640.0, 360.0);
        let mut ball = Ball::new(1, pivot + Vec2::new(2.0, 0.0), Vec2::new(-6.0, 1.0), 12.0);

        assert!(well.apply_center_boost(&mut ball, pivot, &tuning));
        let expected = -6.0 - well.magnitude * tuning.center_boost_factor;
        assert!((ball.vel.x - expected).abs() < 1e-5);

        // Still in the band next tick: fires again
        assert!(well.apply_center_boost(&mut ball, pivot, &tuning));

        // Out of the band: nothing
        ball.pos.x = 100.0;
        assert!(!well.apply_center_boost(&mut ball, pivot, &tuning));
    }

    #[test]
    fn test_center_boost_once_per_crossing() {
        let (mut well, _, mut tuning, _) = active_well(10);
        tuning.center_boost = CenterBoost::OncePerCrossing;
        let pivot = Vec2::new(640.0, 360.0);
        let mut ball = Ball::new(1, pivot, Vec2::new(6.0, 0.0), 12.0);

        assert!(well.apply_center_boost(&mut ball, pivot, &tuning));
        assert!(!well.apply_center_boost(&mut ball, pivot, &tuning));
        ball.pos.x = 900.0;
        assert!(!well.apply_center_boost(&mut ball, pivot, &tuning));
        ball.pos.x = 645.0;
        assert!(well.apply_center_boost(&mut ball, pivot, &tuning));
    }

    #[test]
    fn test_center_band_measured_in_unrotated_frame() {
        let (mut well, _, tuning, _) = active_well(12);
        well.angle = std::f32::consts::FRAC_PI_2;
        let pivot = Vec2::new(640.0, 360.0);

        // On the screen-space center line but far from it once unrotated
        let mut ball = Ball::new(1, pivot + Vec2::new(0.0, 200.0), Vec2::new(5.0, 0.0), 12.0);
        assert!(!well.apply_center_boost(&mut ball, pivot, &tuning));

        // Rotated onto the unrotated center line
        ball.pos = rotate_about(pivot + Vec2::new(0.0, 150.0), pivot, well.angle);
        assert!(well.apply_center_boost(&mut ball, pivot, &tuning));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// One well at a time; its pending events always match its phase
            #[test]
            fn prop_single_well_phase_matches_schedule(
                seed in any::<u64>(),
                ops in proptest::collection::vec((0u8..4, 0.0f32..3.0), 1..120),
            ) {
                let tuning = Tuning {
                    well_duration: 5.0,
                    ..Default::default()
                };
                let mut rng = Pcg32::seed_from_u64(seed);
                let mut schedule = Schedule::default();
                let mut well = GravityWell::default();
                let mut now = 0.0f32;

                for (op, dt) in ops {
                    now += dt;
                    match op {
                        0 => {
                            let engaged = well.is_engaged();
                            let before = (well.preset, well.magnitude, well.spin_dir, well.angle, well.phase);
                            let started = well.activate(now, &tuning, &mut rng, &mut schedule);
                            prop_assert_eq!(started, !engaged);
                            if engaged {
                                prop_assert_eq!(before, (well.preset, well.magnitude, well.spin_dir, well.angle, well.phase));
                            }
                        }
                        1 => well.advance(dt),
                        2 => {
                            for event in schedule.drain_due(now) {
                                match event {
                                    ScheduledEvent::BeginWellDecay => {
                                        prop_assert!(well.begin_decay(now, &tuning, &mut schedule));
                                    }
                                    ScheduledEvent::WellDecayStep => {
                                        well.decay_step(now, &tuning, &mut schedule);
                                    }
                                    ScheduledEvent::ReleaseBall { .. } => unreachable!(),
                                }
                            }
                        }
                        _ => {
                            well.force_reset(&mut schedule);
                        }
                    }

                    prop_assert!(schedule.len() <= 1);
                    match well.phase {
                        WellPhase::Inactive => {
                            prop_assert!(schedule.is_empty());
                            prop_assert_eq!(well.angle, 0.0);
                        }
                        WellPhase::Active { .. } => {
                            prop_assert!(schedule.next_due(|e| *e == ScheduledEvent::BeginWellDecay).is_some());
                        }
                        WellPhase::Decaying { .. } => {
                            prop_assert!(schedule.next_due(|e| *e == ScheduledEvent::WellDecayStep).is_some());
                        }
                    }
                }
            }
        }
    }
}
