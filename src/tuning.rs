//! Data-driven game balance
//!
//! Every number the simulation uses lives in [`Tuning`]. The defaults
//! reproduce the classic feel; a JSON document can override any subset.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named gravity strength the well can pick on activation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GravityPreset {
    pub name: &'static str,
    /// Acceleration magnitude (board units per tick, per second)
    pub gravity: f32,
}

/// Fixed preset table, indexed by the well's `preset` field
pub const GRAVITY_PRESETS: [GravityPreset; 11] = [
    GravityPreset { name: "Earth", gravity: 9.8 },
    GravityPreset { name: "Mars", gravity: 3.7 },
    GravityPreset { name: "Moon", gravity: 1.6 },
    GravityPreset { name: "Kepler-62f", gravity: 12.1 },
    GravityPreset { name: "TRAPPIST-1e", gravity: 9.1 },
    GravityPreset { name: "GJ 1132b", gravity: 11.7 },
    GravityPreset { name: "Proxima Centauri b", gravity: 10.9 },
    GravityPreset { name: "LHS 1140b", gravity: 12.5 },
    GravityPreset { name: "K2-18b", gravity: 13.8 },
    GravityPreset { name: "HD 40307g", gravity: 14.7 },
    GravityPreset { name: "55 Cancri e", gravity: 14.2 },
];

/// Which side receives each serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ServePolicy {
    /// Coin flip every serve
    #[default]
    Random,
    /// Alternate sides, first serve is a coin flip
    Alternate,
}

/// How often the well's center-line boost fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CenterBoost {
    /// Every tick the ball sits inside the center band
    #[default]
    EveryTick,
    /// Once per pass through the band
    OncePerCrossing,
}

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning json: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Complete balance sheet for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Match ===
    pub win_score: u32,
    pub serve_policy: ServePolicy,
    /// Serve x speed (per tick)
    pub serve_speed_x: f32,
    /// Serve |vy| band (per tick)
    pub serve_vy_min: f32,
    pub serve_vy_max: f32,

    // === Paddles ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Gap between a side's travel range and the center line
    pub paddle_margin: f32,
    /// Starting distance from the board edge
    pub paddle_inset: f32,
    /// Keyboard step per tick
    pub paddle_speed: f32,
    /// AI step cap per tick
    pub ai_speed: f32,
    /// AI also eases toward the ball's x (clamped to its range)
    pub ai_track_x: bool,

    // === Arc geometry ===
    pub arc_radius: f32,
    /// Angular sweep of each paddle arc (radians)
    pub arc_sweep: f32,

    // === Ball ===
    pub ball_radius: f32,
    /// Swept-sampling step as a fraction of ball radius
    pub sweep_step_factor: f32,

    // === Paddle bounce ===
    pub bounce_restitution: f32,
    pub bounce_impact_gain: f32,
    pub bounce_paddle_carry: f32,
    /// Full width of the random vy jitter added on bounce
    pub bounce_jitter: f32,
    pub bounce_min_speed: f32,
    pub bounce_max_speed: f32,

    // === Hazard cells ===
    pub block_size: f32,
    /// Keep-out distance from every board edge when spawning
    pub block_edge_margin: f32,
    /// Half-width of the no-spawn band around the center line
    pub block_center_band: f32,
    pub max_blocks: usize,
    pub block_life_min: f32,
    pub block_life_max: f32,
    pub placement_attempts: u32,
    pub accelerant_factor: f32,
    pub randomizer_speed_min: f32,
    pub randomizer_speed_max: f32,
    pub sticky_duration_min: f32,
    pub sticky_duration_max: f32,
    pub sticky_release_speed_min: f32,
    pub sticky_release_speed_max: f32,

    // === Gravity well ===
    /// Angular speed (rad/s)
    pub spin_speed: f32,
    /// Seconds from activation until decay starts
    pub well_duration: f32,
    pub decay_steps: u32,
    /// Seconds between decay steps
    pub decay_interval: f32,
    pub center_boost_factor: f32,
    pub center_boost: CenterBoost,
}

impl Default for Tuning {
    fn default() -> Self {
        let block_size = 38.0;
        Self {
            win_score: 10,
            serve_policy: ServePolicy::Random,
            serve_speed_x: 6.0,
            serve_vy_min: 2.0,
            serve_vy_max: 4.0,

            paddle_width: 24.0,
            paddle_height: 120.0,
            paddle_margin: 40.0,
            paddle_inset: 14.0,
            paddle_speed: 4.2,
            ai_speed: 4.2,
            ai_track_x: true,

            arc_radius: 74.0,
            arc_sweep: std::f32::consts::PI,

            ball_radius: 12.0,
            sweep_step_factor: 0.5,

            bounce_restitution: 1.08,
            bounce_impact_gain: 0.38,
            bounce_paddle_carry: 0.45,
            bounce_jitter: 1.4,
            bounce_min_speed: 5.4,
            bounce_max_speed: 16.0,

            block_size,
            block_edge_margin: 3.0 * block_size,
            block_center_band: 70.0,
            max_blocks: 5,
            block_life_min: 2.0,
            block_life_max: 5.0,
            placement_attempts: 30,
            accelerant_factor: 1.07,
            randomizer_speed_min: 7.0,
            randomizer_speed_max: 14.0,
            sticky_duration_min: 0.7,
            sticky_duration_max: 1.4,
            sticky_release_speed_min: 8.0,
            sticky_release_speed_max: 18.0,

            spin_speed: 0.75,
            well_duration: 60.0,
            decay_steps: 25,
            decay_interval: 0.03,
            center_boost_factor: 0.15,
            center_boost: CenterBoost::EveryTick,
        }
    }
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize the full balance sheet
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::InvalidValue {
                    field,
                    reason: format!("must be positive, got {value}"),
                })
            }
        }

        fn band(field: &'static str, min: f32, max: f32) -> Result<(), TuningError> {
            if min.is_finite() && max.is_finite() && min >= 0.0 && min <= max {
                Ok(())
            } else {
                Err(TuningError::InvalidValue {
                    field,
                    reason: format!("expected 0 <= min <= max, got [{min}, {max}]"),
                })
            }
        }

        if self.win_score == 0 {
            return Err(TuningError::InvalidValue {
                field: "win_score",
                reason: "must be at least 1".into(),
            });
        }
        positive("paddle_width", self.paddle_width)?;
        positive("paddle_height", self.paddle_height)?;
        positive("ai_speed", self.ai_speed)?;
        if !(self.paddle_speed.is_finite() && self.paddle_speed >= 0.0) {
            return Err(TuningError::InvalidValue {
                field: "paddle_speed",
                reason: format!("must be non-negative, got {}", self.paddle_speed),
            });
        }
        positive("arc_radius", self.arc_radius)?;
        positive("arc_sweep", self.arc_sweep)?;
        positive("ball_radius", self.ball_radius)?;
        positive("sweep_step_factor", self.sweep_step_factor)?;
        positive("block_size", self.block_size)?;
        positive("spin_speed", self.spin_speed)?;
        positive("decay_interval", self.decay_interval)?;
        positive("serve_speed_x", self.serve_speed_x)?;

        band("serve_vy", self.serve_vy_min, self.serve_vy_max)?;
        band("bounce_speed", self.bounce_min_speed, self.bounce_max_speed)?;
        band("block_life", self.block_life_min, self.block_life_max)?;
        band("randomizer_speed", self.randomizer_speed_min, self.randomizer_speed_max)?;
        band("sticky_duration", self.sticky_duration_min, self.sticky_duration_max)?;
        band(
            "sticky_release_speed",
            self.sticky_release_speed_min,
            self.sticky_release_speed_max,
        )?;

        if self.bounce_min_speed <= 0.0 {
            return Err(TuningError::InvalidValue {
                field: "bounce_min_speed",
                reason: "must be positive so a bounce always leaves the paddle".into(),
            });
        }
        if self.block_life_min <= 0.0 {
            return Err(TuningError::InvalidValue {
                field: "block_life_min",
                reason: "cells need a non-zero lifetime".into(),
            });
        }
        if self.arc_sweep > std::f32::consts::TAU {
            return Err(TuningError::InvalidValue {
                field: "arc_sweep",
                reason: format!("cannot exceed a full turn, got {}", self.arc_sweep),
            });
        }
        if self.decay_steps == 0 {
            return Err(TuningError::InvalidValue {
                field: "decay_steps",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
