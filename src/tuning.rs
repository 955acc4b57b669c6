//! Data-driven game balance
//!
//! Every number the simulation uses to decide "how fast", "how often" and
//! "how likely" lives here, so a run can be re-balanced from a JSON file
//! without touching the tick code. Units are per tick unless noted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a tuning table
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning value `{field}` is out of range: {reason}")]
    OutOfRange {
        field: &'static str,
        reason: &'static str,
    },
}

/// Balance table for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration applied to the player each tick
    pub gravity: f32,
    /// Vertical velocity set on jump (negative = up)
    pub jump_impulse: f32,

    /// World scroll speed at session start
    pub initial_speed: f32,
    /// Speed added every milestone interval
    pub speed_step: f32,
    /// Hard cap on world speed
    pub max_speed: f32,
    /// Hazards fly this much faster than the ground scrolls
    pub hazard_speed_factor: f32,

    /// Ticks between obstacle spawns
    pub obstacle_interval: u64,
    /// Ticks between coin spawn rolls
    pub coin_interval: u64,
    /// Chance a coin roll succeeds
    pub coin_chance: f64,
    /// Ticks between hazard spawn rolls
    pub hazard_interval: u64,
    /// Chance a hazard roll succeeds
    pub hazard_chance: f64,
    /// Hazards only appear once the score is strictly above this
    pub hazard_min_score: u64,
    /// Chance a ground tile carries a pebble
    pub ground_detail_chance: f64,

    /// Score multiple that triggers a milestone (and a speed step)
    pub milestone_interval: u64,
    /// How long the milestone banner stays up
    pub milestone_display_ticks: u32,

    /// Delay between the fatal collision and the game-over notification (ms)
    pub game_over_delay_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.7,
            jump_impulse: -14.0,

            initial_speed: 5.0,
            speed_step: 0.3,
            max_speed: 12.0,
            hazard_speed_factor: 1.5,

            obstacle_interval: 90,
            coin_interval: 150,
            coin_chance: 0.5,
            hazard_interval: 200,
            hazard_chance: 0.4,
            hazard_min_score: 300,
            ground_detail_chance: 0.3,

            milestone_interval: 500,
            milestone_display_ticks: 60,

            game_over_delay_ms: 300.0,
        }
    }
}

impl Tuning {
    /// Parse a tuning table from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break the simulation's invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        fn out_of_range(field: &'static str, reason: &'static str) -> TuningError {
            TuningError::OutOfRange { field, reason }
        }

        if !(self.gravity > 0.0) {
            return Err(out_of_range("gravity", "must be positive"));
        }
        if !(self.jump_impulse < 0.0) {
            return Err(out_of_range("jump_impulse", "must point upward (negative)"));
        }
        if !(self.initial_speed > 0.0) {
            return Err(out_of_range("initial_speed", "must be positive"));
        }
        if !(self.speed_step >= 0.0) {
            return Err(out_of_range("speed_step", "must not be negative"));
        }
        if !(self.max_speed >= self.initial_speed) {
            return Err(out_of_range("max_speed", "must be at least initial_speed"));
        }
        if !(self.hazard_speed_factor > 0.0) {
            return Err(out_of_range("hazard_speed_factor", "must be positive"));
        }
        for (field, interval) in [
            ("obstacle_interval", self.obstacle_interval),
            ("coin_interval", self.coin_interval),
            ("hazard_interval", self.hazard_interval),
            ("milestone_interval", self.milestone_interval),
        ] {
            if interval == 0 {
                return Err(out_of_range(field, "must be at least one tick"));
            }
        }
        for (field, chance) in [
            ("coin_chance", self.coin_chance),
            ("hazard_chance", self.hazard_chance),
            ("ground_detail_chance", self.ground_detail_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(out_of_range(field, "must be a probability in [0, 1]"));
            }
        }
        if self.milestone_display_ticks == 0 {
            return Err(out_of_range("milestone_display_ticks", "must be at least one tick"));
        }
        if !(self.game_over_delay_ms >= 0.0) {
            return Err(out_of_range("game_over_delay_ms", "must not be negative"));
        }
        Ok(())
    }

    /// Ticks of the milestone banner spent fading/scaling in
    pub fn milestone_intro_ticks(&self) -> u32 {
        (self.milestone_display_ticks / 2).max(1)
    }
}
