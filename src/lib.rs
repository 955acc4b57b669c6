//! Dino Runner - a single-screen endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, scoring)
//! - `renderer`: Canvas-style 2D drawing (sprites, parallax, HUD)
//! - `driver`: Frame driver owning the session lifecycle and outbound notifications
//! - `platform`: Browser glue (animation frames, input listeners, timers)
//! - `tuning`: Data-driven game balance

pub mod driver;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use driver::{DriverError, FrameDriver, FrameOutcome, GameHost, Notification, RunSummary};
pub use settings::{QualityPreset, Settings};
pub use tuning::{Tuning, TuningError};

/// World geometry constants
pub mod consts {
    /// Logical drawing surface size
    pub const WORLD_WIDTH: f32 = 400.0;
    pub const WORLD_HEIGHT: f32 = 200.0;

    /// Top of the ground band (the line everything stands on)
    pub const GROUND_LINE: f32 = 170.0;
    /// Height of the ground band below the line
    pub const GROUND_BAND: f32 = 30.0;

    /// Player defaults - x never changes, the world scrolls instead
    pub const PLAYER_X: f32 = 50.0;
    /// Player top edge when standing on the ground
    pub const PLAYER_GROUND_Y: f32 = 120.0;
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 48.0;

    /// Size of one sprite cell in world units
    pub const PIXEL: f32 = 2.5;

    /// Obstacles are drawn relative to this baseline
    pub const OBSTACLE_BASE_Y: f32 = 100.0;

    /// Collectible bounding box edge
    pub const COIN_SIZE: f32 = 16.0;

    /// Hazard bounding box
    pub const HAZARD_WIDTH: f32 = 20.0;
    pub const HAZARD_HEIGHT: f32 = 12.0;

    /// Ground decoration tiles
    pub const GROUND_TILE_COUNT: usize = 50;
    pub const GROUND_TILE_SPACING: f32 = 12.0;

    /// Nominal tick rate (one tick per display refresh)
    pub const NOMINAL_TICK_HZ: f64 = 60.0;
}

/// Returns true when `[a_min, a_max)` and `[b_min, b_max)` share any interior
#[inline]
pub fn spans_overlap(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> bool {
    a_min < b_max && a_max > b_min
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
