//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per call, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod particles;
pub mod physics;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use physics::{Pose, jump};
pub use state::{
    Cloud, Coin, EndCause, GameEvent, GameState, GroundTile, Hazard, MilestoneBanner, Mountain,
    Obstacle, ObstacleKind, Particle, ParticleKind, Player, SessionPhase,
};
pub use tick::{TickInput, autopilot_wants_jump, tick};
