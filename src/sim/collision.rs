//! Collision detection and response
//!
//! Everything is axis-aligned boxes tested once per tick at the entity's
//! current position. There is no sweep, so a very fast world at a very low
//! frame rate can tunnel through a thin cactus.

use serde::{Deserialize, Serialize};

use super::particles;
use super::state::{EndCause, GameEvent, GameState, ParticleKind};
use crate::spans_overlap;

/// Axis-aligned bounding box in world space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        spans_overlap(self.x, self.right(), other.x, other.right())
    }

    pub fn overlaps_y(&self, other: &Aabb) -> bool {
        spans_overlap(self.y, self.bottom(), other.y, other.bottom())
    }

    /// Strict rectangle intersection (touching edges do not count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.overlaps_x(other) && self.overlaps_y(other)
    }

    /// Horizontal overlap with our bottom edge below the other's top.
    ///
    /// A cactus is dangerous from the ground up, so clearing its top is the
    /// only way past it.
    pub fn lands_on(&self, other: &Aabb) -> bool {
        self.overlaps_x(other) && self.bottom() > other.y
    }
}

/// Mark every uncollected coin the player touches as collected.
/// Returns the number collected this tick.
pub fn collect_coins(state: &mut GameState) -> u32 {
    let player = state.player.bounds();
    let frame = state.frame_count;
    let mut sparkles = Vec::new();

    for coin in &mut state.coins {
        if coin.is_collected() || !player.overlaps(&coin.hitbox()) {
            continue;
        }
        coin.collected_at = Some(frame);
        sparkles.push((coin.id, coin.center()));
    }

    // Deferred so the coin borrow is released before emitting
    let collected = sparkles.len() as u32;
    for (id, center) in sparkles {
        state.coin_count += 1;
        state.events.push(GameEvent::CoinCollected { id });
        particles::burst(state, center, ParticleKind::Sparkle);
        log::debug!("Coin {} collected ({} total)", id, state.coin_count);
    }
    collected
}

/// Test the player against every hazard; any hit ends the session.
/// Returns true if at least one hazard overlaps.
pub fn check_hazards(state: &mut GameState) -> bool {
    let player = state.player.hazard_hitbox();
    let hit = state.hazards.iter().any(|h| player.overlaps(&h.hitbox()));
    if hit {
        state.end(EndCause::Hazard);
    }
    hit
}

/// Test the player against every obstacle. Offending obstacles move to
/// `wrecks`, the player shatters, and the session ends. Returns the number
/// of hits.
pub fn check_obstacles(state: &mut GameState) -> usize {
    let player = state.player.obstacle_hitbox();
    let (wrecked, clear): (Vec<_>, Vec<_>) = state
        .obstacles
        .drain(..)
        .partition(|o| player.lands_on(&o.hitbox()));
    state.obstacles = clear;
    let hits = wrecked.len();
    state.wrecks.extend(wrecked);

    if hits > 0 {
        let center = state.player.center();
        // One shatter per session, however many cacti overlap this tick
        if state.end(EndCause::Obstacle) {
            particles::burst(state, center, ParticleKind::Shard);
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{Coin, Hazard, Obstacle, ObstacleKind, SessionPhase};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn running() -> GameState {
        let mut state = GameState::new(11, Tuning::default());
        state.start();
        state
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        let c = Aabb::new(9.9, 9.9, 10.0, 10.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_lands_on_ignores_vertical_extent_above() {
        // Player box far below the obstacle's bottom still counts: only the top matters
        let obstacle = Aabb::new(0.0, 100.0, 10.0, 5.0);
        let deep = Aabb::new(2.0, 150.0, 10.0, 10.0);
        assert!(deep.lands_on(&obstacle));
        assert!(!deep.overlaps(&obstacle));

        let above = Aabb::new(2.0, 80.0, 10.0, 20.0);
        assert!(!above.lands_on(&obstacle));
    }

    #[test]
    fn test_coin_collected_once() {
        let mut state = running();
        let id = state.next_entity_id();
        state.coins.push(Coin {
            id,
            x: PLAYER_X + 10.0,
            y: PLAYER_GROUND_Y + 10.0,
            collected_at: None,
            frame: 0,
        });

        assert_eq!(collect_coins(&mut state), 1);
        assert_eq!(state.coin_count, 1);
        assert_eq!(state.coins[0].collected_at, Some(state.frame_count));
        assert_eq!(state.particles.len(), 8);

        // Still overlapping next tick, but already collected
        assert_eq!(collect_coins(&mut state), 0);
        assert_eq!(state.coin_count, 1);
        assert_eq!(state.particles.len(), 8);
        assert_eq!(state.coins.len(), 1, "collected coins stay in the list");
    }

    #[test]
    fn test_coin_out_of_reach() {
        let mut state = running();
        let id = state.next_entity_id();
        state.coins.push(Coin {
            id,
            x: PLAYER_X + 10.0,
            y: 80.0,
            collected_at: None,
            frame: 0,
        });
        // Player top is 120, coin bottom is 96
        assert_eq!(collect_coins(&mut state), 0);
    }

    #[test]
    fn test_hazard_hit_ends_session() {
        let mut state = running();
        let id = state.next_entity_id();
        state.hazards.push(Hazard {
            id,
            x: PLAYER_X + 15.0,
            y: PLAYER_GROUND_Y + 10.0,
            frame: 0,
        });
        assert!(check_hazards(&mut state));
        assert_eq!(state.phase, SessionPhase::Ended);
        assert!(state.particles.is_empty(), "hazards do not shatter the player");
    }

    #[test]
    fn test_hazard_overhead_misses() {
        let mut state = running();
        let id = state.next_entity_id();
        // Hazard box bottom at 72, player hazard box top at 125
        state.hazards.push(Hazard {
            id,
            x: PLAYER_X + 15.0,
            y: 60.0,
            frame: 0,
        });
        assert!(!check_hazards(&mut state));
        assert!(state.is_running());
    }

    #[test]
    fn test_simultaneous_obstacles_end_once() {
        let mut state = running();
        for kind in [ObstacleKind::Small, ObstacleKind::Large] {
            let id = state.next_entity_id();
            state.obstacles.push(Obstacle::new(id, PLAYER_X + 10.0, kind));
        }
        let far = state.next_entity_id();
        state.obstacles.push(Obstacle::new(far, 300.0, ObstacleKind::Small));

        assert_eq!(check_obstacles(&mut state), 2);
        assert_eq!(state.phase, SessionPhase::Ended);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].id, far);
        assert_eq!(state.wrecks.len(), 2);
        assert_eq!(state.particles.len(), 15);
        let ends = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::SessionEnded { .. }))
            .count();
        assert_eq!(ends, 1);
    }

    #[test]
    fn test_airborne_player_clears_cactus() {
        let mut state = running();
        // Player bottom at 60 + 5 + 43 = 108, small cactus top at 135
        state.player.y = 60.0;
        state.player.jumping = true;
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::new(id, PLAYER_X + 10.0, ObstacleKind::Small));
        assert_eq!(check_obstacles(&mut state), 0);
        assert!(state.is_running());
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -50.0f32..450.0, ay in -50.0f32..250.0, aw in 0.5f32..60.0, ah in 0.5f32..60.0,
            bx in -50.0f32..450.0, by in -50.0f32..250.0, bw in 0.5f32..60.0, bh in 0.5f32..60.0,
        ) {
            let a = Aabb::new(ax, ay, aw, ah);
            let b = Aabb::new(bx, by, bw, bh);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
            if a.overlaps(&b) {
                prop_assert!(a.lands_on(&b));
            }
        }
    }
}
