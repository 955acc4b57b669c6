//! Tick-counter driven spawning
//!
//! Cadence is measured in ticks, never wall-clock time. Everything enters at
//! the right edge of the world.

use super::state::{Coin, GameEvent, GameState, Hazard, Obstacle, ObstacleKind};
use crate::consts::WORLD_WIDTH;

/// Coins appear somewhere in this vertical band (top edge)
const COIN_BAND: (f32, f32) = (80.0, 40.0);
/// Hazards fly somewhere in this vertical band (top edge)
const HAZARD_BAND: (f32, f32) = (60.0, 50.0);

fn on_cadence(frame: u64, interval: u64) -> bool {
    frame > 0 && frame % interval == 0
}

/// Roll for a coin on its cadence
pub fn spawn_coin(state: &mut GameState) -> Option<u32> {
    if !state.is_running() || !on_cadence(state.frame_count, state.tuning.coin_interval) {
        return None;
    }
    if !state.roll(state.tuning.coin_chance) {
        return None;
    }
    let id = state.next_entity_id();
    let y = COIN_BAND.0 + state.unit() * COIN_BAND.1;
    state.coins.push(Coin {
        id,
        x: WORLD_WIDTH,
        y,
        collected_at: None,
        frame: 0,
    });
    state.events.push(GameEvent::CoinSpawned { id });
    log::debug!("Spawned coin {} at y={:.0}", id, y);
    Some(id)
}

/// Roll for a hazard on its cadence, once the score gate is passed
pub fn spawn_hazard(state: &mut GameState) -> Option<u32> {
    if !state.is_running()
        || state.score <= state.tuning.hazard_min_score
        || !on_cadence(state.frame_count, state.tuning.hazard_interval)
    {
        return None;
    }
    if !state.roll(state.tuning.hazard_chance) {
        return None;
    }
    let id = state.next_entity_id();
    let y = HAZARD_BAND.0 + state.unit() * HAZARD_BAND.1;
    state.hazards.push(Hazard {
        id,
        x: WORLD_WIDTH,
        y,
        frame: 0,
    });
    state.events.push(GameEvent::HazardSpawned { id });
    log::debug!("Spawned hazard {} at y={:.0}", id, y);
    Some(id)
}

/// Append an obstacle on its cadence; the variant is a coin flip
pub fn spawn_obstacle(state: &mut GameState) -> Option<u32> {
    if !state.is_running() || !on_cadence(state.frame_count, state.tuning.obstacle_interval) {
        return None;
    }
    let kind = if state.roll(0.5) {
        ObstacleKind::Large
    } else {
        ObstacleKind::Small
    };
    let id = state.next_entity_id();
    state.obstacles.push(Obstacle::new(id, WORLD_WIDTH, kind));
    state.events.push(GameEvent::ObstacleSpawned { id, kind });
    log::debug!("Spawned {:?} obstacle {}", kind, id);
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn running_with(tuning: Tuning) -> GameState {
        let mut state = GameState::new(21, tuning);
        state.start();
        state
    }

    #[test]
    fn test_obstacle_cadence() {
        let mut state = running_with(Tuning::default());
        let mut spawned = Vec::new();
        for frame in 1..=270 {
            state.frame_count = frame;
            if spawn_obstacle(&mut state).is_some() {
                spawned.push(frame);
            }
        }
        assert_eq!(spawned, vec![90, 180, 270]);
        assert!(state.obstacles.iter().all(|o| o.x == WORLD_WIDTH));
    }

    #[test]
    fn test_both_obstacle_variants_appear() {
        let mut state = running_with(Tuning::default());
        for i in 1..=60 {
            state.frame_count = i * 90;
            spawn_obstacle(&mut state);
        }
        assert!(state.obstacles.iter().any(|o| o.kind == ObstacleKind::Small));
        assert!(state.obstacles.iter().any(|o| o.kind == ObstacleKind::Large));
    }

    #[test]
    fn test_coin_band_and_certain_roll() {
        let tuning = Tuning {
            coin_chance: 1.0,
            ..Tuning::default()
        };
        let mut state = running_with(tuning);
        for i in 1..=20 {
            state.frame_count = i * 150;
            assert!(spawn_coin(&mut state).is_some());
            state.frame_count += 1;
            assert!(spawn_coin(&mut state).is_none(), "off-cadence tick spawned");
        }
        assert_eq!(state.coins.len(), 20);
        assert!(state.coins.iter().all(|c| (80.0..120.0).contains(&c.y)));
    }

    #[test]
    fn test_hazards_gated_by_score() {
        let tuning = Tuning {
            hazard_chance: 1.0,
            ..Tuning::default()
        };
        let mut state = running_with(tuning);
        state.frame_count = 200;
        state.score = 300;
        assert!(spawn_hazard(&mut state).is_none(), "gate is strictly greater");
        state.score = 301;
        assert!(spawn_hazard(&mut state).is_some());
        assert!((60.0..110.0).contains(&state.hazards[0].y));
    }

    #[test]
    fn test_never_spawns_when_not_running() {
        let tuning = Tuning {
            coin_chance: 1.0,
            hazard_chance: 1.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(21, tuning);
        state.frame_count = 1800;
        state.score = 1000;
        assert!(spawn_obstacle(&mut state).is_none());
        assert!(spawn_coin(&mut state).is_none());
        assert!(spawn_hazard(&mut state).is_none());
    }

    #[test]
    fn test_zero_chance_never_spawns() {
        let tuning = Tuning {
            coin_chance: 0.0,
            ..Tuning::default()
        };
        let mut state = running_with(tuning);
        for i in 1..=50 {
            state.frame_count = i * 150;
            assert!(spawn_coin(&mut state).is_none());
        }
    }
}
