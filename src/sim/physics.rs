//! Vertical player physics
//!
//! The player never moves horizontally; the world scrolls past instead.

use super::particles;
use super::state::{GameEvent, GameState, ParticleKind, Player};
use crate::consts::PLAYER_GROUND_Y;

/// Run-cycle halves are this many ticks long
pub const RUN_CYCLE_HALF: u32 = 5;

/// Which sprite the player shows this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    /// Airborne (and the idle preview)
    Stand,
    StrideA,
    StrideB,
}

impl Player {
    /// Gravity step plus ground resolution
    pub fn integrate(&mut self, gravity: f32) {
        self.vy += gravity;
        self.y += self.vy;
        self.run_frame = self.run_frame.wrapping_add(1);

        if self.y >= PLAYER_GROUND_Y {
            self.y = PLAYER_GROUND_Y;
            self.vy = 0.0;
            self.jumping = false;
        }
    }

    pub fn pose(&self) -> Pose {
        if self.jumping {
            Pose::Stand
        } else if self.run_frame % (RUN_CYCLE_HALF * 2) < RUN_CYCLE_HALF {
            Pose::StrideA
        } else {
            Pose::StrideB
        }
    }
}

/// Apply the jump impulse. Ignored while airborne or not running.
pub fn jump(state: &mut GameState) -> bool {
    if !state.is_running() || state.player.jumping {
        return false;
    }
    state.player.vy = state.tuning.jump_impulse;
    state.player.jumping = true;
    state.events.push(GameEvent::Jumped);

    let feet = state.player.feet();
    particles::burst(state, feet, ParticleKind::Dust);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn running() -> GameState {
        let mut state = GameState::new(5, Tuning::default());
        state.start();
        state
    }

    #[test]
    fn test_jump_sets_impulse_and_kicks_dust() {
        let mut state = running();
        assert!(jump(&mut state));
        assert_eq!(state.player.vy, -14.0);
        assert!(state.player.jumping);
        assert_eq!(state.particles.len(), 6);
        assert_eq!(state.events, vec![GameEvent::Jumped]);
    }

    #[test]
    fn test_no_double_jump() {
        let mut state = running();
        assert!(jump(&mut state));
        state.player.integrate(state.tuning.gravity);
        let vy = state.player.vy;
        assert!(!jump(&mut state));
        assert_eq!(state.player.vy, vy);
        assert!(state.player.jumping);
        assert_eq!(state.particles.len(), 6);
    }

    #[test]
    fn test_jump_ignored_when_not_running() {
        let mut state = GameState::new(5, Tuning::default());
        assert!(!jump(&mut state));
        assert_eq!(state.player.vy, 0.0);
        assert!(!state.player.jumping);
    }

    #[test]
    fn test_full_arc_lands_exactly_on_ground() {
        let mut state = running();
        jump(&mut state);
        let mut ticks = 0;
        let mut apex = PLAYER_GROUND_Y;
        while state.player.jumping {
            state.player.integrate(state.tuning.gravity);
            apex = apex.min(state.player.y);
            ticks += 1;
            assert!(ticks < 100, "never landed");
        }
        assert_eq!(state.player.y, PLAYER_GROUND_Y);
        assert_eq!(state.player.vy, 0.0);
        assert!(apex < PLAYER_GROUND_Y - 100.0, "apex {apex} too low");
        // 14 / 0.7 = 20 ticks up, about as many down
        assert!((38..=42).contains(&ticks), "airtime {ticks}");
    }

    #[test]
    fn test_run_cycle_alternates_every_five_ticks() {
        let mut player = Player::default();
        let mut poses = Vec::new();
        for _ in 0..20 {
            poses.push(player.pose());
            player.integrate(0.7);
        }
        assert!(poses[..5].iter().all(|p| *p == Pose::StrideA));
        assert!(poses[5..10].iter().all(|p| *p == Pose::StrideB));
        assert!(poses[10..15].iter().all(|p| *p == Pose::StrideA));

        player.jumping = true;
        assert_eq!(player.pose(), Pose::Stand);
    }

    proptest! {
        #[test]
        fn prop_grounded_is_idempotent(ticks in 1usize..200, gravity in 0.1f32..3.0) {
            let mut player = Player::default();
            for _ in 0..ticks {
                player.integrate(gravity);
                prop_assert_eq!(player.y, PLAYER_GROUND_Y);
                prop_assert_eq!(player.vy, 0.0);
                prop_assert!(!player.jumping);
            }
        }
    }
}
