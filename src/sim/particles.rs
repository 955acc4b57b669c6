//! Cosmetic particle bursts
//!
//! Emission is fire-and-forget. Particles drift, fall, fade and vanish;
//! nothing in collision or scoring ever looks at them.

use glam::Vec2;

use super::state::{GameState, Particle, ParticleKind};

/// Downward drift added to every particle each tick
pub const PARTICLE_DRIFT: f32 = 0.2;
/// Life value that maps to full opacity
pub const PARTICLE_FADE_TICKS: i32 = 25;

impl ParticleKind {
    /// Particles per burst
    pub fn burst_size(self) -> usize {
        match self {
            ParticleKind::Dust => 6,
            ParticleKind::Sparkle => 8,
            ParticleKind::Shard => 15,
        }
    }

    /// Starting life in ticks
    pub fn lifetime(self) -> i32 {
        match self {
            ParticleKind::Dust => 15,
            ParticleKind::Sparkle => 20,
            ParticleKind::Shard => 25,
        }
    }
}

impl Particle {
    /// Opacity derived from remaining life
    pub fn alpha(&self) -> f32 {
        (self.life as f32 / PARTICLE_FADE_TICKS as f32).clamp(0.0, 1.0)
    }
}

/// Push one burst of `kind` particles at `origin`
pub fn burst(state: &mut GameState, origin: Vec2, kind: ParticleKind) {
    for _ in 0..kind.burst_size() {
        if state.particles.len() >= state.particle_cap {
            break;
        }
        let vel = match kind {
            // Kicked backward/forward and up, never down
            ParticleKind::Dust => Vec2::new(state.spread(1.5), -state.unit() * 2.0),
            ParticleKind::Sparkle => Vec2::new(state.spread(3.0), state.spread(3.0)),
            ParticleKind::Shard => Vec2::new(state.spread(5.0), state.spread(5.0)),
        };
        state.particles.push(Particle {
            pos: origin,
            vel,
            life: kind.lifetime(),
            kind,
        });
    }
}

/// Integrate, age and cull every particle
pub fn update(particles: &mut Vec<Particle>) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel;
        particle.vel.y += PARTICLE_DRIFT;
        particle.life -= 1;
    }
    particles.retain(|p| p.life > 0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    #[test]
    fn test_burst_sizes_and_ranges() {
        let mut state = GameState::new(3, Tuning::default());
        burst(&mut state, Vec2::new(70.0, 168.0), ParticleKind::Dust);
        assert_eq!(state.particles.len(), 6);
        for p in &state.particles {
            assert!(p.vel.x.abs() <= 1.5);
            assert!(p.vel.y <= 0.0 && p.vel.y > -2.0);
            assert_eq!(p.life, 15);
        }

        burst(&mut state, Vec2::ZERO, ParticleKind::Shard);
        assert_eq!(state.particles.len(), 21);
        assert!(state.particles[6..].iter().all(|p| p.vel.abs().max_element() <= 5.0));
    }

    #[test]
    fn test_cap_drops_excess() {
        let mut state = GameState::new(3, Tuning::default());
        state.particle_cap = 10;
        burst(&mut state, Vec2::ZERO, ParticleKind::Sparkle);
        burst(&mut state, Vec2::ZERO, ParticleKind::Sparkle);
        assert_eq!(state.particles.len(), 10);
    }

    #[test]
    fn test_update_drifts_down_and_expires() {
        let mut particles = vec![Particle {
            pos: Vec2::new(10.0, 10.0),
            vel: Vec2::new(1.0, -1.0),
            life: 2,
            kind: ParticleKind::Sparkle,
        }];
        update(&mut particles);
        assert_eq!(particles[0].pos, Vec2::new(11.0, 9.0));
        assert!((particles[0].vel.y - (-0.8)).abs() < 1e-6);
        assert_eq!(particles[0].life, 1);
        update(&mut particles);
        assert!(particles.is_empty());
    }

    proptest! {
        #[test]
        fn prop_life_only_decreases(seed in any::<u64>(), ticks in 1usize..40) {
            let mut state = GameState::new(seed, Tuning::default());
            burst(&mut state, Vec2::new(200.0, 100.0), ParticleKind::Shard);
            let mut previous: Vec<i32> = state.particles.iter().map(|p| p.life).collect();
            for _ in 0..ticks {
                update(&mut state.particles);
                let lives: Vec<i32> = state.particles.iter().map(|p| p.life).collect();
                prop_assert!(lives.iter().all(|&l| l > 0));
                // Same burst, same age: every survivor is exactly one tick older
                for (now, before) in lives.iter().zip(previous.iter()) {
                    prop_assert_eq!(*now, before - 1);
                }
                previous = lives;
            }
            prop_assert!(state.particles.iter().all(|p| p.alpha() <= 1.0));
        }
    }
}
