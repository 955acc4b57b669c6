//! One simulation tick
//!
//! Advances a running session by exactly one step, in a fixed order:
//! scenery, ground, player, pickups/hazard spawns, coins, hazards,
//! obstacles, particles, then score, milestone and difficulty.

use super::state::{GameEvent, GameState, MilestoneBanner};
use super::{collision, particles, physics, spawn};
use crate::consts::*;

/// Inputs for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Demo mode - the game jumps for the player
    pub autopilot: bool,
}

/// Mountains scroll at this fraction of world speed
const MOUNTAIN_PARALLAX: f32 = 0.1;
/// Clouds wrap once this far past the left edge
const CLOUD_WRAP_MARGIN: f32 = 60.0;
/// Culling thresholds (left edge x at or below which an entity is dropped)
const COIN_CULL_X: f32 = -20.0;
const HAZARD_CULL_X: f32 = -30.0;
const OBSTACLE_CULL_X: f32 = -30.0;

/// Advance the game state by one tick. Does nothing unless running.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if !state.is_running() {
        return;
    }
    state.wrecks.clear();

    if input.autopilot && autopilot_wants_jump(state) {
        physics::jump(state);
    }

    scroll_scenery(state);
    scroll_ground(state);

    let gravity = state.tuning.gravity;
    state.player.integrate(gravity);

    state.frame_count += 1;
    spawn::spawn_coin(state);
    spawn::spawn_hazard(state);

    advance_coins(state);
    collision::collect_coins(state);

    advance_hazards(state);
    collision::check_hazards(state);

    spawn::spawn_obstacle(state);
    advance_obstacles(state);
    collision::check_obstacles(state);

    particles::update(&mut state.particles);

    // The tick that ended the run still counts
    state.score += 1;
    update_milestone(state);
    update_difficulty(state);

    let score = state.score;
    for event in &mut state.events {
        if let GameEvent::SessionEnded { final_score, .. } = event {
            *final_score = score;
        }
    }
}

fn scroll_scenery(state: &mut GameState) {
    for i in 0..state.mountains.len() {
        state.mountains[i].x -= state.speed * MOUNTAIN_PARALLAX;
        if state.mountains[i].x < -state.mountains[i].width {
            let x = WORLD_WIDTH + state.unit() * 100.0;
            let height = 40.0 + state.unit() * 50.0;
            let width = 80.0 + state.unit() * 80.0;
            let mountain = &mut state.mountains[i];
            mountain.x = x;
            mountain.height = height;
            mountain.width = width;
        }
    }

    for i in 0..state.clouds.len() {
        let drift = state.speed * state.clouds[i].speed;
        state.clouds[i].pos.x -= drift;
        if state.clouds[i].pos.x < -CLOUD_WRAP_MARGIN {
            let y = 10.0 + state.unit() * 40.0;
            state.clouds[i].pos = glam::Vec2::new(WORLD_WIDTH + CLOUD_WRAP_MARGIN, y);
        }
    }
}

fn scroll_ground(state: &mut GameState) {
    let chance = state.tuning.ground_detail_chance;
    for i in 0..state.ground.len() {
        state.ground[i].x -= state.speed;
        if state.ground[i].x < -GROUND_TILE_SPACING {
            let detail = state.roll(chance);
            let tile = &mut state.ground[i];
            tile.x = WORLD_WIDTH;
            tile.detail = detail;
        }
    }
}

fn advance_coins(state: &mut GameState) {
    let speed = state.speed;
    for coin in &mut state.coins {
        coin.x -= speed;
        coin.frame = coin.frame.wrapping_add(1);
    }
    state.coins.retain(|c| c.x > COIN_CULL_X);
}

fn advance_hazards(state: &mut GameState) {
    let speed = state.hazard_speed();
    for hazard in &mut state.hazards {
        hazard.x -= speed;
        hazard.frame = hazard.frame.wrapping_add(1);
    }
    state.hazards.retain(|h| h.x > HAZARD_CULL_X);
}

fn advance_obstacles(state: &mut GameState) {
    let speed = state.speed;
    for obstacle in &mut state.obstacles {
        obstacle.x -= speed;
    }
    state.obstacles.retain(|o| o.x > OBSTACLE_CULL_X);
}

/// Fire the banner once per distinct multiple of the interval, then count it down
fn update_milestone(state: &mut GameState) {
    let interval = state.tuning.milestone_interval;
    if state.score % interval == 0 && state.score != state.last_milestone {
        state.last_milestone = state.score;
        state.milestones_reached += 1;
        state.banner = Some(MilestoneBanner {
            score: state.score,
            timer: state.tuning.milestone_display_ticks,
        });
        state.events.push(GameEvent::Milestone { score: state.score });
        log::info!("Milestone: {} points", state.score);
    }

    if let Some(banner) = state.banner.as_mut() {
        banner.timer = banner.timer.saturating_sub(1);
    }
    if state.banner.is_some_and(|b| b.timer == 0) {
        state.banner = None;
    }
}

/// Step the world speed up on every interval, never past the cap
fn update_difficulty(state: &mut GameState) {
    if state.score % state.tuning.milestone_interval != 0 {
        return;
    }
    let next = (state.speed + state.tuning.speed_step).min(state.tuning.max_speed);
    if next > state.speed {
        state.speed = next;
        state.events.push(GameEvent::SpeedUp { speed: next });
        log::debug!("World speed now {:.1}", next);
    }
}

/// Jump when the next cactus is about to reach the player.
///
/// The window opens a few ticks ahead so the player is already clear of the
/// cactus top by the time the boxes line up. Hazards are ignored.
pub fn autopilot_wants_jump(state: &GameState) -> bool {
    const LEAD_TICKS: f32 = 5.0;
    if state.player.jumping {
        return false;
    }
    let front = state.player.obstacle_hitbox().right();
    let window = state.speed * LEAD_TICKS;
    state.obstacles.iter().any(|o| {
        let gap = o.hitbox().x - front;
        gap > 0.0 && gap <= window
    })
}
