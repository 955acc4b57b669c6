//! Frame painting
//!
//! Draws a [`GameState`] back to front: sky, sun, parallax layers, ground,
//! player, coins, hazards, obstacles, particles, milestone banner and HUD.
//! Rendering reads the state and never mutates it.

use std::f32::consts::TAU;

use super::sprites::{self, Sprite};
use super::{Color, DrawContext, LinearGradient, TextAlign, fill_circle, fill_ellipse, palette};
use crate::consts::*;
use crate::lerp;
use crate::settings::{QualityPreset, Settings};
use crate::sim::{
    Cloud, Coin, GameState, Hazard, MilestoneBanner, Mountain, ObstacleKind, ParticleKind, Pose,
};
use crate::tuning::Tuning;

const SUN_POS: (f32, f32) = (350.0, 35.0);
const PARTICLE_SIZE: f32 = 4.0;
/// HUD score column, measured from the right edge
const HUD_SCORE_INSET: f32 = 75.0;
const BANNER_FONT_PX: f32 = 24.0;

/// Paint one frame of a session
pub fn render(ctx: &mut dyn DrawContext, state: &GameState, settings: &Settings) {
    draw_sky(
        ctx,
        &[
            (0.0, palette::WHITE),
            (0.6, palette::SKY_MID),
            (1.0, palette::SKY_LOW),
        ],
    );
    draw_sun(ctx);

    if settings.parallax() {
        for mountain in &state.mountains {
            draw_mountain(ctx, mountain);
        }
        for cloud in &state.clouds {
            draw_cloud(ctx, cloud);
        }
    }

    draw_ground(ctx);
    ctx.set_fill(palette::BRAND_BLUE.with_alpha(0.3));
    for tile in state.ground.iter().filter(|t| t.detail) {
        ctx.fill_rect(tile.x, GROUND_LINE + 5.0, 3.0, 3.0);
    }

    draw_player(ctx, state.player.x, state.player.y, state.player.pose());

    let rim = settings.quality == QualityPreset::High;
    // A coin is still painted on the frame it was picked up
    for coin in state.coins.iter().filter(|c| c.visible_at(state.frame_count)) {
        draw_coin(ctx, coin, rim);
    }
    for hazard in &state.hazards {
        draw_hazard(ctx, hazard);
    }
    for obstacle in state.obstacles.iter().chain(&state.wrecks) {
        draw_obstacle(ctx, obstacle.x, obstacle.kind);
    }

    if settings.particles {
        for particle in &state.particles {
            let color = match particle.kind {
                ParticleKind::Sparkle => palette::GOLD,
                ParticleKind::Dust | ParticleKind::Shard => palette::BRAND_BLUE,
            };
            ctx.set_fill(color.with_alpha(particle.alpha()));
            ctx.fill_rect(particle.pos.x, particle.pos.y, PARTICLE_SIZE, PARTICLE_SIZE);
        }
    }

    if let Some(banner) = &state.banner {
        draw_banner(ctx, banner, &state.tuning, settings.reduced_motion);
    }

    draw_hud(ctx, state.score, state.coin_count, settings.show_coins);
}

/// Static scene shown while no session is running
pub fn render_preview(ctx: &mut dyn DrawContext) {
    draw_sky(ctx, &[(0.0, palette::WHITE), (1.0, palette::SKY_PREVIEW)]);
    draw_sun(ctx);
    draw_mountain(
        ctx,
        &Mountain {
            x: 50.0,
            height: 60.0,
            width: 120.0,
        },
    );
    draw_mountain(
        ctx,
        &Mountain {
            x: 200.0,
            height: 80.0,
            width: 150.0,
        },
    );
    draw_cloud_at(ctx, 100.0, 25.0, 1.0);
    draw_cloud_at(ctx, 280.0, 40.0, 0.8);
    draw_ground(ctx);

    draw_player(ctx, PLAYER_X, PLAYER_GROUND_Y, Pose::StrideA);
    draw_obstacle(ctx, 300.0, ObstacleKind::Small);

    ctx.set_fill(palette::BRAND_BLUE.with_alpha(0.6));
    ctx.set_font(14.0, true);
    ctx.set_text_align(TextAlign::Center);
    ctx.fill_text("TAP TO JUMP", WORLD_WIDTH / 2.0, 100.0);
    ctx.set_text_align(TextAlign::Left);
}

fn draw_sky(ctx: &mut dyn DrawContext, stops: &[(f32, Color)]) {
    ctx.set_fill_gradient(&LinearGradient::vertical(WORLD_HEIGHT, stops));
    ctx.fill_rect(0.0, 0.0, WORLD_WIDTH, WORLD_HEIGHT);
}

fn draw_sun(ctx: &mut dyn DrawContext) {
    let (x, y) = SUN_POS;
    ctx.set_fill(palette::SUN.with_alpha(0.15));
    fill_circle(ctx, x, y, 30.0);
    ctx.set_fill(palette::SUN.with_alpha(0.4));
    fill_circle(ctx, x, y, 18.0);
}

fn draw_mountain(ctx: &mut dyn DrawContext, mountain: &Mountain) {
    ctx.set_fill(palette::BRAND_BLUE.with_alpha(0.06));
    ctx.begin_path();
    ctx.move_to(mountain.x, GROUND_LINE);
    ctx.line_to(mountain.x + mountain.width / 2.0, GROUND_LINE - mountain.height);
    ctx.line_to(mountain.x + mountain.width, GROUND_LINE);
    ctx.close_path();
    ctx.fill();
}

fn draw_cloud(ctx: &mut dyn DrawContext, cloud: &Cloud) {
    draw_cloud_at(ctx, cloud.pos.x, cloud.pos.y, cloud.size);
}

/// Three overlapping puffs filled as one path
fn draw_cloud_at(ctx: &mut dyn DrawContext, x: f32, y: f32, size: f32) {
    let s = size * 8.0;
    ctx.set_fill(palette::BRAND_BLUE.with_alpha(0.08));
    ctx.begin_path();
    ctx.arc(x + s, y + s, s, 0.0, TAU);
    ctx.arc(x + s * 2.0, y + s * 0.7, s * 1.2, 0.0, TAU);
    ctx.arc(x + s * 3.0, y + s, s, 0.0, TAU);
    ctx.fill();
}

fn draw_ground(ctx: &mut dyn DrawContext) {
    ctx.set_fill(palette::BRAND_BLUE.with_alpha(0.1));
    ctx.fill_rect(0.0, GROUND_LINE, WORLD_WIDTH, GROUND_BAND);
    ctx.set_fill(palette::BRAND_BLUE);
    ctx.fill_rect(0.0, GROUND_LINE, WORLD_WIDTH, 2.0);
}

fn draw_player(ctx: &mut dyn DrawContext, x: f32, y: f32, pose: Pose) {
    ctx.set_fill(palette::BRAND_BLUE.with_alpha(0.2));
    fill_ellipse(ctx, x + PLAYER_WIDTH / 2.0, GROUND_LINE, 18.0, 6.0);

    let sprite = match pose {
        Pose::Stand => sprites::DINO_STAND,
        Pose::StrideA => sprites::DINO_STRIDE_A,
        Pose::StrideB => sprites::DINO_STRIDE_B,
    };
    ctx.set_fill(palette::BRAND_BLUE);
    sprite.draw(ctx, x, y, PIXEL);

    // Eye highlight
    ctx.set_fill(palette::WHITE);
    ctx.fill_rect(x + 9.0 * PIXEL, y + 2.0 * PIXEL, PIXEL * 0.5, PIXEL * 0.5);
}

fn draw_coin(ctx: &mut dyn DrawContext, coin: &Coin, rim: bool) {
    let bob = (coin.frame as f32 * 0.2).sin() * 3.0;
    let half = COIN_SIZE / 2.0;
    let (cx, cy) = (coin.x + half, coin.y + half + bob);

    ctx.set_fill(palette::SUN.with_alpha(0.3));
    fill_circle(ctx, cx, cy, 12.0);
    ctx.set_fill(palette::GOLD);
    fill_circle(ctx, cx, cy, half);
    if rim {
        ctx.set_stroke(palette::GOLD_RIM, 1.0);
        ctx.begin_path();
        ctx.arc(cx, cy, half, 0.0, TAU);
        ctx.stroke();
    }
    ctx.set_fill(palette::CORNSILK);
    fill_circle(ctx, coin.x + 5.0, coin.y + 5.0 + bob, 3.0);
}

fn draw_hazard(ctx: &mut dyn DrawContext, hazard: &Hazard) {
    let sprite = if hazard.frame % 20 < 10 {
        sprites::BIRD_WINGS_UP
    } else {
        sprites::BIRD_WINGS_DOWN
    };
    ctx.set_fill(palette::BRAND_BLUE);
    sprite.draw(ctx, hazard.x, hazard.y, PIXEL);
}

fn draw_obstacle(ctx: &mut dyn DrawContext, x: f32, kind: ObstacleKind) {
    ctx.set_fill(palette::BRAND_BLUE.with_alpha(0.15));
    fill_ellipse(ctx, x + 12.0, GROUND_LINE + 2.0, 10.0, 4.0);

    let sprite: Sprite = match kind {
        ObstacleKind::Small => sprites::CACTUS_SMALL,
        ObstacleKind::Large => sprites::CACTUS_LARGE,
    };
    ctx.set_fill(palette::BRAND_BLUE);
    sprite.draw(ctx, x, OBSTACLE_BASE_Y + kind.sprite_offset_y(), PIXEL);
}

/// Banner opacity and scale for the current tick of its window
pub fn banner_transform(
    banner: &MilestoneBanner,
    tuning: &Tuning,
    reduced_motion: bool,
) -> (f32, f32) {
    let elapsed = tuning.milestone_display_ticks.saturating_sub(banner.timer);
    let progress = (elapsed as f32 / tuning.milestone_intro_ticks() as f32).min(1.0);
    let scale = if reduced_motion {
        1.0
    } else {
        lerp(0.5, 1.0, progress)
    };
    (progress, scale)
}

fn draw_banner(
    ctx: &mut dyn DrawContext,
    banner: &MilestoneBanner,
    tuning: &Tuning,
    reduced_motion: bool,
) {
    let (alpha, scale) = banner_transform(banner, tuning, reduced_motion);
    ctx.save();
    ctx.set_global_alpha(alpha);
    ctx.set_fill(palette::GOLD);
    ctx.set_font(BANNER_FONT_PX * scale, true);
    ctx.set_text_align(TextAlign::Center);
    ctx.fill_text(
        &format!("🎉 {} POINTS! 🎉", banner.score),
        WORLD_WIDTH / 2.0,
        100.0,
    );
    ctx.restore();
}

fn draw_hud(ctx: &mut dyn DrawContext, score: u64, coins: u32, show_coins: bool) {
    let x = WORLD_WIDTH - HUD_SCORE_INSET;
    ctx.set_fill(palette::BRAND_BLUE);
    ctx.set_font(14.0, true);
    ctx.fill_text("SCORE", x, 18.0);
    ctx.set_font(20.0, true);
    ctx.fill_text(&score.to_string(), x, 38.0);

    if show_coins {
        ctx.set_font(16.0, true);
        ctx.set_fill(palette::GOLD);
        ctx.fill_text(&format!("🪙 {}", coins), 15.0, 25.0);
    }
}
