//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically.

use glam::Vec2;

use super::collision::{self, CollisionResult, ScreenBounds};
use super::state::{Enemy, GameEvent, GamePhase, GameState, Obstacle};
use crate::config::Config;

/// Input commands for a single tick
///
/// Both fields are one-shot: the frame loop clears them after the tick that
/// consumed them, so a held key never fires twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Flap (space/click); also starts a run from `Start`
    pub flap: bool,
    /// Restart after game over
    pub restart: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, config: &Config, input: &TickInput, dt: f32) {
    if !(dt > 0.0 && dt.is_finite()) {
        return;
    }

    state.time_ticks += 1;

    match state.phase {
        GamePhase::Start => {
            if input.flap {
                state.phase = GamePhase::Playing;
                state.player.flap(config.flap_strength);
                state.push_event(GameEvent::Flap);
                log::debug!("Run started (seed {})", state.seed);
            }
        }

        GamePhase::Playing => step_playing(state, config, input, dt),

        GamePhase::GameOver => {
            if input.restart {
                state.reset(config);
                log::debug!("Restarted, best {}", state.best);
            }
        }
    }
}

fn step_playing(state: &mut GameState, config: &Config, input: &TickInput, dt: f32) {
    // --- PLAYER ---
    state.player.apply_gravity(config.player_gravity, dt);
    if config.ceiling_clamp {
        state.player.clamp_to_ceiling(0.0);
    }
    if input.flap {
        state.player.flap(config.flap_strength);
        state.push_event(GameEvent::Flap);
    }

    // --- SCROLL ---
    let scroll = config.obstacle_speed * dt;
    for obstacle in &mut state.obstacles {
        obstacle.x -= scroll;
    }
    for enemy in &mut state.enemies {
        enemy.advance(dt, config.enemy_bob_amplitude, config.enemy_bob_frequency);
    }
    for layer in &mut state.layers {
        layer.scroll(scroll);
    }

    // --- SPAWN ---
    state.obstacle_travel += scroll;
    // One tick may cross several thresholds when the spacing is tighter than the scroll
    while state.obstacle_travel >= config.obstacle_spacing {
        state.obstacle_travel -= config.obstacle_spacing;
        // Place it where it would be had it spawned exactly on the threshold
        let x = config.screen_width - state.obstacle_travel;
        spawn_obstacle(state, config, x);
    }

    state.enemy_timer -= dt;
    if state.enemy_timer <= 0.0 {
        spawn_enemy(state, config);
        let delay = state.next_enemy_delay(config);
        state.enemy_timer = state.enemy_timer.max(0.0) + delay;
    }

    // --- SCORE ---
    score_passed_obstacles(state);

    // --- CULL ---
    state.obstacles.retain(|o| o.right() >= 0.0);
    state.enemies.retain(|e| e.bounds().max.x >= 0.0);

    // --- COLLISION ---
    let bounds = ScreenBounds {
        ceiling: 0.0,
        ground: config.sky_height(),
    };
    let result = collision::check(
        &state.player,
        &state.obstacles,
        &state.enemies,
        bounds,
        config.hitbox_margin,
    );
    if result.is_hit() {
        end_run(state, result);
    }
}

/// Credit every obstacle whose centre the player has just passed
///
/// The `passed` flag makes this fire once per obstacle.
pub fn score_passed_obstacles(state: &mut GameState) {
    let player_x = state.player.pos.x;
    let mut newly_passed = 0;
    for obstacle in &mut state.obstacles {
        if !obstacle.passed && obstacle.center_x() < player_x {
            obstacle.passed = true;
            newly_passed += 1;
        }
    }
    for _ in 0..newly_passed {
        state.score += 1;
        let score = state.score;
        state.push_event(GameEvent::Scored { score });
    }
}

fn spawn_obstacle(state: &mut GameState, config: &Config, x: f32) {
    let lowest_top = config.sky_height() - config.gap_bottom_margin - config.wall_gap;
    let gap_top = state.random_in(config.gap_top_margin, lowest_top);

    let obstacle = Obstacle {
        id: state.next_entity_id(),
        x,
        width: config.obstacle_width,
        gap_center: gap_top + config.wall_gap / 2.0,
        gap_height: config.wall_gap,
        floor_y: config.sky_height(),
        passed: false,
    };
    log::trace!(
        "Obstacle {} at x={:.1}, gap centre {:.1}",
        obstacle.id,
        obstacle.x,
        obstacle.gap_center
    );
    state.obstacles.push(obstacle);
}

fn spawn_enemy(state: &mut GameState, config: &Config) {
    let sky = config.sky_height();
    let base_y = if sky > 2.0 * config.enemy_margin {
        state.random_in(config.enemy_margin, sky - config.enemy_margin)
    } else {
        sky / 2.0
    };
    let bob_phase = state.random_in(0.0, std::f32::consts::TAU);
    let id = state.next_entity_id();

    let enemy = Enemy {
        id,
        pos: Vec2::new(
            config.screen_width + config.enemy_size / 2.0,
            base_y + config.enemy_bob_amplitude * bob_phase.sin(),
        ),
        vel: Vec2::new(-config.enemy_speed, 0.0),
        base_y,
        bob_phase,
        size: config.enemy_size,
    };
    state.enemies.push(enemy);
    state.push_event(GameEvent::EnemySpawned { id });
}

fn end_run(state: &mut GameState, result: CollisionResult) {
    if let CollisionResult::HitEnemy(id) = result {
        state.enemies.retain(|e| e.id != id);
    }
    state.phase = GamePhase::GameOver;
    state.best = state.best.max(state.score);
    state.push_event(GameEvent::Collision(result));
    state.push_event(GameEvent::GameOver { score: state.score });
    log::info!(
        "Game over: {:?}, score {} (best {})",
        result,
        state.score,
        state.best
    );
}
