//! Demo-mode pilot
//!
//! Produces the same kind of input a player would, from the state alone, so
//! a run driven by it stays deterministic.

use super::state::{GamePhase, GameState};
use super::tick::TickInput;
use crate::config::Config;

/// How far ahead of the player (px) an enemy starts to matter
const ENEMY_LOOKAHEAD: f32 = 220.0;

/// Choose this tick's input
///
/// `auto_restart` makes the pilot start a new run after a game over.
pub fn autopilot_input(state: &GameState, config: &Config, auto_restart: bool) -> TickInput {
    match state.phase {
        GamePhase::Start => TickInput {
            flap: true,
            ..Default::default()
        },
        GamePhase::GameOver => TickInput {
            restart: auto_restart,
            ..Default::default()
        },
        GamePhase::Playing => {
            let target = target_height(state, config);
            let player = &state.player;
            // Flap when below the target and not already climbing
            let flap = player.pos.y > target && player.vel >= 0.0;
            TickInput {
                flap,
                ..Default::default()
            }
        }
    }
}

/// Height the pilot wants to be at
fn target_height(state: &GameState, config: &Config) -> f32 {
    let player = &state.player;
    let half = player.size / 2.0;

    // Centre of the next wall pair we have not cleared yet, biased low since
    // a flap lifts us quickly
    let mut target = state
        .obstacles
        .iter()
        .filter(|o| o.right() + half >= player.pos.x)
        .min_by(|a, b| a.x.total_cmp(&b.x))
        .map(|o| o.gap_center + o.gap_height * 0.2)
        .unwrap_or(config.sky_height() / 2.0);

    // Dodge the closest enemy ahead by aiming away from it
    let threat = state
        .enemies
        .iter()
        .filter(|e| {
            let dx = e.pos.x - player.pos.x;
            dx > -e.size && dx < ENEMY_LOOKAHEAD
        })
        .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x));
    if let Some(enemy) = threat {
        let clearance = (enemy.size + player.size) / 2.0 + config.hitbox_margin;
        if (enemy.pos.y - target).abs() < clearance {
            target = if enemy.pos.y > target {
                enemy.pos.y - clearance
            } else {
                enemy.pos.y + clearance
            };
        }
    }

    target.clamp(half, config.sky_height() - half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::tick;

    #[test]
    fn test_start_and_restart() {
        let config = Config::default();
        let mut state = GameState::new(3, &config);
        assert!(autopilot_input(&state, &config, false).flap);

        state.phase = GamePhase::GameOver;
        assert!(!autopilot_input(&state, &config, false).restart);
        assert!(autopilot_input(&state, &config, true).restart);
    }

    #[test]
    fn test_flaps_when_low() {
        let config = Config::default();
        let mut state = GameState::new(3, &config);
        state.phase = GamePhase::Playing;
        state.player.pos.y = config.sky_height() - 40.0;
        state.player.vel = 10.0;
        assert!(autopilot_input(&state, &config, false).flap);

        state.player.pos.y = 60.0;
        assert!(!autopilot_input(&state, &config, false).flap);
    }

    #[test]
    fn test_pilot_survives_a_while() {
        let config = Config::default();
        let mut state = GameState::new(2024, &config);
        for _ in 0..(60 * 8) {
            let input = autopilot_input(&state, &config, false);
            tick(&mut state, &config, &input, SIM_DT);
        }
        // It does not have to be perfect, only better than free fall
        assert!(state.score >= 1, "score {}", state.score);
    }
}
