//! Property tests for the simulation and high score store

use flappy_arcade::consts::SIM_DT;
use flappy_arcade::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use flappy_arcade::{Config, HighScore};
use proptest::prelude::*;

fn playing_state(seed: u64, config: &Config) -> GameState {
    let mut state = GameState::new(seed, config);
    state.phase = GamePhase::Playing;
    state
}

fn flap_inputs(pattern: &[bool]) -> Vec<TickInput> {
    pattern
        .iter()
        .map(|&flap| TickInput {
            flap,
            restart: false,
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn unflapped_player_falls_every_tick(seed in any::<u64>(), dt in 0.01f32..=0.05) {
        let config = Config::default();
        let mut state = playing_state(seed, &config);
        let mut last_y = state.player.pos.y;
        for _ in 0..400 {
            tick(&mut state, &config, &TickInput::default(), dt);
            prop_assert!(state.player.pos.y > last_y);
            last_y = state.player.pos.y;
            if state.phase == GamePhase::GameOver {
                break;
            }
        }
        prop_assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn flap_replaces_velocity(prior in -2000.0f32..2000.0, strength in 1.0f32..1000.0) {
        let config = Config {
            flap_strength: strength,
            ..Config::default()
        };
        let mut state = playing_state(3, &config);
        state.player.vel = prior;
        let input = TickInput { flap: true, restart: false };
        tick(&mut state, &config, &input, SIM_DT);
        prop_assert_eq!(state.player.vel, -strength);
    }

    #[test]
    fn each_obstacle_scores_once(seed in any::<u64>(), pattern in prop::collection::vec(any::<bool>(), 600)) {
        let config = Config::default();
        let mut state = playing_state(seed, &config);
        let mut scored = 0u32;
        for input in flap_inputs(&pattern) {
            tick(&mut state, &config, &input, SIM_DT);
            for event in state.drain_events() {
                if let GameEvent::Scored { score } = event {
                    scored += 1;
                    prop_assert_eq!(score, scored);
                }
            }
            for obstacle in &state.obstacles {
                if obstacle.passed {
                    prop_assert!(obstacle.center_x() < state.player.pos.x);
                }
            }
            if state.phase == GamePhase::GameOver {
                break;
            }
        }
        prop_assert_eq!(state.score, scored);
    }

    #[test]
    fn same_seed_same_run(seed in any::<u64>(), pattern in prop::collection::vec(any::<bool>(), 300)) {
        let config = Config::default();
        let inputs = flap_inputs(&pattern);
        let mut a = playing_state(seed, &config);
        let mut b = playing_state(seed, &config);
        for input in &inputs {
            tick(&mut a, &config, input, SIM_DT);
            tick(&mut b, &config, input, SIM_DT);
        }
        prop_assert_eq!(a.phase, b.phase);
        prop_assert_eq!(a.score, b.score);
        prop_assert_eq!(a.player.pos, b.player.pos);
        prop_assert_eq!(a.obstacles.len(), b.obstacles.len());
        for (oa, ob) in a.obstacles.iter().zip(&b.obstacles) {
            prop_assert_eq!(oa.gap_center, ob.gap_center);
            prop_assert_eq!(oa.x, ob.x);
        }
        prop_assert_eq!(a.enemies.len(), b.enemies.len());
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            prop_assert_eq!(ea.pos, eb.pos);
        }
    }

    #[test]
    fn highscore_record_is_idempotent(first in 0u32..10_000, second in 0u32..10_000, case in any::<u32>()) {
        let path = std::env::temp_dir().join(format!(
            "flappy-arcade-prop-{}-{}.txt",
            std::process::id(),
            case
        ));
        let _ = std::fs::remove_file(&path);

        let mut store = HighScore::load(&path);
        let wrote_first = store.record(first).unwrap();
        prop_assert_eq!(wrote_first, first > 0);
        let wrote_again = store.record(first).unwrap();
        prop_assert!(!wrote_again);

        store.record(second).unwrap();
        let expected = first.max(second);
        prop_assert_eq!(store.best(), expected);
        prop_assert_eq!(HighScore::load(&path).best(), expected);

        let _ = std::fs::remove_file(&path);
    }
}
