//! Game tunables
//!
//! Loaded once from a JSON document at startup. Every key is validated on
//! its own: a missing, non-numeric or non-positive value falls back to the
//! built-in default for that key only.

use std::path::Path;
use std::time::Duration;

use glam::Vec2;
use serde::Serialize;
use serde_json::{Map, Value};

/// Keys understood by the loader (anything else is ignored)
const KNOWN_KEYS: &[&str] = &[
    "screen_width",
    "screen_height",
    "ground_height",
    "player_gravity",
    "flap_strength",
    "obstacle_speed",
    "wall_gap",
    "enemy_speed",
    "obstacle_width",
    "obstacle_spacing",
    "gap_top_margin",
    "gap_bottom_margin",
    "enemy_size",
    "enemy_spawn_min",
    "enemy_spawn_max",
    "enemy_margin",
    "enemy_bob_amplitude",
    "enemy_bob_frequency",
    "player_size",
    "hitbox_margin",
    "parallax_far",
    "parallax_near",
    "fps",
    "ceiling_clamp",
    "sound",
];

/// Immutable game configuration
///
/// Distances are world pixels, times are seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    // === World ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// Height of the ground strip at the bottom of the screen
    pub ground_height: f32,

    // === Player physics ===
    /// Downward acceleration (px/s²)
    pub player_gravity: f32,
    /// Flap impulse magnitude; a flap sets velocity to `-flap_strength`
    pub flap_strength: f32,
    pub player_size: f32,
    /// Shrinks the player hitbox on every side
    pub hitbox_margin: f32,
    /// Stop at the ceiling instead of treating it as a lethal boundary
    pub ceiling_clamp: bool,

    // === Obstacles ===
    pub obstacle_speed: f32,
    /// Vertical opening between the top and bottom wall
    pub wall_gap: f32,
    pub obstacle_width: f32,
    /// Scroll distance between two obstacle spawns
    pub obstacle_spacing: f32,
    pub gap_top_margin: f32,
    pub gap_bottom_margin: f32,

    // === Enemies ===
    pub enemy_speed: f32,
    pub enemy_size: f32,
    pub enemy_spawn_min: f32,
    pub enemy_spawn_max: f32,
    /// Keeps spawned enemies away from the ceiling and the ground
    pub enemy_margin: f32,
    pub enemy_bob_amplitude: f32,
    /// Angular frequency of the bob (rad/s)
    pub enemy_bob_frequency: f32,

    // === Background ===
    pub parallax_far: f32,
    pub parallax_near: f32,

    // === Presentation ===
    pub fps: u32,
    pub sound: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen_width: 800.0,
            screen_height: 600.0,
            ground_height: 100.0,

            player_gravity: 900.0,
            flap_strength: 390.0,
            player_size: 50.0,
            hitbox_margin: 6.0,
            ceiling_clamp: true,

            obstacle_speed: 240.0,
            wall_gap: 170.0,
            obstacle_width: 80.0,
            obstacle_spacing: 360.0,
            gap_top_margin: 150.0,
            gap_bottom_margin: 50.0,

            enemy_speed: 180.0,
            enemy_size: 60.0,
            enemy_spawn_min: 2.5,
            enemy_spawn_max: 3.5,
            enemy_margin: 100.0,
            enemy_bob_amplitude: 24.0,
            enemy_bob_frequency: 2.0,

            parallax_far: 0.25,
            parallax_near: 0.5,

            fps: 60,
            sound: true,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, degrading to defaults on any problem
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::from_json_str(&text);
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!(
                    "Could not read config {}, using defaults: {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Build a configuration from an in-memory JSON document
    pub fn from_json_str(text: &str) -> Self {
        let doc: Value = match serde_json::from_str(text) {
            Ok(doc) => doc,
            Err(e) => {
                log::warn!("Malformed config document, using defaults: {}", e);
                return Self::default();
            }
        };
        let Value::Object(map) = doc else {
            log::warn!("Config document is not an object, using defaults");
            return Self::default();
        };

        for key in map.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                log::debug!("Ignoring unknown config key `{}`", key);
            }
        }

        let d = Self::default();
        let mut config = Self {
            screen_width: positive(&map, "screen_width", d.screen_width),
            screen_height: positive(&map, "screen_height", d.screen_height),
            ground_height: positive(&map, "ground_height", d.ground_height),

            player_gravity: positive(&map, "player_gravity", d.player_gravity),
            flap_strength: positive(&map, "flap_strength", d.flap_strength),
            player_size: positive(&map, "player_size", d.player_size),
            hitbox_margin: positive(&map, "hitbox_margin", d.hitbox_margin),
            ceiling_clamp: flag(&map, "ceiling_clamp", d.ceiling_clamp),

            obstacle_speed: positive(&map, "obstacle_speed", d.obstacle_speed),
            wall_gap: positive(&map, "wall_gap", d.wall_gap),
            obstacle_width: positive(&map, "obstacle_width", d.obstacle_width),
            obstacle_spacing: positive(&map, "obstacle_spacing", d.obstacle_spacing),
            gap_top_margin: positive(&map, "gap_top_margin", d.gap_top_margin),
            gap_bottom_margin: positive(&map, "gap_bottom_margin", d.gap_bottom_margin),

            enemy_speed: positive(&map, "enemy_speed", d.enemy_speed),
            enemy_size: positive(&map, "enemy_size", d.enemy_size),
            enemy_spawn_min: positive(&map, "enemy_spawn_min", d.enemy_spawn_min),
            enemy_spawn_max: positive(&map, "enemy_spawn_max", d.enemy_spawn_max),
            enemy_margin: positive(&map, "enemy_margin", d.enemy_margin),
            enemy_bob_amplitude: positive(&map, "enemy_bob_amplitude", d.enemy_bob_amplitude),
            enemy_bob_frequency: positive(&map, "enemy_bob_frequency", d.enemy_bob_frequency),

            parallax_far: ratio(&map, "parallax_far", d.parallax_far),
            parallax_near: ratio(&map, "parallax_near", d.parallax_near),

            fps: positive(&map, "fps", d.fps as f32).round().max(1.0) as u32,
            sound: flag(&map, "sound", d.sound),
        };
        config.reconcile();
        config
    }

    /// Fix combinations of individually valid values that cannot work together
    fn reconcile(&mut self) {
        if self.ground_height >= self.screen_height {
            log::warn!(
                "ground_height {} leaves no sky in a {}px screen, using {}",
                self.ground_height,
                self.screen_height,
                self.screen_height / 6.0
            );
            self.ground_height = self.screen_height / 6.0;
        }
        if self.enemy_spawn_max < self.enemy_spawn_min {
            log::warn!(
                "enemy_spawn_max {} is below enemy_spawn_min {}, spawning at a fixed interval",
                self.enemy_spawn_max,
                self.enemy_spawn_min
            );
            self.enemy_spawn_max = self.enemy_spawn_min;
        }
    }

    /// Height of the flyable area above the ground
    #[inline]
    pub fn sky_height(&self) -> f32 {
        self.screen_height - self.ground_height
    }

    /// Player hitbox centre at the start of a session
    pub fn player_start(&self) -> Vec2 {
        Vec2::new(
            self.screen_width / 4.0 + self.player_size / 2.0,
            self.screen_height / 2.0 - self.player_size / 2.0,
        )
    }

    /// Wall-clock budget for one rendered frame
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }
}

/// Read a strictly positive number, or fall back to `default`
fn positive(map: &Map<String, Value>, key: &str, default: f32) -> f32 {
    let Some(value) = map.get(key) else {
        return default;
    };
    match value.as_f64().map(|v| v as f32) {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => {
            log::warn!(
                "Config key `{}` = {} is not a positive number, using default {}",
                key,
                value,
                default
            );
            default
        }
    }
}

/// Read a parallax ratio in (0, 1]
fn ratio(map: &Map<String, Value>, key: &str, default: f32) -> f32 {
    let value = positive(map, key, default);
    if value > 1.0 {
        log::warn!(
            "Config key `{}` = {} must not exceed 1, using default {}",
            key,
            value,
            default
        );
        return default;
    }
    value
}

fn flag(map: &Map<String, Value>, key: &str, default: bool) -> bool {
    match map.get(key) {
        None => default,
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            log::warn!(
                "Config key `{}` = {} is not a boolean, using default {}",
                key,
                other,
                default
            );
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_positive() {
        let c = Config::default();
        assert!(c.screen_width > 0.0 && c.screen_height > 0.0);
        assert!(c.player_gravity > 0.0 && c.flap_strength > 0.0);
        assert!(c.parallax_far < 1.0 && c.parallax_near < 1.0);
        assert!(c.sky_height() > 0.0);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("flappy-arcade-no-such-config.json");
        let _ = std::fs::remove_file(&path);
        assert_eq!(Config::load(&path), Config::default());
    }

    #[test]
    fn test_malformed_document_gives_defaults() {
        assert_eq!(Config::from_json_str("{ not json"), Config::default());
        assert_eq!(Config::from_json_str("[1, 2, 3]"), Config::default());
        assert_eq!(Config::from_json_str(""), Config::default());
    }

    #[test]
    fn test_valid_keys_override() {
        let c = Config::from_json_str(
            r#"{"player_gravity": 20, "flap_strength": 8, "obstacle_speed": 3, "wall_gap": 150}"#,
        );
        assert_eq!(c.player_gravity, 20.0);
        assert_eq!(c.flap_strength, 8.0);
        assert_eq!(c.obstacle_speed, 3.0);
        assert_eq!(c.wall_gap, 150.0);
        assert_eq!(c.enemy_speed, Config::default().enemy_speed);
    }

    #[test]
    fn test_bad_key_falls_back_alone() {
        let c = Config::from_json_str(
            r#"{"player_gravity": -1, "flap_strength": "high", "wall_gap": 0, "enemy_speed": 7.5}"#,
        );
        let d = Config::default();
        assert_eq!(c.player_gravity, d.player_gravity);
        assert_eq!(c.flap_strength, d.flap_strength);
        assert_eq!(c.wall_gap, d.wall_gap);
        assert_eq!(c.enemy_speed, 7.5);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let c = Config::from_json_str(r#"{"bird_colour": "yellow", "wall_gap": 200}"#);
        assert_eq!(c.wall_gap, 200.0);
    }

    #[test]
    fn test_ratio_above_one_rejected() {
        let c = Config::from_json_str(r#"{"parallax_far": 1.5, "parallax_near": 0.8}"#);
        assert_eq!(c.parallax_far, Config::default().parallax_far);
        assert_eq!(c.parallax_near, 0.8);
    }

    #[test]
    fn test_flags() {
        let c = Config::from_json_str(r#"{"ceiling_clamp": false, "sound": 1}"#);
        assert!(!c.ceiling_clamp);
        assert!(c.sound);
    }

    #[test]
    fn test_reconcile() {
        let c = Config::from_json_str(
            r#"{"screen_height": 300, "ground_height": 400, "enemy_spawn_min": 4, "enemy_spawn_max": 1}"#,
        );
        assert!(c.ground_height < c.screen_height);
        assert_eq!(c.enemy_spawn_max, 4.0);
    }

    #[test]
    fn test_fps_rounding() {
        let c = Config::from_json_str(r#"{"fps": 29.6}"#);
        assert_eq!(c.fps, 30);
        assert_eq!(c.frame_duration(), Duration::from_secs_f64(1.0 / 30.0));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "flappy-arcade-config-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"enemy_speed": 42}"#).unwrap();
        let c = Config::load(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(c.enemy_speed, 42.0);
    }
}
