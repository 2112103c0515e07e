//! Game state and core simulation types
//!
//! Everything one play session owns lives in [`GameState`]; nothing is global.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{Aabb, CollisionResult};
use crate::config::Config;
use crate::consts::GROUND_PATTERN_WIDTH;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Player hovers at the spawn point, waiting for the first flap
    Start,
    /// Active gameplay
    Playing,
    /// Simulation frozen, waiting for restart
    GameOver,
}

/// Things that happened during a tick, drained by the frame loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Flap,
    Scored { score: u32 },
    EnemySpawned { id: u32 },
    Collision(CollisionResult),
    /// Emitted once, on the tick that entered `GameOver`
    GameOver { score: u32 },
}

/// The bird
#[derive(Debug, Clone)]
pub struct Player {
    /// Hitbox centre; x never changes during a session
    pub pos: Vec2,
    /// Vertical velocity (positive = downward)
    pub vel: f32,
    pub size: f32,
}

impl Player {
    pub fn new(config: &Config) -> Self {
        Self {
            pos: config.player_start(),
            vel: 0.0,
            size: config.player_size,
        }
    }

    /// Integrate gravity over one step
    pub fn apply_gravity(&mut self, gravity: f32, dt: f32) {
        self.vel += gravity * dt;
        self.pos.y += self.vel * dt;
    }

    /// Impulse: replaces the current velocity
    pub fn flap(&mut self, strength: f32) {
        self.vel = -strength;
    }

    /// Keep the sprite below `ceiling`, cancelling upward motion
    pub fn clamp_to_ceiling(&mut self, ceiling: f32) {
        let half = self.size / 2.0;
        if self.pos.y - half < ceiling {
            self.pos.y = ceiling + half;
            self.vel = self.vel.max(0.0);
        }
    }

    /// Full sprite rectangle
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(self.size))
    }

    /// Forgiving collision rectangle
    pub fn hitbox(&self, margin: f32) -> Aabb {
        self.bounds().shrink(margin)
    }
}

/// A wall pair with a gap the player has to fly through
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub width: f32,
    pub gap_center: f32,
    pub gap_height: f32,
    /// Top of the ground; the bottom wall extends down to here
    pub floor_y: f32,
    /// Set once when the player gets past this obstacle
    pub passed: bool,
}

impl Obstacle {
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn gap_top(&self) -> f32 {
        self.gap_center - self.gap_height / 2.0
    }

    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_center + self.gap_height / 2.0
    }

    /// Wall hanging from the ceiling down to the gap
    pub fn top_wall(&self) -> Aabb {
        Aabb::new(Vec2::new(self.x, 0.0), Vec2::new(self.right(), self.gap_top()))
    }

    /// Wall standing on the ground up to the gap
    pub fn bottom_wall(&self) -> Aabb {
        Aabb::new(
            Vec2::new(self.x, self.gap_bottom()),
            Vec2::new(self.right(), self.floor_y),
        )
    }
}

/// A flying hazard with its own bobbing flight path
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    /// Centre
    pub pos: Vec2,
    pub vel: Vec2,
    /// Centre line of the bob
    pub base_y: f32,
    pub bob_phase: f32,
    pub size: f32,
}

impl Enemy {
    /// Fly one step: horizontal drift plus a sinusoidal bob
    pub fn advance(&mut self, dt: f32, amplitude: f32, frequency: f32) {
        self.pos.x += self.vel.x * dt;
        self.bob_phase = (self.bob_phase + frequency * dt) % std::f32::consts::TAU;
        self.pos.y = self.base_y + amplitude * self.bob_phase.sin();
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(self.size))
    }
}

/// Which scenery a background layer draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    FarHills,
    NearHills,
    Ground,
}

/// A horizontally tiling scenery layer
#[derive(Debug, Clone)]
pub struct BackgroundLayer {
    pub kind: LayerKind,
    /// Scroll position within one tile, always in `[0, tile_width)`
    pub offset: f32,
    /// Speed relative to the foreground scroll
    pub ratio: f32,
    pub tile_width: f32,
}

impl BackgroundLayer {
    pub fn new(kind: LayerKind, ratio: f32, tile_width: f32) -> Self {
        Self {
            kind,
            offset: 0.0,
            ratio,
            tile_width,
        }
    }

    /// Advance by the layer's share of a foreground scroll distance
    pub fn scroll(&mut self, foreground_distance: f32) {
        self.offset = crate::wrap(self.offset + foreground_distance * self.ratio, self.tile_width);
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub phase: GamePhase,
    /// Obstacles passed this session
    pub score: u32,
    /// Best score known to this process (mirrors the persisted value)
    pub best: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    /// Active obstacles, oldest first
    pub obstacles: Vec<Obstacle>,
    /// Active enemies, oldest first
    pub enemies: Vec<Enemy>,
    /// Back-to-front scenery
    pub layers: Vec<BackgroundLayer>,
    /// Distance scrolled since the last obstacle spawned
    pub obstacle_travel: f32,
    /// Seconds until the next enemy
    pub enemy_timer: f32,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh session with the given seed
    pub fn new(seed: u64, config: &Config) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Start,
            score: 0,
            best: 0,
            time_ticks: 0,
            player: Player::new(config),
            obstacles: Vec::new(),
            enemies: Vec::new(),
            layers: Vec::new(),
            obstacle_travel: 0.0,
            enemy_timer: 0.0,
            events: Vec::new(),
            next_id: 1,
        };
        state.reset(config);
        state
    }

    /// Back to `Start` with a clean field; RNG stream and best score carry over
    pub fn reset(&mut self, config: &Config) {
        self.phase = GamePhase::Start;
        self.score = 0;
        self.player = Player::new(config);
        self.obstacles.clear();
        self.enemies.clear();
        self.layers = vec![
            BackgroundLayer::new(LayerKind::FarHills, config.parallax_far, config.screen_width),
            BackgroundLayer::new(LayerKind::NearHills, config.parallax_near, config.screen_width),
            BackgroundLayer::new(LayerKind::Ground, 1.0, GROUND_PATTERN_WIDTH),
        ];
        self.obstacle_travel = 0.0;
        self.enemy_timer = self.next_enemy_delay(config);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Draw the wait before the next enemy appears
    pub fn next_enemy_delay(&mut self, config: &Config) -> f32 {
        if config.enemy_spawn_max > config.enemy_spawn_min {
            self.rng
                .random_range(config.enemy_spawn_min..=config.enemy_spawn_max)
        } else {
            config.enemy_spawn_min
        }
    }

    /// Uniform draw in `[lo, hi]`, or `lo` when the range is empty
    pub fn random_in(&mut self, lo: f32, hi: f32) -> f32 {
        if hi > lo {
            self.rng.random_range(lo..=hi)
        } else {
            lo
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let config = Config::default();
        let state = GameState::new(7, &config);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
        assert!(state.enemies.is_empty());
        assert_eq!(state.layers.len(), 3);
        assert_eq!(state.player.vel, 0.0);
        assert!(state.enemy_timer >= config.enemy_spawn_min);
        assert!(state.enemy_timer <= config.enemy_spawn_max);
    }

    #[test]
    fn test_flap_replaces_velocity() {
        let mut player = Player::new(&Config::default());
        player.vel = 1234.0;
        player.flap(390.0);
        assert_eq!(player.vel, -390.0);
        player.vel = -50.0;
        player.flap(390.0);
        assert_eq!(player.vel, -390.0);
    }

    #[test]
    fn test_clamp_to_ceiling() {
        let mut player = Player::new(&Config::default());
        player.pos.y = -10.0;
        player.vel = -300.0;
        player.clamp_to_ceiling(0.0);
        assert_eq!(player.pos.y, player.size / 2.0);
        assert_eq!(player.vel, 0.0);
    }

    #[test]
    fn test_obstacle_walls() {
        let o = Obstacle {
            id: 1,
            x: 100.0,
            width: 80.0,
            gap_center: 250.0,
            gap_height: 100.0,
            floor_y: 500.0,
            passed: false,
        };
        assert_eq!(o.center_x(), 140.0);
        assert_eq!(o.top_wall().max.y, 200.0);
        assert_eq!(o.bottom_wall().min.y, 300.0);
        assert_eq!(o.bottom_wall().max.y, 500.0);
        assert_eq!(o.right(), 180.0);
    }

    #[test]
    fn test_layer_wraps() {
        let mut layer = BackgroundLayer::new(LayerKind::FarHills, 0.5, 100.0);
        layer.scroll(150.0);
        assert!((layer.offset - 75.0).abs() < 1e-4);
        layer.scroll(100.0);
        assert!((layer.offset - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_enemy_bob_stays_in_amplitude() {
        let mut enemy = Enemy {
            id: 1,
            pos: Vec2::new(800.0, 200.0),
            vel: Vec2::new(-180.0, 0.0),
            base_y: 200.0,
            bob_phase: 0.0,
            size: 60.0,
        };
        for _ in 0..200 {
            enemy.advance(1.0 / 60.0, 24.0, 2.0);
            assert!((enemy.pos.y - 200.0).abs() <= 24.0 + 1e-3);
        }
        assert!((enemy.pos.x - (800.0 - 180.0 * 200.0 / 60.0)).abs() < 0.1);
    }

    #[test]
    fn test_drain_events() {
        let mut state = GameState::new(1, &Config::default());
        state.push_event(GameEvent::Flap);
        assert_eq!(state.drain_events(), vec![GameEvent::Flap]);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_same_seed_same_enemy_timer() {
        let config = Config::default();
        let a = GameState::new(99, &config);
        let b = GameState::new(99, &config);
        assert_eq!(a.enemy_timer, b.enemy_timer);
    }
}
