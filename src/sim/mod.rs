//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod state;
pub mod tick;

pub use autopilot::autopilot_input;
pub use collision::{Aabb, Boundary, CollisionResult, Hazard, ScreenBounds, check};
pub use state::{
    BackgroundLayer, Enemy, GameEvent, GamePhase, GameState, LayerKind, Obstacle, Player,
};
pub use tick::{TickInput, score_passed_obstacles, tick};
