//! Flappy Arcade - a forgiving side-scroller for the terminal
//!
//! Core modules:
//! - `app`: Frame loop session tying the simulation to its collaborators
//! - `sim`: Deterministic simulation (physics, spawning, collisions, game phases)
//! - `config`: Data-driven tunables loaded from JSON
//! - `highscore`: Persisted best score
//! - `persistence`: Atomic file writes
//! - `platform`: Frame clock and terminal input mapping
//! - `renderer`: Half-block terminal rendering
//! - `audio`: Sound cues driven by simulation events

pub mod app;
pub mod audio;
pub mod config;
pub mod highscore;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use app::App;
pub use config::Config;
pub use highscore::HighScore;

/// Game loop constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;
    /// Longest wall-clock gap fed into the accumulator (seconds)
    pub const MAX_FRAME_TIME: f32 = 0.25;

    /// Width of one repeat of the ground stripe pattern
    pub const GROUND_PATTERN_WIDTH: f32 = 50.0;
}

/// Wrap `value` into `[0, period)`
#[inline]
pub fn wrap(value: f32, period: f32) -> f32 {
    if period <= 0.0 {
        return 0.0;
    }
    value.rem_euclid(period)
}
