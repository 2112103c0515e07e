//! Platform abstraction layer
//!
//! Handles terminal specifics for:
//! - Frame timing (fixed timestep accumulator)
//! - Input events

pub mod clock;
pub mod input;

pub use clock::FrameClock;
pub use input::{Command, InputLatch, map_event};
