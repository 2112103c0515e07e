//! Terminal rendering module
//!
//! Draws the game into a pixel buffer, two pixels per character cell.

pub mod pixel_buf;
pub mod scene;

pub use pixel_buf::{PixelBuf, Rgb};
pub use scene::draw;
