//! Fixed timestep accumulator

use crate::consts::{MAX_FRAME_TIME, MAX_SUBSTEPS, SIM_DT};

/// Turns variable wall-clock frame times into a whole number of fixed ticks
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `elapsed` seconds and return how many `SIM_DT` ticks to run now
    ///
    /// Long stalls are capped so the game never tries to catch up on
    /// seconds of backlog.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        if elapsed.is_finite() {
            self.accumulator += elapsed.clamp(0.0, MAX_FRAME_TIME);
        }

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            log::debug!("Dropping {:.3}s of simulation backlog", self.accumulator);
            self.accumulator = 0.0;
        }
        substeps
    }

    /// Fraction of a tick left over, in `[0, 1)`
    pub fn alpha(&self) -> f32 {
        self.accumulator / SIM_DT
    }
}
