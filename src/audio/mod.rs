//! Sound cues
//!
//! The simulation only reports events; this module decides which of them
//! make a sound. Cues are synthesized procedurally and played on the audio
//! device, with a quiet tune looping underneath. Without a device the
//! terminal bell stands in for the cues that matter (a crash, the end of a
//! run, a new record). Every cue is logged.

pub mod output;
pub mod synth;

use std::io::{self, Write};

use crate::sim::GameEvent;
pub use output::AudioOutput;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player flapped
    Flap,
    /// Passed a wall pair
    Score,
    /// An enemy entered the screen
    EnemyAppears,
    /// Player hit something
    Hit,
    /// Run ended
    GameOver,
    /// Run beat the stored best
    NewHighScore,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 6] = [
        SoundEffect::Flap,
        SoundEffect::Score,
        SoundEffect::EnemyAppears,
        SoundEffect::Hit,
        SoundEffect::GameOver,
        SoundEffect::NewHighScore,
    ];

    /// Whether the terminal bell should ring for this cue when there is no device
    pub fn rings_bell(&self) -> bool {
        matches!(
            self,
            SoundEffect::Hit | SoundEffect::GameOver | SoundEffect::NewHighScore
        )
    }

    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Flap => Some(SoundEffect::Flap),
            GameEvent::Scored { .. } => Some(SoundEffect::Score),
            GameEvent::EnemySpawned { .. } => Some(SoundEffect::EnemyAppears),
            GameEvent::Collision(_) => Some(SoundEffect::Hit),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
        }
    }
}

/// Audio manager for the game
#[derive(Default)]
pub struct AudioManager {
    enabled: bool,
    muted: bool,
    pending: Vec<SoundEffect>,
    output: Option<AudioOutput>,
}

impl AudioManager {
    /// Queue-only manager; call [`open_output`](Self::open_output) for real sound
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            log::info!("Sound disabled by config");
        }
        Self {
            enabled,
            muted: false,
            pending: Vec::new(),
            output: None,
        }
    }

    /// Try the audio device and start the background tune
    ///
    /// Returns whether a device is in use. Does nothing when sound is disabled.
    pub fn open_output(&mut self) -> bool {
        if self.enabled && self.output.is_none() {
            self.output = AudioOutput::open();
            self.sync_music();
        }
        self.output.is_some()
    }

    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        log::info!("Sound {}", if self.muted { "muted" } else { "unmuted" });
        self.sync_music();
        self.muted
    }

    fn sync_music(&self) {
        if let Some(output) = &self.output {
            output.set_music(!self.muted);
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Queue a sound effect for the next flush
    pub fn play(&mut self, effect: SoundEffect) {
        log::debug!("Sound cue {:?}", effect);
        if self.enabled && !self.muted {
            self.pending.push(effect);
        }
    }

    pub fn on_event(&mut self, event: &GameEvent) {
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
    }

    /// Emit queued cues
    ///
    /// With a device every cue plays; otherwise several bell cues in one
    /// frame ring `out` once.
    pub fn flush(&mut self, out: &mut impl Write) -> io::Result<()> {
        if let Some(output) = &self.output {
            for effect in self.pending.drain(..) {
                output.play(effect);
            }
            return Ok(());
        }
        let ring = self.pending.iter().any(SoundEffect::rings_bell);
        self.pending.clear();
        if ring {
            out.write_all(b"\x07")?;
        }
        Ok(())
    }
}
