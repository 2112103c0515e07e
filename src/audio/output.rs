//! Speaker output
//!
//! Each cue gets its own detached sink on the default device's mixer; the
//! background tune loops on a sink of its own so mute can pause it.

#[cfg(feature = "playback")]
use std::collections::HashMap;

#[cfg(feature = "playback")]
use rodio::{OutputStream, OutputStreamBuilder, Sink, Source, buffer::SamplesBuffer};

use super::SoundEffect;
#[cfg(feature = "playback")]
use super::synth::{self, SAMPLE_RATE};

/// Volume of the looping background tune relative to effects
#[cfg(feature = "playback")]
const MUSIC_VOLUME: f32 = 0.3;

/// Open audio device with pre-rendered cues
#[cfg(feature = "playback")]
pub struct AudioOutput {
    stream: OutputStream,
    music: Sink,
    cues: HashMap<SoundEffect, Vec<f32>>,
}

#[cfg(feature = "playback")]
impl AudioOutput {
    /// Open the default output device; `None` when there is none
    pub fn open() -> Option<Self> {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                log::warn!("No audio device ({}), falling back to the terminal bell", e);
                return None;
            }
        };
        // The stream would otherwise print to stderr when dropped
        stream.log_on_drop(false);

        let music = Sink::connect_new(stream.mixer());
        music.set_volume(MUSIC_VOLUME);
        music.append(SamplesBuffer::new(1, SAMPLE_RATE, synth::music_loop()).repeat_infinite());
        music.pause();

        log::info!("Audio output opened at {} Hz", SAMPLE_RATE);
        Some(Self {
            stream,
            music,
            cues: render_cues(),
        })
    }

    /// Fire and forget one cue
    pub fn play(&self, effect: SoundEffect) {
        let Some(samples) = self.cues.get(&effect) else {
            return;
        };
        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples.clone()));
        sink.detach();
    }

    pub fn set_music(&self, playing: bool) {
        if playing {
            self.music.play();
        } else {
            self.music.pause();
        }
    }
}

/// Stand-in when built without the `playback` feature; never opens
#[cfg(not(feature = "playback"))]
pub struct AudioOutput;

#[cfg(not(feature = "playback"))]
impl AudioOutput {
    pub fn open() -> Option<Self> {
        log::info!("Built without audio playback, using the terminal bell");
        None
    }

    pub fn play(&self, _effect: SoundEffect) {}

    pub fn set_music(&self, _playing: bool) {}
}

#[cfg(feature = "playback")]
fn render_cues() -> HashMap<SoundEffect, Vec<f32>> {
    SoundEffect::ALL
        .into_iter()
        .map(|effect| (effect, synth::render(effect)))
        .collect()
}
