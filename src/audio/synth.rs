//! Procedural sound generation
//!
//! Every cue is a handful of swept, decaying tones rendered to mono `f32`
//! samples with fundsp oscillators. No asset files are needed.

use fundsp::prelude::*;

use super::SoundEffect;

/// Output sample rate for every rendered buffer
pub const SAMPLE_RATE: u32 = 44_100;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Sine,
    Triangle,
    Square,
    Saw,
}

impl Shape {
    fn oscillator(self) -> Box<dyn AudioUnit> {
        match self {
            Shape::Sine => Box::new(sine::<f32>()),
            Shape::Triangle => Box::new(triangle()),
            Shape::Square => Box::new(square()),
            Shape::Saw => Box::new(saw()),
        }
    }
}

/// One note: exponential pitch sweep under an exponential decay
#[derive(Debug, Clone, Copy)]
pub struct Tone {
    /// Seconds from the start of the cue
    pub start: f32,
    pub duration: f32,
    pub freq_from: f32,
    pub freq_to: f32,
    pub gain: f32,
    pub shape: Shape,
}

impl Tone {
    const fn note(start: f32, duration: f32, freq: f32, gain: f32, shape: Shape) -> Self {
        Self {
            start,
            duration,
            freq_from: freq,
            freq_to: freq,
            gain,
            shape,
        }
    }

    const fn sweep(duration: f32, freq_from: f32, freq_to: f32, gain: f32, shape: Shape) -> Self {
        Self {
            start: 0.0,
            duration,
            freq_from,
            freq_to,
            gain,
            shape,
        }
    }

    fn end(&self) -> f32 {
        self.start + self.duration
    }
}

/// Attack ramp that keeps note onsets from clicking
const ATTACK: f32 = 0.005;

/// Render tones into one buffer, clipped to `[-1, 1]`
pub fn render_tones(tones: &[Tone]) -> Vec<f32> {
    let length = tones.iter().map(Tone::end).fold(0.0, f32::max);
    let mut samples = vec![0.0f32; (length * SAMPLE_RATE as f32).ceil() as usize];

    for tone in tones {
        let mut osc = tone.shape.oscillator();
        osc.set_sample_rate(SAMPLE_RATE as f64);
        osc.reset();

        let first = (tone.start * SAMPLE_RATE as f32) as usize;
        let count = (tone.duration * SAMPLE_RATE as f32) as usize;
        let ratio = tone.freq_to / tone.freq_from;
        let mut out = [0.0f32];
        for i in 0..count {
            let Some(slot) = samples.get_mut(first + i) else {
                break;
            };
            let t = i as f32 / SAMPLE_RATE as f32;
            let progress = t / tone.duration;
            let freq = tone.freq_from * ratio.powf(progress);
            osc.tick(&[freq], &mut out);

            let attack = (t / ATTACK).min(1.0);
            let envelope = tone.gain * attack * (-5.0 * progress).exp();
            *slot += out[0] * envelope;
        }
    }

    for s in &mut samples {
        *s = s.clamp(-1.0, 1.0);
    }
    samples
}

/// Notes for a sound effect
pub fn tones_for(effect: SoundEffect) -> Vec<Tone> {
    match effect {
        // Quick upward chirp
        SoundEffect::Flap => vec![Tone::sweep(0.12, 300.0, 650.0, 0.3, Shape::Sine)],
        SoundEffect::Score => vec![
            Tone::note(0.0, 0.08, 880.0, 0.2, Shape::Triangle),
            Tone::note(0.08, 0.12, 1175.0, 0.2, Shape::Triangle),
        ],
        // Low buzzing warble
        SoundEffect::EnemyAppears => vec![
            Tone::sweep(0.25, 220.0, 330.0, 0.12, Shape::Square),
            Tone::note(0.1, 0.2, 165.0, 0.1, Shape::Square),
        ],
        SoundEffect::Hit => vec![Tone::sweep(0.4, 400.0, 80.0, 0.15, Shape::Saw)],
        SoundEffect::GameOver => [400.0, 350.0, 300.0, 200.0]
            .iter()
            .enumerate()
            .map(|(i, &f)| Tone::note(i as f32 * 0.2, 0.3, f, 0.3, Shape::Sine))
            .collect(),
        SoundEffect::NewHighScore => [500.0, 600.0, 700.0, 800.0, 1000.0]
            .iter()
            .enumerate()
            .map(|(i, &f)| Tone::note(i as f32 * 0.08, 0.25, f, 0.25, Shape::Triangle))
            .collect(),
    }
}

/// Samples for a sound effect
pub fn render(effect: SoundEffect) -> Vec<f32> {
    render_tones(&tones_for(effect))
}

/// Length of one melody step of the background tune, in seconds
pub const MUSIC_STEP: f32 = 0.25;

// Pentatonic melody, one note per step; 0.0 rests
const MELODY: [f32; 16] = [
    523.3, 0.0, 659.3, 784.0, 659.3, 0.0, 587.3, 523.3, 440.0, 0.0, 523.3, 587.3, 659.3, 587.3, 523.3,
    0.0,
];
const BASS: [f32; 4] = [130.8, 110.0, 174.6, 196.0];

/// One seamless loop of quiet background music
pub fn music_loop() -> Vec<f32> {
    let mut tones: Vec<Tone> = MELODY
        .iter()
        .enumerate()
        .filter(|&(_, &f)| f > 0.0)
        .map(|(i, &f)| Tone::note(i as f32 * MUSIC_STEP, MUSIC_STEP, f, 0.06, Shape::Triangle))
        .collect();
    let bar = MELODY.len() as f32 * MUSIC_STEP / BASS.len() as f32;
    tones.extend(
        BASS.iter()
            .enumerate()
            .map(|(i, &f)| Tone::note(i as f32 * bar, bar, f, 0.05, Shape::Sine)),
    );

    let mut samples = render_tones(&tones);
    // Pad a trailing rest so every loop is the same length
    samples.resize((MELODY.len() as f32 * MUSIC_STEP * SAMPLE_RATE as f32).ceil() as usize, 0.0);
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn test_every_effect_is_audible_and_bounded() {
        for effect in SoundEffect::ALL {
            let samples = render(effect);
            assert!(!samples.is_empty(), "{:?}", effect);
            let p = peak(&samples);
            assert!(p > 0.01, "{:?} is silent", effect);
            assert!(p <= 1.0);
            assert!(samples.iter().all(|s| s.is_finite()));
        }
    }

    #[test]
    fn test_lengths_follow_the_notes() {
        let flap = render(SoundEffect::Flap);
        assert_eq!(flap.len(), (0.12 * SAMPLE_RATE as f32).ceil() as usize);
        // Four notes 0.2s apart, the last one 0.3s long
        let game_over = render(SoundEffect::GameOver);
        assert!((game_over.len() as f32 / SAMPLE_RATE as f32 - 0.9).abs() < 0.01);
    }

    #[test]
    fn test_sound_fades_out() {
        let hit = render(SoundEffect::Hit);
        let tail = &hit[hit.len() - 200..];
        assert!(peak(tail) < peak(&hit) * 0.1);
    }

    #[test]
    fn test_music_loop_length() {
        let music = music_loop();
        assert_eq!(music.len(), (16.0 * MUSIC_STEP * SAMPLE_RATE as f32).ceil() as usize);
        assert!(peak(&music) > 0.01);
    }

    #[test]
    fn test_empty_tone_list() {
        assert!(render_tones(&[]).is_empty());
    }
}
