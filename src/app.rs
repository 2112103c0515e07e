//! One running game: state, clock, inputs and the collaborators that react
//! to simulation events

use crate::audio::{AudioManager, SoundEffect};
use crate::config::Config;
use crate::consts::SIM_DT;
use crate::highscore::HighScore;
use crate::platform::{Command, FrameClock, InputLatch};
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, autopilot_input, tick};

/// Game instance holding all state
pub struct App {
    pub config: Config,
    pub state: GameState,
    /// `None` keeps the best score in memory only
    pub highscore: Option<HighScore>,
    pub audio: AudioManager,
    clock: FrameClock,
    latch: InputLatch,
}

impl App {
    pub fn new(config: Config, highscore: Option<HighScore>, seed: u64) -> Self {
        let mut state = GameState::new(seed, &config);
        state.best = highscore.as_ref().map_or(0, HighScore::best);
        let audio = AudioManager::new(config.sound);
        Self {
            config,
            state,
            highscore,
            audio,
            clock: FrameClock::new(),
            latch: InputLatch::default(),
        }
    }

    /// Apply a player command; returns false when the player asked to quit
    pub fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => return false,
            Command::ToggleMute => {
                self.audio.toggle_mute();
            }
            Command::Action | Command::Restart => self.latch.press(command, self.state.phase),
            Command::Resize { .. } => {}
        }
        true
    }

    /// Run however many fixed ticks `elapsed` seconds of wall time are worth
    ///
    /// Latched input goes to the first tick only.
    pub fn update(&mut self, elapsed: f32) {
        let substeps = self.clock.advance(elapsed);
        for _ in 0..substeps {
            let input = self.latch.take();
            self.step(&input);
        }
    }

    /// Advance exactly one tick and react to what happened
    pub fn step(&mut self, input: &TickInput) {
        tick(&mut self.state, &self.config, input, SIM_DT);
        for event in self.state.drain_events() {
            self.on_event(&event);
        }
    }

    fn on_event(&mut self, event: &GameEvent) {
        self.audio.on_event(event);
        if let GameEvent::GameOver { score } = *event {
            self.commit_score(score);
        }
    }

    /// Persist a finished run's score if it is a new best
    fn commit_score(&mut self, score: u32) {
        let Some(highscore) = self.highscore.as_mut() else {
            return;
        };
        match highscore.record(score) {
            Ok(true) => self.audio.play(SoundEffect::NewHighScore),
            Ok(false) => {}
            Err(e) => log::warn!(
                "Could not save high score to {}: {}",
                highscore.path().display(),
                e
            ),
        }
        self.state.best = self.state.best.max(highscore.best());
    }
}

/// Outcome of a headless run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessReport {
    pub ticks: u64,
    /// Runs that ended in a crash
    pub runs: u32,
    /// Score of each finished run, in order
    pub scores: Vec<u32>,
    /// Score of the run still in progress when time ran out
    pub current: u32,
    pub best: u32,
}

/// Let the autopilot play for `ticks` fixed steps, restarting after each crash
pub fn run_headless(app: &mut App, ticks: u64) -> HeadlessReport {
    let mut scores = Vec::new();
    for _ in 0..ticks {
        let input = autopilot_input(&app.state, &app.config, true);
        let was_playing = app.state.phase == GamePhase::Playing;
        app.step(&input);
        if was_playing && app.state.phase == GamePhase::GameOver {
            log::info!("Run {} ended with {}", scores.len() + 1, app.state.score);
            scores.push(app.state.score);
        }
    }
    HeadlessReport {
        ticks,
        runs: scores.len() as u32,
        current: if app.state.phase == GamePhase::Playing {
            app.state.score
        } else {
            0
        },
        scores,
        best: app.state.best,
    }
}
