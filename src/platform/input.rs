//! Terminal input mapping

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};

use crate::sim::{GamePhase, TickInput};

/// What a terminal event asks the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Space/Enter/Up/click: flap while flying, restart after a crash
    Action,
    Restart,
    ToggleMute,
    Quit,
    Resize { cols: u16, rows: u16 },
}

/// Translate a crossterm event; only key presses count, never repeats or releases
pub fn map_event(event: &Event) -> Option<Command> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Command::Quit)
            }
            KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Up | KeyCode::Char('w') => {
                Some(Command::Action)
            }
            KeyCode::Char('r') => Some(Command::Restart),
            KeyCode::Char('m') => Some(Command::ToggleMute),
            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
            _ => None,
        },
        Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
            Some(Command::Action)
        }
        Event::Resize(cols, rows) => Some(Command::Resize {
            cols: *cols,
            rows: *rows,
        }),
        _ => None,
    }
}

/// Collects one-shot game inputs between ticks
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    pending: TickInput,
}

impl InputLatch {
    /// Record a command against the phase the player is looking at
    pub fn press(&mut self, command: Command, phase: GamePhase) {
        match (command, phase) {
            (Command::Action, GamePhase::GameOver) | (Command::Restart, GamePhase::GameOver) => {
                self.pending.restart = true;
            }
            (Command::Action, _) => self.pending.flap = true,
            _ => {}
        }
    }

    /// Hand the latched input to exactly one tick and clear it
    pub fn take(&mut self) -> TickInput {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyEventState, MouseEvent};

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_map_keys() {
        assert_eq!(
            map_event(&key(KeyCode::Char(' '), KeyEventKind::Press)),
            Some(Command::Action)
        );
        assert_eq!(
            map_event(&key(KeyCode::Char('r'), KeyEventKind::Press)),
            Some(Command::Restart)
        );
        assert_eq!(
            map_event(&key(KeyCode::Esc, KeyEventKind::Press)),
            Some(Command::Quit)
        );
        assert_eq!(map_event(&key(KeyCode::Char('x'), KeyEventKind::Press)), None);
    }

    #[test]
    fn test_release_and_repeat_ignored() {
        assert_eq!(map_event(&key(KeyCode::Char(' '), KeyEventKind::Release)), None);
        assert_eq!(map_event(&key(KeyCode::Char(' '), KeyEventKind::Repeat)), None);
    }

    #[test]
    fn test_mouse_click_is_action() {
        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(map_event(&click), Some(Command::Action));
    }

    #[test]
    fn test_latch_depends_on_phase() {
        let mut latch = InputLatch::default();
        latch.press(Command::Action, GamePhase::Playing);
        assert_eq!(
            latch.take(),
            TickInput {
                flap: true,
                restart: false
            }
        );
        // Consumed once
        assert_eq!(latch.take(), TickInput::default());

        latch.press(Command::Action, GamePhase::GameOver);
        assert!(latch.take().restart);

        latch.press(Command::Restart, GamePhase::Playing);
        assert_eq!(latch.take(), TickInput::default());
    }
}
