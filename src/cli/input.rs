//! Keystroke input handling using crossterm
//!
//! Features:
//! - Non-blocking keystroke capture
//! - Arrow/vim keys move the fretboard cursor
//! - Ctrl+C graceful exit

use crossterm::event::{self, KeyCode, KeyEvent, KeyModifiers};
use std::io::Result as IoResult;
use std::time::Duration;

/// Cursor movement on the fretboard grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// What a keystroke asks the front end to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    /// Toggle the control under the cursor
    Toggle,
    Strum,
    /// Tutorial "Next" button
    Next,
    Restart,
    ResetBest,
    Quit,
}

/// Handles user input from terminal
pub struct InputHandler {
    /// Timeout for poll operations (milliseconds)
    poll_timeout: Duration,
}

impl InputHandler {
    /// Create new input handler with default timeout (50ms keeps the timer smooth)
    pub fn new() -> Self {
        InputHandler {
            poll_timeout: Duration::from_millis(50),
        }
    }

    pub fn enable_raw_mode() -> IoResult<()> {
        crossterm::terminal::enable_raw_mode()
    }

    pub fn disable_raw_mode() -> IoResult<()> {
        crossterm::terminal::disable_raw_mode()
    }

    /// Poll for keystroke with timeout (non-blocking)
    /// Returns Some(KeyEvent) if key pressed, None if timeout
    pub fn read_key(&self) -> Result<Option<KeyEvent>, Box<dyn std::error::Error>> {
        if event::poll(self.poll_timeout)? {
            match event::read()? {
                event::Event::Key(key_event) if key_event.kind == event::KeyEventKind::Press => {
                    Ok(Some(key_event))
                }
                _ => Ok(None),
            }
        } else {
            Ok(None)
        }
    }

    /// Map a key to a command
    pub fn command(key: &KeyEvent) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Command::Quit),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Command::Quit),
            KeyCode::Up | KeyCode::Char('k') => Some(Command::Move(Direction::Up)),
            KeyCode::Down | KeyCode::Char('j') => Some(Command::Move(Direction::Down)),
            KeyCode::Left | KeyCode::Char('h') => Some(Command::Move(Direction::Left)),
            KeyCode::Right | KeyCode::Char('l') => Some(Command::Move(Direction::Right)),
            KeyCode::Char(' ') => Some(Command::Toggle),
            KeyCode::Enter | KeyCode::Char('s') => Some(Command::Strum),
            KeyCode::Char('n') | KeyCode::Tab => Some(Command::Next),
            KeyCode::Char('r') => Some(Command::Restart),
            KeyCode::Char('R') => Some(Command::ResetBest),
            _ => None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test_case(KeyCode::Char(' '), Command::Toggle; "space toggles")]
    #[test_case(KeyCode::Enter, Command::Strum; "enter strums")]
    #[test_case(KeyCode::Char('n'), Command::Next; "n is next")]
    #[test_case(KeyCode::Left, Command::Move(Direction::Left); "arrow moves")]
    #[test_case(KeyCode::Char('j'), Command::Move(Direction::Down); "vim moves")]
    #[test_case(KeyCode::Esc, Command::Quit; "escape quits")]
    fn test_key_commands(code: KeyCode, expected: Command) {
        assert_eq!(InputHandler::command(&key(code)), Some(expected));
    }

    #[test]
    fn test_ctrl_c_quits() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(InputHandler::command(&event), Some(Command::Quit));
    }

    #[test]
    fn test_unbound_key_ignored() {
        assert_eq!(InputHandler::command(&key(KeyCode::Char('z'))), None);
        let event = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(InputHandler::command(&event), None);
    }
}
