//! Terminal display: the presentation/audio adapter
//!
//! Features:
//! - `Screen` folds trainer events into what is on screen
//! - Fretboard grid with cursor, pressed and highlighted controls
//! - Prompt, feedback, teacher mood, timer and best time
//! - Cheat sheet printing

use crossterm::{
    cursor, execute,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{stdout, Write};

use fret_trainer::events::{Event, HighlightStyle, Mood, Severity, SoundCue, TargetView};
use fret_trainer::fretboard::{CONTROL_COUNT, FIRST_MUTE};
use fret_trainer::session::score::{format_best, format_seconds};
use fret_trainer::{ControlId, ControlSet, Mode, PatternCatalog};

use super::input::Direction;

/// Strings across, one column each
pub const STRINGS: u32 = 6;

/// Fret rows below the mute row
pub const FRET_ROWS: u32 = FIRST_MUTE / STRINGS;

/// Grid position. Row 0 is the mute row, rows 1.. are frets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    row: u32,
    col: u32,
}

impl Cursor {
    pub fn step(&mut self, direction: Direction) {
        let rows = FRET_ROWS + 1;
        match direction {
            Direction::Up => self.row = (self.row + rows - 1) % rows,
            Direction::Down => self.row = (self.row + 1) % rows,
            Direction::Left => self.col = (self.col + STRINGS - 1) % STRINGS,
            Direction::Right => self.col = (self.col + 1) % STRINGS,
        }
    }

    /// Control id under the cursor
    pub fn control(&self) -> u32 {
        grid_control(self.row, self.col)
    }
}

fn grid_control(row: u32, col: u32) -> u32 {
    if row == 0 {
        FIRST_MUTE + col
    } else {
        (row - 1) * STRINGS + col
    }
}

/// Everything the trainer has told the presentation so far
#[derive(Debug, Clone, Default)]
pub struct Screen {
    pub target: Option<TargetView>,
    pub active: ControlSet,
    pub highlight: ControlSet,
    pub highlight_style: Option<HighlightStyle>,
    pub strum_highlighted: bool,
    pub feedback: Option<(String, Severity)>,
    pub mood: Option<Mood>,
    pub elapsed: f32,
    pub best: Option<f32>,
    /// Last sound cue, shown as text
    pub sound: Option<String>,
    pub tutorial_text: Option<String>,
    pub complete: bool,
    pub tutorial_finished: bool,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::TargetChanged(view) => {
                self.target = Some(view.clone());
                self.complete = false;
            }
            Event::ControlToggled { id, on } => {
                if self.active.contains(*id) != *on {
                    self.active.toggle(*id);
                }
            }
            Event::ControlsCleared => self.active.clear(),
            Event::Feedback { message, severity } => {
                self.feedback = Some((message.clone(), *severity));
            }
            Event::FeedbackCleared => self.feedback = None,
            Event::Mood(mood) => self.mood = Some(*mood),
            Event::Sound(cue) => {
                self.sound = Some(match cue {
                    SoundCue::Target { name, .. } => format!("♪ {}", name),
                    SoundCue::Error => "✗ *twang*".to_string(),
                });
            }
            Event::TimerTick(elapsed) => self.elapsed = *elapsed,
            Event::BestTimeUpdated(best) => self.best = *best,
            Event::HighlightSet { controls, style } => {
                self.highlight = *controls;
                self.highlight_style = Some(*style);
            }
            Event::HighlightCleared => {
                self.highlight.clear();
                self.highlight_style = None;
            }
            Event::StrumHighlighted(on) => self.strum_highlighted = *on,
            Event::SessionComplete => self.complete = true,
            Event::TutorialStep {
                text, highlighted, ..
            } => {
                self.tutorial_text = Some(text.clone());
                self.highlight = *highlighted;
            }
            Event::TutorialFinished => {
                self.tutorial_finished = true;
                self.tutorial_text = None;
            }
        }
    }
}

fn mood_face(mood: Mood) -> &'static str {
    match mood {
        Mood::Neutral => "(•_•)",
        Mood::Happy => "(^o^)",
        Mood::Sad => "(;_;)",
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::White,
        Severity::Success => Color::Green,
        Severity::Error => Color::Red,
        Severity::Highlight => Color::Yellow,
    }
}

/// Terminal display manager
pub struct Display;

impl Display {
    /// Create display without alternate screen (simpler mode)
    pub fn simple() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Display)
    }

    /// Clear screen
    pub fn clear(&self) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(
            stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        Ok(())
    }

    /// Full frame: header, fretboard, status lines and help
    pub fn draw(
        &self,
        screen: &Screen,
        cursor: Cursor,
        help: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.clear()?;
        self.show_header(screen)?;
        self.show_fretboard(screen, cursor)?;
        self.show_status(screen)?;
        self.show_help(help)?;
        Ok(())
    }

    fn show_header(&self, screen: &Screen) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        let face = screen.mood.map(mood_face).unwrap_or("");

        execute!(stdout, cursor::MoveTo(0, 0))?;
        if let Some(text) = &screen.tutorial_text {
            for (i, line) in text.lines().enumerate() {
                execute!(
                    stdout,
                    cursor::MoveTo(0, i as u16),
                    SetForegroundColor(Color::Cyan),
                    Print(line),
                    ResetColor
                )?;
            }
        } else if let Some(view) = &screen.target {
            let prompt = match view.mode {
                Mode::Easy => view.prompt.clone(),
                Mode::Hard => format!("{} {}", view.prompt, view.name),
            };
            execute!(
                stdout,
                SetForegroundColor(Color::Cyan),
                Print(prompt),
                ResetColor,
                Print(format!("   [{}/{}]", view.index + 1, view.total)),
            )?;
        }
        execute!(
            stdout,
            cursor::MoveTo(48, 0),
            SetForegroundColor(Color::Magenta),
            Print(face),
            ResetColor
        )?;
        stdout.flush()?;
        Ok(())
    }

    fn show_fretboard(
        &self,
        screen: &Screen,
        cursor: Cursor,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        let top = 3u16;

        for row in 0..=FRET_ROWS {
            let label = if row == 0 {
                "mute".to_string()
            } else {
                format!("fr {}", row)
            };
            execute!(
                stdout,
                cursor::MoveTo(0, top + row as u16),
                SetForegroundColor(Color::DarkGrey),
                Print(format!("{:>5} ", label)),
                ResetColor
            )?;

            for col in 0..STRINGS {
                let raw = grid_control(row, col);
                let Ok(id) = ControlId::new(raw) else {
                    continue;
                };
                let pressed = screen.active.contains(id);
                let cell = if pressed { "[#]" } else { "[ ]" };
                let color = if pressed && id.is_mute() {
                    Color::Green
                } else if pressed {
                    Color::Blue
                } else if screen.highlight.contains(id) {
                    match screen.highlight_style {
                        Some(HighlightStyle::Mute) => Color::Green,
                        _ => Color::Yellow,
                    }
                } else {
                    Color::White
                };

                if cursor.control() == raw {
                    execute!(stdout, SetAttribute(Attribute::Reverse))?;
                }
                execute!(
                    stdout,
                    SetForegroundColor(color),
                    Print(cell),
                    ResetColor,
                    SetAttribute(Attribute::Reset),
                    Print(" ")
                )?;
            }
        }

        let strum_color = if screen.strum_highlighted {
            Color::Yellow
        } else {
            Color::White
        };
        execute!(
            stdout,
            cursor::MoveTo(6, top + FRET_ROWS as u16 + 2),
            SetForegroundColor(strum_color),
            Print("< STRUM >"),
            ResetColor
        )?;
        stdout.flush()?;
        Ok(())
    }

    fn show_status(&self, screen: &Screen) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        let line = 3 + FRET_ROWS as u16 + 4;

        if let Some((message, severity)) = &screen.feedback {
            execute!(
                stdout,
                cursor::MoveTo(0, line),
                SetForegroundColor(severity_color(*severity)),
                Print(message),
                ResetColor
            )?;
        }
        if let Some(sound) = &screen.sound {
            execute!(
                stdout,
                cursor::MoveTo(48, line),
                SetForegroundColor(Color::DarkGrey),
                Print(sound),
                ResetColor
            )?;
        }
        if screen.target.is_some() {
            execute!(
                stdout,
                cursor::MoveTo(0, line + 2),
                SetForegroundColor(Color::Magenta),
                Print("Time: "),
                ResetColor,
                Print(format_seconds(screen.elapsed)),
                Print("  |  "),
                SetForegroundColor(Color::Magenta),
                Print("Best: "),
                ResetColor,
                Print(format_best(screen.best)),
            )?;
        }
        if screen.complete {
            execute!(
                stdout,
                cursor::MoveTo(0, line + 3),
                SetForegroundColor(Color::Green),
                Print("Session complete! r to play again, q to quit"),
                ResetColor
            )?;
        }
        if screen.tutorial_finished {
            execute!(
                stdout,
                cursor::MoveTo(0, line + 3),
                SetForegroundColor(Color::Green),
                Print("Press n or q to leave the tutorial"),
                ResetColor
            )?;
        }
        stdout.flush()?;
        Ok(())
    }

    fn show_help(&self, help: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, 3 + FRET_ROWS as u16 + 8),
            SetForegroundColor(Color::DarkGrey),
            Print(help),
            ResetColor
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Reset terminal state and cleanup
    pub fn shutdown(&self) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(stdout, cursor::MoveTo(0, 3 + FRET_ROWS as u16 + 10))?;
        terminal::disable_raw_mode()?;
        Ok(())
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        // Best effort cleanup
        let _ = self.shutdown();
    }
}

/// Print each mode's catalog: name and controls
pub fn print_cheat_sheet(catalog: &PatternCatalog, modes: &[Mode]) {
    for &mode in modes {
        println!("== {} ({}s) ==", mode, mode.target_noun());
        for target in catalog.targets(mode) {
            println!("  {:<10} {}", target.name, target.required);
        }
        println!();
    }
    println!(
        "Controls 0-{} are frets, {}-{} mute the strings.",
        FIRST_MUTE - 1,
        FIRST_MUTE,
        CONTROL_COUNT - 1
    );
}
