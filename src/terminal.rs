//! Crossterm presenter: draws the board as text and turns key presses into
//! [`Command`]s. Keys that map to nothing are swallowed here and never reach
//! the session.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::debug;

use crate::session::{Command, Frame, Presenter, SessionError, Status};

const HELP_MOVES: &str = "(W)Up (S)Down (A)Left (D)Right";
const HELP_CONTROL: &str = "     (R)Restart (Q)Exit";
const GAME_OVER: &str = "        GAME OVER";
const YOU_WIN: &str = "         YOU WIN";

/// Lines of text for one frame, top to bottom.
pub fn layout(frame: &Frame<'_>) -> Vec<String> {
    let border = format!("{}+", "+------".repeat(frame.size));
    let mut lines = Vec::with_capacity(frame.size * 2 + 4);
    lines.push(format!("SCORE: {}    BEST: {}", frame.score, frame.best_score));
    for row in frame.rows() {
        lines.push(border.clone());
        lines.push(draw_row(row));
    }
    lines.push(border);
    lines.push(
        match frame.status {
            Status::Playing => HELP_MOVES,
            Status::Won => YOU_WIN,
            Status::Over => GAME_OVER,
        }
        .to_string(),
    );
    lines.push(HELP_CONTROL.to_string());
    lines
}

fn draw_row(row: &[u32]) -> String {
    let mut line: String = row
        .iter()
        .map(|&v| if v > 0 { format!("|{v:^5} ") } else { "|      ".to_string() })
        .collect();
    line.push('|');
    line
}

/// Decode a key press. Anything unmapped yields `None`.
pub fn map_key(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Command::Exit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Char(ch) => match ch.to_ascii_lowercase() {
            'w' => Some(Command::Up),
            'a' => Some(Command::Left),
            's' => Some(Command::Down),
            'd' => Some(Command::Right),
            'r' => Some(Command::Restart),
            'q' => Some(Command::Exit),
            _ => None,
        },
        KeyCode::Up => Some(Command::Up),
        KeyCode::Down => Some(Command::Down),
        KeyCode::Left => Some(Command::Left),
        KeyCode::Right => Some(Command::Right),
        KeyCode::Esc => Some(Command::Exit),
        _ => None,
    }
}

/// Full-screen terminal presenter. Raw mode and the alternate screen are
/// active between [`TerminalScreen::begin`] and drop.
pub struct TerminalScreen {
    out: Stdout,
    active: bool,
}

impl TerminalScreen {
    pub fn begin() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // from here on, Drop undoes whatever setup did happen
        let mut screen = Self { out: io::stdout(), active: true };
        execute!(screen.out, EnterAlternateScreen, cursor::Hide, Clear(ClearType::All))?;
        Ok(screen)
    }

    /// Restore the terminal. Idempotent.
    pub fn end(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let restored = execute!(self.out, cursor::Show, LeaveAlternateScreen);
        terminal::disable_raw_mode()?;
        restored
    }
}

impl Drop for TerminalScreen {
    fn drop(&mut self) {
        let _ = self.end();
    }
}

impl Presenter for TerminalScreen {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), SessionError> {
        queue!(self.out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        for line in layout(frame) {
            queue!(self.out, Print(line), cursor::MoveToNextLine(1))?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn poll_command(&mut self) -> Result<Command, SessionError> {
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match map_key(key) {
                    Some(command) => return Ok(command),
                    None => debug!("ignored key {:?}", key.code),
                }
            }
        }
    }
}
