//! Terminal driver for the `screen-*` builtins: alternate-screen raw mode,
//! absolute-position text drawing, and blocking key reads named by short
//! atoms.

use crate::errors::{Error, ErrorKind, Result};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{read, Event, KeyCode, KeyEvent};
use crossterm::execute;
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use std::io::{stdout, Write};

fn term_err<E: std::fmt::Display>(e: E) -> Error {
    Error::new(ErrorKind::GenericError(format!("screen: {}", e)))
}

pub fn start() -> Result<()> {
    terminal::enable_raw_mode().map_err(term_err)?;
    execute!(stdout(), EnterAlternateScreen, Hide).map_err(term_err)
}

pub fn end() -> Result<()> {
    execute!(stdout(), Show, LeaveAlternateScreen).map_err(term_err)?;
    terminal::disable_raw_mode().map_err(term_err)
}

pub fn clear() -> Result<()> {
    execute!(stdout(), Clear(ClearType::All), MoveTo(0, 0)).map_err(term_err)
}

pub fn size() -> Result<(u16, u16)> {
    terminal::size().map_err(term_err)
}

pub fn draw_text(x: u16, y: u16, text: &str) -> Result<()> {
    execute!(stdout(), MoveTo(x, y), Print(text)).map_err(term_err)
}

/// Block until a key press and return its atom name.
pub fn get_key() -> Result<String> {
    loop {
        if let Event::Key(KeyEvent { code, .. }) = read().map_err(term_err)? {
            return Ok(key_name(code));
        }
    }
}

fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => "backtab".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Insert => "insert".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pgup".to_string(),
        KeyCode::PageDown => "pgdn".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::F(n) => format!("f{}", n),
        _ => "unknown".to_string(),
    }
}
