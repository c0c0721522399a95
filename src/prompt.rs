//! Reading answers from the person at the terminal.

use std::io::{self, BufRead, IsTerminal, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;

pub trait Prompter {
    /// Shows `prompt` and reads one line without its line ending. `None`
    /// means input has ended.
    fn line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Shows `prompt` and reads a line without echoing what is typed.
    fn secret(&mut self, prompt: &str) -> io::Result<String>;
}

/// Prompts on stdout and reads from stdin. Secrets are echoed as `*` when
/// stdin is a terminal.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        show(prompt)?;
        let mut buf = String::new();
        if io::stdin().lock().read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        let len = buf.trim_end_matches(&['\r', '\n'][..]).len();
        buf.truncate(len);
        Ok(Some(buf))
    }

    fn secret(&mut self, prompt: &str) -> io::Result<String> {
        if !io::stdin().is_terminal() {
            return Ok(self.line(prompt)?.unwrap_or_default());
        }
        show(prompt)?;
        let secret = {
            let _raw = RawMode::enable()?;
            read_masked()?
        };
        println!();
        Ok(secret)
    }
}

fn show(prompt: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write!(out, "{} ", prompt)?;
    out.flush()
}

/// Keeps the terminal in raw mode while alive.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn read_masked() -> io::Result<String> {
    let mut out = io::stdout();
    let mut secret = String::new();
    loop {
        let key = match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => key,
            _ => continue,
        };
        match key {
            KeyEvent {
                code: KeyCode::Enter,
                ..
            } => break,
            KeyEvent {
                code: KeyCode::Char('c'),
                modifiers,
                ..
            } if modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted"));
            }
            KeyEvent {
                code: KeyCode::Backspace,
                ..
            } => {
                if secret.pop().is_some() {
                    write!(out, "\x08 \x08")?;
                }
            }
            KeyEvent {
                code: KeyCode::Char(c),
                ..
            } => {
                secret.push(c);
                write!(out, "*")?;
            }
            _ => {}
        }
        out.flush()?;
    }
    Ok(secret)
}
