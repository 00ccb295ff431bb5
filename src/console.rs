//! Masked password entry.

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{self, IsTerminal, Write};

/// Reads a password without echoing it.
pub trait PasswordReader {
    /// Shows `prompt` and reads a password. Returns `Ok(None)` when masked
    /// input is not available, in which case the caller falls back to a
    /// visible read.
    fn read_password(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Never offers masked input. Used for piped sessions and in tests.
#[derive(Debug, Default)]
pub struct NoMaskedInput;

impl PasswordReader for NoMaskedInput {
    fn read_password(&mut self, _prompt: &str) -> io::Result<Option<String>> {
        Ok(None)
    }
}

/// Reads passwords from the controlling terminal in raw mode.
#[derive(Debug, Default)]
pub struct TerminalPasswordReader;

/// Leaves raw mode when dropped, including on early returns.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

impl PasswordReader for TerminalPasswordReader {
    fn read_password(&mut self, prompt: &str) -> io::Result<Option<String>> {
        if !io::stdin().is_terminal() {
            return Ok(None);
        }

        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut password = String::new();
        {
            let _raw = RawModeGuard::enable()?;
            loop {
                let key = match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => key,
                    _ => continue,
                };

                match key.code {
                    KeyCode::Enter => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Err(io::Error::new(
                            io::ErrorKind::Interrupted,
                            "password entry interrupted",
                        ));
                    }
                    KeyCode::Backspace => {
                        password.pop();
                    }
                    KeyCode::Char(c) => password.push(c),
                    _ => {}
                }
            }
        }

        writeln!(stdout)?;
        Ok(Some(password))
    }
}
