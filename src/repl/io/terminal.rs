//! # Terminal Console
//!
//! Production console. Lines are read from stdin; secrets are read in
//! crossterm raw mode so nothing is echoed. All crossterm usage for input is
//! isolated to this module.

use super::Console;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::{execute, terminal};
use std::io::{self, BufRead, Write};

pub struct TerminalConsole;

impl TerminalConsole {
    pub fn new() -> Self {
        Self
    }

    fn read_masked() -> Result<Option<String>> {
        let mut secret = String::new();
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Enter => return Ok(Some(secret)),
                    KeyCode::Char('c') | KeyCode::Char('d')
                        if key.modifiers.contains(KeyModifiers::CONTROL) =>
                    {
                        return Ok(None)
                    }
                    KeyCode::Esc => return Ok(None),
                    KeyCode::Backspace => {
                        secret.pop();
                    }
                    KeyCode::Char(c) => secret.push(c),
                    _ => {}
                }
            }
        }
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TerminalConsole {
    fn prompt_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.print(prompt)?;
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt_secret(&mut self, prompt: &str) -> Result<Option<String>> {
        self.print(prompt)?;
        terminal::enable_raw_mode()?;
        let secret = Self::read_masked();
        // restore the terminal even when reading failed
        terminal::disable_raw_mode()?;
        self.print("\n")?;
        secret
    }

    fn print(&mut self, text: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, Print(text))?;
        stdout.flush()?;
        Ok(())
    }

    fn print_error(&mut self, text: &str) -> Result<()> {
        let mut stderr = io::stderr();
        execute!(stderr, Print(text))?;
        Ok(())
    }
}
