//! # I/O Abstraction Layer
//!
//! The interpreter talks to the user only through the [`Console`] trait so
//! that prompts and rendered output can be scripted and captured in tests.
//!
//! ```text
//! Production:  ReplController ──▶ TerminalConsole ──▶ stdin / crossterm raw mode
//!
//! Testing:     ReplController ──▶ MockConsole     ──▶ VecDeque<String> / captured output
//! ```

use anyhow::Result;

pub mod mock;
pub mod terminal;

pub use mock::{ConsoleRecord, MockConsole};
pub use terminal::TerminalConsole;

/// Line-oriented terminal capabilities
pub trait Console: Send {
    /// Print `prompt` and read one line. `None` means end of input.
    fn prompt_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Like [`Console::prompt_line`] but the typed text is not echoed
    fn prompt_secret(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Write to the output stream
    fn print(&mut self, text: &str) -> Result<()>;

    /// Write to the error stream
    fn print_error(&mut self, text: &str) -> Result<()>;

    fn println(&mut self, text: &str) -> Result<()> {
        self.print(text)?;
        self.print("\n")
    }
}
