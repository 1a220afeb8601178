//! # REPL Application Controller
//!
//! The controller owns the read loop: it prompts through the interpreter's
//! console, forwards each line, and stops on `exit`, `quit` or end of input.

use crate::repl::interpreter::Interpreter;
use crate::repl::io::Console;
use anyhow::Result;

const QUIT_COMMANDS: [&str; 2] = ["exit", "quit"];

pub struct ReplController<C: Console> {
    interpreter: Interpreter<C>,
}

impl<C: Console> ReplController<C> {
    pub fn new(interpreter: Interpreter<C>) -> Self {
        Self { interpreter }
    }

    /// Run the main loop until the user quits.
    ///
    /// Returns the success flag of the last command executed.
    pub async fn run(&mut self) -> Result<bool> {
        let mut last = true;
        loop {
            let prompt = self.interpreter.prompt();
            let Some(line) = self.interpreter.console_mut().prompt_line(&prompt)? else {
                tracing::debug!("End of input");
                self.interpreter.console_mut().println("")?;
                break;
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if QUIT_COMMANDS.contains(&line) {
                break;
            }

            last = self.interpreter.run(line).await;
        }
        Ok(last)
    }

    pub fn interpreter(&self) -> &Interpreter<C> {
        &self.interpreter
    }
}
