//! # Mock Console for Testing
//!
//! Serves pre-programmed input lines and records everything written, along
//! with the prompts that were shown.

use super::Console;
use anyhow::Result;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One interaction recorded by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleRecord {
    Prompt(String),
    SecretPrompt(String),
    Output(String),
    Error(String),
}

type Shared<T> = Arc<Mutex<T>>;

/// Scripted console; clones share input and recordings
#[derive(Debug, Clone, Default)]
pub struct MockConsole {
    input: Shared<VecDeque<String>>,
    records: Shared<Vec<ConsoleRecord>>,
}

impl MockConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let console = Self::default();
        for line in lines {
            console.push_input(line);
        }
        console
    }

    pub fn push_input(&self, line: impl Into<String>) {
        lock(&self.input).push_back(line.into());
    }

    pub fn records(&self) -> Vec<ConsoleRecord> {
        lock(&self.records).clone()
    }

    /// Everything written to the output stream, concatenated
    pub fn output(&self) -> String {
        self.collect(|r| match r {
            ConsoleRecord::Output(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Everything written to the error stream, concatenated
    pub fn errors(&self) -> String {
        self.collect(|r| match r {
            ConsoleRecord::Error(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Prompts shown for secret input
    pub fn secret_prompts(&self) -> Vec<String> {
        self.records()
            .into_iter()
            .filter_map(|r| match r {
                ConsoleRecord::SecretPrompt(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        lock(&self.records).clear();
    }

    fn collect<F>(&self, pick: F) -> String
    where
        F: Fn(&ConsoleRecord) -> Option<&str>,
    {
        lock(&self.records).iter().filter_map(pick).collect()
    }

    fn record(&self, record: ConsoleRecord) {
        lock(&self.records).push(record);
    }
}

impl Console for MockConsole {
    fn prompt_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.record(ConsoleRecord::Prompt(prompt.to_string()));
        Ok(lock(&self.input).pop_front())
    }

    fn prompt_secret(&mut self, prompt: &str) -> Result<Option<String>> {
        self.record(ConsoleRecord::SecretPrompt(prompt.to_string()));
        Ok(lock(&self.input).pop_front())
    }

    fn print(&mut self, text: &str) -> Result<()> {
        self.record(ConsoleRecord::Output(text.to_string()));
        Ok(())
    }

    fn print_error(&mut self, text: &str) -> Result<()> {
        self.record(ConsoleRecord::Error(text.to_string()));
        Ok(())
    }
}

/// Recordings stay readable after a panicking test thread
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
