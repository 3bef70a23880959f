// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Consent for validations that perform execution actions.

use std::io::{BufRead, Write};

/// How validations requiring execution are handled:
/// - `Prompt`: ask once per pass before running them
/// - `Allow`: run them without asking
/// - `Deny`: leave them unevaluated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionPolicy {
    #[default]
    Prompt,
    Allow,
    Deny,
}

impl ExecutionPolicy {
    /// `confirm` wins over `non_interactive`.
    pub fn from_flags(confirm: bool, non_interactive: bool) -> Self {
        match (confirm, non_interactive) {
            (true, _) => Self::Allow,
            (false, true) => Self::Deny,
            (false, false) => Self::Prompt,
        }
    }

    pub fn allows(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Asks the operator whether execution may proceed.
pub trait ExecutionConfirmer: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

/// Prompts on stderr and reads the answer from stdin.
///
/// The read blocks: an interrupt during the prompt takes effect once a line
/// (or EOF) arrives.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalConfirmer;

impl ExecutionConfirmer for TerminalConfirmer {
    fn confirm(&self, message: &str) -> bool {
        let mut stderr = std::io::stderr().lock();
        let _ = write!(stderr, "{message}\nRun these validations? [y/N] ");
        let _ = stderr.flush();
        read_answer(&mut std::io::stdin().lock())
    }
}

/// `y` or `yes`, case-insensitive. Anything else, including EOF, is a no.
pub fn read_answer(reader: &mut impl BufRead) -> bool {
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(_) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

#[cfg(test)]
#[path = "consent_tests.rs"]
mod tests;
