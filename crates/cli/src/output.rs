// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal output: diagnostics and the findings summary.
//!
//! Color is used only when stderr is a terminal.

use std::collections::BTreeMap;
use std::io::{self, IsTerminal, Write};

use attestor_oscal::{Finding, ObjectiveState};

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Print an error message to stderr.
pub fn print_error(msg: impl std::fmt::Display) {
    let is_tty = io::stderr().is_terminal();
    write_error(&mut io::stderr(), msg, is_tty);
}

fn write_error<W: Write>(writer: &mut W, msg: impl std::fmt::Display, is_terminal: bool) {
    if is_terminal {
        let _ = writeln!(writer, "{RED}Error: {msg}{RESET}");
    } else {
        let _ = writeln!(writer, "Error: {msg}");
    }
}

/// Print a warning message to stderr.
pub fn print_warning(msg: impl std::fmt::Display) {
    let is_tty = io::stderr().is_terminal();
    write_warning(&mut io::stderr(), msg, is_tty);
}

fn write_warning<W: Write>(writer: &mut W, msg: impl std::fmt::Display, is_terminal: bool) {
    if is_terminal {
        let _ = writeln!(writer, "{YELLOW}Warning: {msg}{RESET}");
    } else {
        let _ = writeln!(writer, "Warning: {msg}");
    }
}

/// Print a control id / status table for one target to stderr.
pub fn print_findings_table(target: &str, findings: &BTreeMap<String, Finding>) {
    let is_tty = io::stderr().is_terminal();
    write_findings_table(&mut io::stderr().lock(), target, findings, is_tty);
}

fn write_findings_table<W: Write>(
    writer: &mut W,
    target: &str,
    findings: &BTreeMap<String, Finding>,
    is_terminal: bool,
) {
    const HEADER: &str = "Control ID";
    let width = findings
        .keys()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max(HEADER.len());

    let _ = writeln!(writer, "Findings for {target}");
    let _ = writeln!(writer, "  {HEADER:<width$}  Status");
    for (control_id, finding) in findings {
        let state = finding.target.status.state;
        let color = match state {
            ObjectiveState::Satisfied => GREEN,
            ObjectiveState::NotSatisfied => RED,
        };
        if is_terminal {
            let _ = writeln!(writer, "  {control_id:<width$}  {color}{state}{RESET}");
        } else {
            let _ = writeln!(writer, "  {control_id:<width$}  {state}");
        }
    }
    let satisfied = findings
        .values()
        .filter(|f| f.target.status.state == ObjectiveState::Satisfied)
        .count();
    let _ = writeln!(
        writer,
        "  {satisfied} of {} control(s) satisfied",
        findings.len()
    );
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
