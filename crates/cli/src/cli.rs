// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Default output file for assessment results
pub const DEFAULT_RESULTS_FILE: &str = "assessment-results.yaml";

/// Compliance validation for OSCAL component definitions
#[derive(Parser, Debug, Clone)]
#[command(name = "attestor", version, about)]
pub struct Cli {
    /// Config file (TOML or JSON)
    #[arg(long, global = true, value_name = "FILE", env = "ATTESTOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log verbosity
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Evaluate a component definition's validations and write assessment results
    Validate(ValidateArgs),
    /// Inline remote validations and imports into a single document
    Compose(ComposeArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Component definition to validate
    #[arg(short = 'f', long = "input-file", value_name = "FILE")]
    pub input_file: PathBuf,

    /// Assessment results file; merged into when it already exists
    #[arg(short = 'o', long = "output-file", value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Validate only this source or framework
    #[arg(short = 't', long)]
    pub target: Option<String>,

    /// Run validations that perform execution actions without asking
    #[arg(long)]
    pub confirm_execution: bool,

    /// Never prompt; validations requiring execution are skipped
    #[arg(long)]
    pub non_interactive: bool,

    /// Save collected domain resources next to the results
    #[arg(long)]
    pub save_resources: bool,

    /// Directory for saved resources
    #[arg(long, value_name = "DIR")]
    pub resources_dir: Option<PathBuf>,

    /// Validate the document as-is, without composing it first
    #[arg(long)]
    pub no_compose: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ComposeArgs {
    /// Component definition to compose
    #[arg(short = 'f', long = "input-file", value_name = "FILE")]
    pub input_file: PathBuf,

    /// Output file [default: composed-<input> next to the input]
    #[arg(short = 'o', long = "output-file", value_name = "FILE")]
    pub output_file: Option<PathBuf>,
}

impl ComposeArgs {
    pub fn output_path(&self) -> PathBuf {
        if let Some(path) = &self.output_file {
            return path.clone();
        }
        let name = self
            .input_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "component-definition.yaml".to_string());
        self.input_file.with_file_name(format!("composed-{name}"))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
