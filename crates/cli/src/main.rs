// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! attestor binary entry point.

use std::path::PathBuf;

use clap::Parser;

use attestor::cancel::CancellationToken;
use attestor::cli::{Cli, LogLevel};
use attestor::commands;
use attestor::config::AttestorConfig;
use attestor::logging;
use attestor::output::{print_error, print_warning};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = match AttestorConfig::discover(cli.config.as_deref(), &cwd) {
        Ok(config) => config,
        Err(e) => {
            print_error(e);
            std::process::exit(1);
        }
    };

    let level = cli
        .log_level
        .map(|level| level.as_str().to_string())
        .or_else(|| config.log_level.clone())
        .unwrap_or_else(|| LogLevel::default().as_str().to_string());
    logging::init(&level);

    // Ctrl+C cancels composition fetches at once and validation runs between validations.
    let cancel = CancellationToken::new();
    let signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            print_warning("Interrupted, cancelling validation");
            signal.cancel();
        }
    });

    if let Err(e) = commands::run(&cli, &config, cancel).await {
        print_error(&e);
        std::process::exit(if e.is_cancelled() { 130 } else { 1 });
    }
    Ok(())
}
