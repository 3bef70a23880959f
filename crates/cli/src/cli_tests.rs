// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::panic)]

use super::*;
use std::path::Path;

fn validate_args(cli: Cli) -> ValidateArgs {
    match cli.command {
        Command::Validate(args) => args,
        other => panic!("expected validate, got {other:?}"),
    }
}

#[test]
fn test_parse_validate() {
    let cli = Cli::try_parse_from(["attestor", "validate", "-f", "component.yaml"]).unwrap();
    let args = validate_args(cli);
    assert_eq!(args.input_file, Path::new("component.yaml"));
    assert_eq!(args.output_file, None);
    assert!(!args.confirm_execution);
    assert!(!args.no_compose);
}

#[test]
fn test_parse_validate_flags() {
    let cli = Cli::try_parse_from([
        "attestor",
        "validate",
        "-f",
        "component.yaml",
        "-o",
        "results.json",
        "-t",
        "rev5",
        "--non-interactive",
        "--save-resources",
        "--resources-dir",
        "out",
        "--no-compose",
    ])
    .unwrap();
    let args = validate_args(cli);
    assert_eq!(args.output_file.as_deref(), Some(Path::new("results.json")));
    assert_eq!(args.target.as_deref(), Some("rev5"));
    assert!(args.non_interactive);
    assert!(args.save_resources);
    assert_eq!(args.resources_dir.as_deref(), Some(Path::new("out")));
    assert!(args.no_compose);
}

#[test]
fn test_global_options_after_subcommand() {
    let cli = Cli::try_parse_from([
        "attestor",
        "validate",
        "-f",
        "c.yaml",
        "--log-level",
        "debug",
        "--config",
        "attestor.toml",
    ])
    .unwrap();
    assert_eq!(cli.log_level, Some(LogLevel::Debug));
    assert_eq!(cli.config.as_deref(), Some(Path::new("attestor.toml")));
}

#[test]
fn test_input_file_required() {
    assert!(Cli::try_parse_from(["attestor", "validate"]).is_err());
    assert!(Cli::try_parse_from(["attestor", "compose"]).is_err());
}

#[test]
fn test_subcommand_required() {
    assert!(Cli::try_parse_from(["attestor"]).is_err());
}

#[test]
fn test_compose_default_output_is_next_to_input() {
    let cli = Cli::try_parse_from(["attestor", "compose", "-f", "defs/component.yaml"]).unwrap();
    let Command::Compose(args) = cli.command else {
        panic!("expected compose");
    };
    assert_eq!(
        args.output_path(),
        Path::new("defs").join("composed-component.yaml")
    );
}

#[test]
fn test_compose_explicit_output() {
    let args = ComposeArgs {
        input_file: "component.yaml".into(),
        output_file: Some("out.json".into()),
    };
    assert_eq!(args.output_path(), Path::new("out.json"));
}

#[test]
fn test_log_level_names() {
    assert_eq!(LogLevel::default().as_str(), "info");
    assert_eq!(LogLevel::Trace.as_str(), "trace");
}
