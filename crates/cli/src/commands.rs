// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Subcommand execution.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use attestor_oscal::{AssessmentResults, DocumentError, OscalModels};
use thiserror::Error;

use crate::cancel::CancellationToken;
use crate::cli::{Cli, Command, ComposeArgs};
use crate::compose::{ComposeError, Composer};
use crate::config::{AttestorConfig, ConfigError, ValidateSettings};
use crate::lula::BackendRegistry;
use crate::network::{Fetcher, NetworkFetcher};
use crate::validator::{ValidateError, ValidatorBuilder};

/// Errors surfaced to the user by a subcommand
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validate(#[from] ValidateError),

    #[error(transparent)]
    Compose(#[from] ComposeError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("Composition cancelled")]
    Cancelled,
}

impl CommandError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Validate(ValidateError::Cancelled))
    }
}

pub async fn run(
    cli: &Cli,
    config: &AttestorConfig,
    cancel: CancellationToken,
) -> Result<(), CommandError> {
    match &cli.command {
        Command::Validate(args) => {
            run_validate(&config.merge_cli(args), cancel).await?;
        }
        Command::Compose(args) => {
            run_compose(args, cancel).await?;
        }
    }
    Ok(())
}

/// Validate and write results, merging into an existing results file.
pub async fn run_validate(
    settings: &ValidateSettings,
    cancel: CancellationToken,
) -> Result<AssessmentResults, CommandError> {
    let work_dir = document_dir(&settings.input_file);
    let mut builder = ValidatorBuilder::new()
        .with_allow_execution(settings.confirm_execution, settings.non_interactive)
        .with_backends(Arc::new(BackendRegistry::with_builtins(work_dir)))
        .with_cancellation(cancel);
    if settings.compose {
        let fetcher: Arc<dyn Fetcher> = Arc::new(NetworkFetcher::new());
        builder = builder.with_composer(Composer::new(fetcher));
    }
    if let Some(dir) = &settings.save_resources {
        builder = builder.with_save_resources(dir);
    }
    let mut validator = builder.build();

    let mut results = validator
        .validate_on_path(&settings.input_file, settings.target.as_deref())
        .await?;

    if settings.output_file.is_file() {
        if let Some(previous) = OscalModels::load(&settings.output_file)?.assessment_results {
            tracing::info!(
                path = %settings.output_file.display(),
                previous = previous.results.len(),
                "merging with existing assessment results"
            );
            results.merge(previous);
        }
    }

    let models = OscalModels {
        component_definition: None,
        assessment_results: Some(results.clone()),
    };
    models.write(&settings.output_file)?;
    tracing::info!(path = %settings.output_file.display(), "wrote assessment results");
    Ok(results)
}

/// Compose and write the self-contained document.
pub async fn run_compose(
    args: &ComposeArgs,
    cancel: CancellationToken,
) -> Result<PathBuf, CommandError> {
    let composer = Composer::new(Arc::new(NetworkFetcher::new()));
    let models = tokio::select! {
        biased;
        () = cancel.cancelled() => return Err(CommandError::Cancelled),
        models = composer.compose_from_path(&args.input_file) => models?,
    };
    let output = args.output_path();
    models.write(&output)?;
    tracing::info!(path = %output.display(), "wrote composed document");
    Ok(output)
}

fn document_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
