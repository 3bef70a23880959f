// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration file and its merge with command-line flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::{ValidateArgs, DEFAULT_RESULTS_FILE};

/// Config file read from the working directory when none is named
pub const DEFAULT_CONFIG_FILE: &str = "attestor.toml";

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings file contents. Every field is optional.
///
/// ```toml
/// log_level = "debug"
/// target = "https://example.com/catalog"
/// non_interactive = true
/// save_resources = true
/// resources_dir = "out/resources"
/// compose = false
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AttestorConfig {
    pub log_level: Option<String>,
    pub target: Option<String>,
    pub confirm_execution: bool,
    pub non_interactive: bool,
    pub save_resources: bool,
    pub resources_dir: Option<PathBuf>,
    pub compose: bool,
}

impl Default for AttestorConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            target: None,
            confirm_execution: false,
            non_interactive: false,
            save_resources: false,
            resources_dir: None,
            compose: true,
        }
    }
}

impl AttestorConfig {
    /// Load from a `.json` or TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if path.extension().is_some_and(|e| e == "json") {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(toml::from_str(&content)?)
        }
    }

    /// Find the config to use: `explicit` (`--config` or `ATTESTOR_CONFIG`),
    /// then `attestor.toml` in `cwd`. Defaults when none exists.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let local = cwd.join(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            tracing::debug!(path = %local.display(), "using local config");
            return Self::load(&local);
        }
        Ok(Self::default())
    }

    /// Combine with `validate` flags. Flags that are set win; unset flags
    /// fall back to the file.
    pub fn merge_cli(&self, args: &ValidateArgs) -> ValidateSettings {
        let output_file = args
            .output_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_FILE));
        let save_resources = (args.save_resources || self.save_resources).then(|| {
            args.resources_dir
                .clone()
                .or_else(|| self.resources_dir.clone())
                .unwrap_or_else(|| default_resources_dir(&output_file))
        });
        ValidateSettings {
            input_file: args.input_file.clone(),
            target: args.target.clone().or_else(|| self.target.clone()),
            confirm_execution: args.confirm_execution || self.confirm_execution,
            non_interactive: args.non_interactive || self.non_interactive,
            save_resources,
            compose: self.compose && !args.no_compose,
            output_file,
        }
    }
}

fn default_resources_dir(output_file: &Path) -> PathBuf {
    match output_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join("resources"),
        _ => PathBuf::from("resources"),
    }
}

/// Effective settings for one `validate` run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidateSettings {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub target: Option<String>,
    pub confirm_execution: bool,
    pub non_interactive: bool,
    /// Directory for collected resources, when saving is enabled
    pub save_resources: Option<PathBuf>,
    pub compose: bool,
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
