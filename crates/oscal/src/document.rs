// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Whole-document loading and writing.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ComponentDefinition;
use crate::results::AssessmentResults;

/// Errors that can occur when reading or writing documents
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to access document '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to encode document as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk encoding, chosen by file extension
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        if path.extension().is_some_and(|e| e == "json") {
            Self::Json
        } else {
            Self::Yaml
        }
    }
}

/// A document holding one or more top-level models
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OscalModels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_definition: Option<ComponentDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment_results: Option<AssessmentResults>,
}

impl OscalModels {
    /// Parse YAML or JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DocumentError> {
        Ok(serde_yaml::from_slice(bytes)?)
    }

    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let bytes = std::fs::read(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_slice(&bytes)
    }

    pub fn to_string(&self, format: DocumentFormat) -> Result<String, DocumentError> {
        match format {
            DocumentFormat::Yaml => Ok(serde_yaml::to_string(self)?),
            DocumentFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    /// Write to `path`, encoding by its extension.
    pub fn write(&self, path: &Path) -> Result<(), DocumentError> {
        let content = self.to_string(DocumentFormat::from_path(path))?;
        std::fs::write(path, content).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
