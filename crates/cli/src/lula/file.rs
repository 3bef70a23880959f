// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in domain reading local files.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use super::backend::{BackendError, Domain, DomainResources};
use crate::cancel::CancellationToken;

/// `file-spec` body
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSpec {
    pub filepaths: Vec<FileInfo>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileInfo {
    /// Key the file's content is stored under
    pub name: String,
    /// Path or glob pattern, relative to the working directory
    pub path: String,
    /// Force a parser instead of choosing one by extension
    #[serde(default)]
    pub parser: Option<FileParser>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileParser {
    Json,
    Yaml,
    String,
}

impl FileParser {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::Json,
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::String,
        }
    }
}

/// Reads declared files. Never executable.
#[derive(Debug)]
pub struct FileDomain {
    spec: FileSpec,
    work_dir: PathBuf,
}

impl FileDomain {
    pub fn from_spec(body: &serde_json::Value, work_dir: PathBuf) -> Result<Self, BackendError> {
        let spec: FileSpec =
            serde_json::from_value(body.clone()).map_err(|e| BackendError::InvalidSpec {
                kind: "file".to_string(),
                reason: e.to_string(),
            })?;
        if spec.filepaths.is_empty() {
            return Err(BackendError::InvalidSpec {
                kind: "file".to_string(),
                reason: "filepaths is empty".to_string(),
            });
        }
        Ok(Self { spec, work_dir })
    }

    async fn read(
        &self,
        path: &Path,
        parser: Option<FileParser>,
    ) -> Result<serde_json::Value, BackendError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| BackendError::Collection(format!("{}: {e}", path.display())))?;
        parse_content(path, &content, parser.unwrap_or_else(|| FileParser::for_path(path)))
    }

    async fn read_pattern(
        &self,
        pattern: &Path,
        parser: Option<FileParser>,
    ) -> Result<serde_json::Value, BackendError> {
        let pattern = pattern.to_string_lossy();
        let paths: Vec<PathBuf> = glob::glob(&pattern)
            .map_err(|e| BackendError::Collection(format!("{pattern}: {e}")))?
            .collect::<Result<_, _>>()
            .map_err(|e| BackendError::Collection(e.to_string()))?;
        let mut matches = serde_json::Map::new();
        for path in paths {
            let key = path
                .strip_prefix(&self.work_dir)
                .unwrap_or(path.as_path())
                .display()
                .to_string();
            matches.insert(key, self.read(&path, parser).await?);
        }
        Ok(serde_json::Value::Object(matches))
    }
}

fn is_pattern(path: &str) -> bool {
    path.contains(['*', '?', '['])
}

fn parse_content(
    path: &Path,
    content: &str,
    parser: FileParser,
) -> Result<serde_json::Value, BackendError> {
    let invalid = |e: String| BackendError::Collection(format!("{}: {e}", path.display()));
    match parser {
        FileParser::Json => serde_json::from_str(content).map_err(|e| invalid(e.to_string())),
        FileParser::Yaml => serde_yaml::from_str(content).map_err(|e| invalid(e.to_string())),
        FileParser::String => Ok(serde_json::Value::String(content.to_string())),
    }
}

#[async_trait]
impl Domain for FileDomain {
    async fn get_resources(
        &self,
        cancel: &CancellationToken,
    ) -> Result<DomainResources, BackendError> {
        let mut resources = DomainResources::new();
        for info in &self.spec.filepaths {
            if cancel.is_cancelled() {
                return Err(BackendError::Cancelled);
            }
            let path = self.work_dir.join(&info.path);
            let value = if is_pattern(&info.path) {
                self.read_pattern(&path, info.parser).await?
            } else {
                self.read(&path, info.parser).await?
            };
            resources.insert(info.name.clone(), value);
        }
        Ok(resources)
    }

    fn is_executable(&self) -> bool {
        false
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
