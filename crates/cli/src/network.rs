// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fetching remote and local documents referenced from links.
//!
//! An href is either a `file://` URL, an `http(s)://` URL, or a bare path
//! resolved against the referencing document's directory. Any href may carry
//! an `@<hex>` suffix holding a sha256 or sha512 digest of the expected
//! content.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use sha2::{Digest, Sha256, Sha512};
use thiserror::Error;

use crate::env;

/// Default HTTP fetch timeout
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

/// Errors that can occur when fetching a document
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Request to '{url}' failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to '{url}' returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Checksum mismatch for '{href}': expected {expected}, got {actual}")]
    Checksum {
        href: String,
        expected: String,
        actual: String,
    },

    #[error("Unsupported scheme in '{0}'")]
    UnsupportedScheme(String),
}

/// Source of document bytes for composition and imports.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, href: &str, base_dir: Option<&Path>) -> Result<Vec<u8>, FetchError>;
}

/// Where an href points once the checksum suffix is removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Local(PathBuf),
    Remote(String),
}

impl Location {
    pub fn parse(href: &str, base_dir: Option<&Path>) -> Result<Self, FetchError> {
        let (target, _) = split_checksum(href);
        if let Some(path) = target.strip_prefix("file://") {
            return Ok(Self::Local(resolve_path(path, base_dir)));
        }
        if target.starts_with("http://") || target.starts_with("https://") {
            let url = reqwest::Url::parse(target).map_err(|e| FetchError::InvalidUrl {
                url: target.to_string(),
                reason: e.to_string(),
            })?;
            if url.host_str().is_none() {
                return Err(FetchError::InvalidUrl {
                    url: target.to_string(),
                    reason: "missing host".to_string(),
                });
            }
            return Ok(Self::Remote(url.to_string()));
        }
        if target.contains("://") {
            return Err(FetchError::UnsupportedScheme(target.to_string()));
        }
        Ok(Self::Local(resolve_path(target, base_dir)))
    }

    /// Directory that relative references inside the fetched document resolve against.
    pub fn base_dir(&self) -> Option<PathBuf> {
        match self {
            Self::Local(path) => path.parent().map(Path::to_path_buf),
            Self::Remote(_) => None,
        }
    }
}

fn resolve_path(path: &str, base_dir: Option<&Path>) -> PathBuf {
    let path = Path::new(path);
    match base_dir {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    }
}

/// Split an `href@digest` into the target and the digest, when the suffix is a
/// sha256 or sha512 hex digest.
pub fn split_checksum(href: &str) -> (&str, Option<&str>) {
    if let Some((target, digest)) = href.rsplit_once('@') {
        if matches!(digest.len(), 64 | 128) && digest.chars().all(|c| c.is_ascii_hexdigit()) {
            return (target, Some(digest));
        }
    }
    (href, None)
}

fn verify_checksum(href: &str, bytes: &[u8], expected: &str) -> Result<(), FetchError> {
    let actual = if expected.len() == 64 {
        hex::encode(Sha256::digest(bytes))
    } else {
        hex::encode(Sha512::digest(bytes))
    };
    if !actual.eq_ignore_ascii_case(expected) {
        return Err(FetchError::Checksum {
            href: href.to_string(),
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

/// Fetches over the filesystem and HTTP.
pub struct NetworkFetcher {
    client: reqwest::Client,
}

impl NetworkFetcher {
    pub fn new() -> Self {
        let timeout_ms = env::fetch_timeout_ms().unwrap_or(DEFAULT_FETCH_TIMEOUT_MS);
        Self::with_timeout(Duration::from_millis(timeout_ms))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }

    async fn fetch_local(&self, path: &Path) -> Result<Vec<u8>, FetchError> {
        tokio::fs::read(path).await.map_err(|source| FetchError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    async fn fetch_remote(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;
        if !resp.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }
        resp.bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })
    }
}

impl Default for NetworkFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for NetworkFetcher {
    async fn fetch(&self, href: &str, base_dir: Option<&Path>) -> Result<Vec<u8>, FetchError> {
        let location = Location::parse(href, base_dir)?;
        tracing::debug!(href, ?location, "fetching");
        let bytes = match &location {
            Location::Local(path) => self.fetch_local(path).await?,
            Location::Remote(url) => self.fetch_remote(url).await?,
        };
        if let (_, Some(expected)) = split_checksum(href) {
            verify_checksum(href, &bytes, expected)?;
        }
        Ok(bytes)
    }
}

#[cfg(test)]
#[path = "network_tests.rs"]
mod tests;
