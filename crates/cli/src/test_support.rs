// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Fakes shared by unit tests.
//!
//! Scripted domains and providers read their behavior from the validation's
//! spec body, so test documents fully describe their outcomes:
//!
//! ```yaml
//! domain:
//!   type: kubernetes
//!   kubernetes-spec: { executable: true }
//! provider:
//!   type: opa
//!   opa-spec: { passing: 1, failing: 0 }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;

use crate::cancel::CancellationToken;
use crate::lula::{
    BackendError, BackendRegistry, Domain, DomainKind, DomainResources, Provider, ProviderKind,
    ProviderOutcome,
};
use crate::network::{FetchError, Fetcher};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DomainScript {
    executable: bool,
    error: Option<String>,
    cancel: bool,
}

pub struct ScriptedDomain {
    script: DomainScript,
}

#[async_trait]
impl Domain for ScriptedDomain {
    async fn get_resources(
        &self,
        cancel: &CancellationToken,
    ) -> Result<DomainResources, BackendError> {
        if self.script.cancel {
            cancel.cancel();
            return Err(BackendError::Cancelled);
        }
        if let Some(err) = &self.script.error {
            return Err(BackendError::Collection(err.clone()));
        }
        let mut resources = DomainResources::new();
        resources.insert("pods".to_string(), serde_json::json!([{"name": "demo"}]));
        Ok(resources)
    }

    fn is_executable(&self) -> bool {
        self.script.executable
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProviderScript {
    passing: u32,
    failing: u32,
    error: Option<String>,
}

pub struct ScriptedProvider {
    script: ProviderScript,
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn evaluate(&self, _resources: &DomainResources) -> Result<ProviderOutcome, BackendError> {
        if let Some(err) = &self.script.error {
            return Err(BackendError::Evaluation(err.clone()));
        }
        let mut observations = BTreeMap::new();
        observations.insert(
            "scripted".to_string(),
            format!("{} passing, {} failing", self.script.passing, self.script.failing),
        );
        Ok(ProviderOutcome {
            passing: self.script.passing,
            failing: self.script.failing,
            observations,
        })
    }
}

/// Registry whose kubernetes and api domains and opa provider are scripted.
pub fn scripted_registry() -> BackendRegistry {
    counting_registry(Arc::new(AtomicUsize::new(0)))
}

/// Scripted registry that counts domain constructions, i.e. validation parses.
pub fn counting_registry(builds: Arc<AtomicUsize>) -> BackendRegistry {
    let mut registry = BackendRegistry::with_builtins(std::env::temp_dir());
    for kind in [DomainKind::Kubernetes, DomainKind::Api] {
        let builds = Arc::clone(&builds);
        registry.register_domain(kind, move |spec| {
            builds.fetch_add(1, Ordering::SeqCst);
            let script: DomainScript = serde_json::from_value(spec.clone()).unwrap_or_default();
            Ok(Box::new(ScriptedDomain { script }) as Box<dyn Domain>)
        });
    }
    registry.register_provider(ProviderKind::Opa, |spec| {
        let script: ProviderScript = serde_json::from_value(spec.clone()).unwrap_or_default();
        Ok(Box::new(ScriptedProvider { script }) as Box<dyn Provider>)
    });
    registry
}

/// YAML for a scripted validation.
pub fn validation_yaml(uuid: &str, name: &str, passing: u32, failing: u32) -> String {
    validation_yaml_with(
        uuid,
        name,
        &format!("passing: {passing}\n    failing: {failing}"),
        "executable: false",
    )
}

/// YAML for a scripted validation whose domain requires execution.
pub fn executable_validation_yaml(uuid: &str, name: &str) -> String {
    validation_yaml_with(uuid, name, "passing: 1\n    failing: 0", "executable: true")
}

pub fn validation_yaml_with(uuid: &str, name: &str, provider: &str, domain: &str) -> String {
    format!(
        "lula-version: \">=0.1.0\"
metadata:
  name: {name}
  uuid: {uuid}
domain:
  type: kubernetes
  kubernetes-spec:
    {domain}
provider:
  type: opa
  opa-spec:
    {provider}
"
    )
}

/// In-memory fetcher recording every href it is asked for.
#[derive(Default)]
pub struct RecordingFetcher {
    documents: Mutex<HashMap<String, Vec<u8>>>,
    calls: Mutex<Vec<String>>,
}

impl RecordingFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, href: &str, content: impl Into<Vec<u8>>) {
        self.documents.lock().insert(href.to_string(), content.into());
    }

    pub fn fetch_count(&self, href: &str) -> usize {
        self.calls.lock().iter().filter(|h| *h == href).count()
    }

    pub fn total_fetches(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl Fetcher for RecordingFetcher {
    async fn fetch(&self, href: &str, _base_dir: Option<&Path>) -> Result<Vec<u8>, FetchError> {
        self.calls.lock().push(href.to_string());
        self.documents
            .lock()
            .get(href)
            .cloned()
            .ok_or_else(|| FetchError::Io {
                path: href.into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            })
    }
}
