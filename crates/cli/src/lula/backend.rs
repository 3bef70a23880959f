// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Domain and provider capabilities, and the registry that builds them from
//! a validation's type discriminators.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use super::definition::{DomainKind, DomainSpec, ProviderKind, ProviderSpec};
use super::file::FileDomain;
use crate::cancel::CancellationToken;

/// Collected resources, keyed by the names the domain spec declares.
pub type DomainResources = serde_json::Map<String, serde_json::Value>;

/// Errors raised by domains, providers and the registry
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("No {0} domain is available")]
    UnsupportedDomain(DomainKind),

    #[error("No {0} provider is available")]
    UnsupportedProvider(ProviderKind),

    #[error("Validation has no domain")]
    MissingDomain,

    #[error("Validation has no provider")]
    MissingProvider,

    #[error("Invalid {kind} spec: {reason}")]
    InvalidSpec { kind: String, reason: String },

    #[error("Failed to collect resources: {0}")]
    Collection(String),

    #[error("Failed to evaluate resources: {0}")]
    Evaluation(String),

    #[error("Cancelled")]
    Cancelled,
}

/// Resource collector.
#[async_trait]
pub trait Domain: Send + Sync {
    async fn get_resources(
        &self,
        cancel: &CancellationToken,
    ) -> Result<DomainResources, BackendError>;

    /// Whether collecting resources has side effects (creating objects,
    /// sending requests) that need operator consent.
    fn is_executable(&self) -> bool;
}

/// Policy evaluator.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn evaluate(&self, resources: &DomainResources) -> Result<ProviderOutcome, BackendError>;
}

/// Pass/fail counts and remarks from one evaluation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProviderOutcome {
    pub passing: u32,
    pub failing: u32,
    pub observations: BTreeMap<String, String>,
}

type DomainFactory =
    Arc<dyn Fn(&serde_json::Value) -> Result<Box<dyn Domain>, BackendError> + Send + Sync>;
type ProviderFactory =
    Arc<dyn Fn(&serde_json::Value) -> Result<Box<dyn Provider>, BackendError> + Send + Sync>;

/// Builds domains and providers keyed on their type discriminator.
#[derive(Clone, Default)]
pub struct BackendRegistry {
    domains: HashMap<DomainKind, DomainFactory>,
    providers: HashMap<ProviderKind, ProviderFactory>,
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("domains", &self.domains.keys().collect::<Vec<_>>())
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in file domain, reading paths relative to `work_dir`.
    ///
    /// No provider is built in; see [`BackendRegistry::register_provider`].
    pub fn with_builtins(work_dir: impl Into<PathBuf>) -> Self {
        let work_dir = work_dir.into();
        let mut registry = Self::new();
        registry.register_domain(DomainKind::File, move |spec| {
            Ok(Box::new(FileDomain::from_spec(spec, work_dir.clone())?) as Box<dyn Domain>)
        });
        registry
    }

    pub fn register_domain<F>(&mut self, kind: DomainKind, factory: F)
    where
        F: Fn(&serde_json::Value) -> Result<Box<dyn Domain>, BackendError> + Send + Sync + 'static,
    {
        self.domains.insert(kind, Arc::new(factory));
    }

    pub fn register_provider<F>(&mut self, kind: ProviderKind, factory: F)
    where
        F: Fn(&serde_json::Value) -> Result<Box<dyn Provider>, BackendError>
            + Send
            + Sync
            + 'static,
    {
        self.providers.insert(kind, Arc::new(factory));
    }

    pub fn build_domain(&self, spec: &DomainSpec) -> Result<Box<dyn Domain>, BackendError> {
        let factory = self
            .domains
            .get(&spec.kind())
            .ok_or(BackendError::UnsupportedDomain(spec.kind()))?;
        factory(spec.body())
    }

    pub fn build_provider(&self, spec: &ProviderSpec) -> Result<Box<dyn Provider>, BackendError> {
        let factory = self
            .providers
            .get(&spec.kind())
            .ok_or(BackendError::UnsupportedProvider(spec.kind()))?;
        factory(spec.body())
    }
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
