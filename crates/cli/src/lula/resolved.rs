// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Resolved, runnable validations.

use std::collections::BTreeMap;

use attestor_oscal::ObjectiveState;
use thiserror::Error;

use super::backend::{BackendError, BackendRegistry, Domain, DomainResources, Provider};
use super::definition::Validation;
use crate::cancel::CancellationToken;

/// Errors from running a single validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Validation run cancelled")]
    Cancelled,

    #[error("Validation has no domain")]
    MissingDomain,

    #[error("Validation has no provider")]
    MissingProvider,

    #[error("Domain failed: {0}")]
    Domain(#[source] BackendError),

    #[error("Provider failed: {0}")]
    Provider(#[source] BackendError),
}

/// Outcome counts and remarks of an evaluated validation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub passing: u32,
    pub failing: u32,
    pub observations: BTreeMap<String, String>,
}

impl ValidationResult {
    /// Satisfied only with at least one pass and no failures.
    pub fn state(&self) -> ObjectiveState {
        if self.passing > 0 && self.failing == 0 {
            ObjectiveState::Satisfied
        } else {
            ObjectiveState::NotSatisfied
        }
    }
}

/// What `LulaValidation::validate` did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Evaluated,
    AlreadyEvaluated,
    /// Requires execution that was not allowed; left unevaluated.
    Skipped,
}

/// A validation bound to concrete domain and provider implementations.
pub struct LulaValidation {
    pub uuid: String,
    pub name: String,
    pub domain: Option<Box<dyn Domain>>,
    pub provider: Option<Box<dyn Provider>>,
    pub evaluated: bool,
    pub result: ValidationResult,
    pub domain_resources: Option<DomainResources>,
}

impl std::fmt::Debug for LulaValidation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LulaValidation")
            .field("uuid", &self.uuid)
            .field("name", &self.name)
            .field("evaluated", &self.evaluated)
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

impl LulaValidation {
    /// Bind a serialized validation to backends from the registry.
    pub fn resolve(
        validation: &Validation,
        uuid: impl Into<String>,
        backends: &BackendRegistry,
    ) -> Result<Self, BackendError> {
        let domain = validation
            .domain
            .as_ref()
            .ok_or(BackendError::MissingDomain)?;
        let provider = validation
            .provider
            .as_ref()
            .ok_or(BackendError::MissingProvider)?;

        Ok(Self {
            uuid: uuid.into(),
            name: validation.name().to_string(),
            domain: Some(backends.build_domain(domain)?),
            provider: Some(backends.build_provider(provider)?),
            evaluated: false,
            result: ValidationResult::default(),
            domain_resources: None,
        })
    }

    /// An already-evaluated validation with a single failure, standing in for
    /// validation logic that could not be resolved.
    pub fn failing(uuid: impl Into<String>, reason: impl Into<String>) -> Self {
        let mut observations = BTreeMap::new();
        observations.insert("Error".to_string(), reason.into());
        Self {
            uuid: uuid.into(),
            name: "Failing validation".to_string(),
            domain: None,
            provider: None,
            evaluated: true,
            result: ValidationResult {
                passing: 0,
                failing: 1,
                observations,
            },
            domain_resources: None,
        }
    }

    pub fn requires_execution(&self) -> bool {
        self.domain.as_ref().is_some_and(|d| d.is_executable())
    }

    /// Collect resources and evaluate them, once.
    pub async fn validate(
        &mut self,
        cancel: &CancellationToken,
        allow_execution: bool,
    ) -> Result<RunStatus, ValidationError> {
        if cancel.is_cancelled() {
            return Err(ValidationError::Cancelled);
        }
        if self.evaluated {
            return Ok(RunStatus::AlreadyEvaluated);
        }
        if self.requires_execution() && !allow_execution {
            return Ok(RunStatus::Skipped);
        }

        let domain = self.domain.as_ref().ok_or(ValidationError::MissingDomain)?;
        let provider = self
            .provider
            .as_ref()
            .ok_or(ValidationError::MissingProvider)?;

        let resources = domain
            .get_resources(cancel)
            .await
            .map_err(|e| cancelled_or(cancel, e, ValidationError::Domain))?;
        if cancel.is_cancelled() {
            return Err(ValidationError::Cancelled);
        }
        let outcome = provider
            .evaluate(&resources)
            .await
            .map_err(|e| cancelled_or(cancel, e, ValidationError::Provider))?;

        self.domain_resources = Some(resources);
        self.result = ValidationResult {
            passing: outcome.passing,
            failing: outcome.failing,
            observations: outcome.observations,
        };
        self.evaluated = true;
        Ok(RunStatus::Evaluated)
    }

    /// Record an error as this validation's failed result.
    pub fn fail_with(&mut self, reason: impl Into<String>) {
        self.result.passing = 0;
        self.result.failing = 1;
        self.result
            .observations
            .insert("Error".to_string(), reason.into());
        self.evaluated = true;
    }
}

fn cancelled_or(
    cancel: &CancellationToken,
    err: BackendError,
    wrap: fn(BackendError) -> ValidationError,
) -> ValidationError {
    if cancel.is_cancelled() || matches!(err, BackendError::Cancelled) {
        ValidationError::Cancelled
    } else {
        wrap(err)
    }
}

#[cfg(test)]
#[path = "resolved_tests.rs"]
mod tests;
