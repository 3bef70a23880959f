// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Validation passes over component definitions.
//!
//! A pass groups control implementations by target (source or framework),
//! evaluates every validation linked from each group once, and turns the
//! resulting findings into assessment results.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use attestor_oscal::{
    update_prop, AssessmentResult, AssessmentResults, ComponentDefinition,
    ControlImplementationSet, DocumentError, Finding, Observation, OscalModels, LULA_NAMESPACE,
};
use thiserror::Error;

use crate::cancel::CancellationToken;
use crate::compose::{ComposeError, Composer};
use crate::consent::{ExecutionConfirmer, ExecutionPolicy, TerminalConfirmer};
use crate::lula::BackendRegistry;
use crate::output::print_findings_table;
use crate::store::{RequirementStore, RunError, ValidationStore};

/// Errors that abort a validation pass
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("Failed to compose document: {0}")]
    Compose(#[from] ComposeError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("Document has no component definition")]
    NoComponentDefinition,

    #[error("No components found in component definition")]
    NoComponents,

    #[error("No control implementations found in component definition")]
    NoControlImplementations,

    #[error("Target '{0}' not found")]
    TargetNotFound(String),

    #[error("Validation run cancelled")]
    Cancelled,
}

impl From<RunError> for ValidateError {
    fn from(err: RunError) -> Self {
        match err {
            RunError::Cancelled => Self::Cancelled,
        }
    }
}

/// Findings of one target plus the observations they reference
#[derive(Clone, Debug, Default)]
pub struct GroupOutcome {
    pub findings: BTreeMap<String, Finding>,
    pub observations: Vec<Observation>,
}

/// Builder for [`Validator`].
///
/// ```ignore
/// let mut validator = ValidatorBuilder::new()
///     .with_composer(Composer::new(fetcher))
///     .with_allow_execution(false, true)
///     .build();
/// let results = validator.validate_on_path(path, None).await?;
/// ```
pub struct ValidatorBuilder {
    composer: Option<Composer>,
    policy: ExecutionPolicy,
    save_resources: Option<PathBuf>,
    confirmer: Option<Arc<dyn ExecutionConfirmer>>,
    backends: Option<Arc<BackendRegistry>>,
    cancel: CancellationToken,
}

impl Default for ValidatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidatorBuilder {
    pub fn new() -> Self {
        Self {
            composer: None,
            policy: ExecutionPolicy::default(),
            save_resources: None,
            confirmer: None,
            backends: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Compose documents before validating them.
    pub fn with_composer(mut self, composer: Composer) -> Self {
        self.composer = Some(composer);
        self
    }

    pub fn with_allow_execution(mut self, confirm: bool, non_interactive: bool) -> Self {
        self.policy = ExecutionPolicy::from_flags(confirm, non_interactive);
        self
    }

    /// Write collected domain resources under `dir`.
    pub fn with_save_resources(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_resources = Some(dir.into());
        self
    }

    pub fn with_confirmer(mut self, confirmer: Arc<dyn ExecutionConfirmer>) -> Self {
        self.confirmer = Some(confirmer);
        self
    }

    pub fn with_backends(mut self, backends: Arc<BackendRegistry>) -> Self {
        self.backends = Some(backends);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn build(self) -> Validator {
        let backends = self.backends.unwrap_or_else(|| {
            let work_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            Arc::new(BackendRegistry::with_builtins(work_dir))
        });
        Validator {
            composer: self.composer,
            policy: self.policy,
            save_resources: self.save_resources,
            confirmer: self
                .confirmer
                .unwrap_or_else(|| Arc::new(TerminalConfirmer)),
            backends,
            cancel: self.cancel,
        }
    }
}

pub struct Validator {
    composer: Option<Composer>,
    policy: ExecutionPolicy,
    save_resources: Option<PathBuf>,
    confirmer: Arc<dyn ExecutionConfirmer>,
    backends: Arc<BackendRegistry>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("compose", &self.composer.is_some())
            .field("policy", &self.policy)
            .field("save_resources", &self.save_resources)
            .finish_non_exhaustive()
    }
}

impl Validator {
    pub fn policy(&self) -> ExecutionPolicy {
        self.policy
    }

    /// Load (and compose, when configured) the document at `path` and
    /// validate its component definition.
    ///
    /// Cancellation interrupts in-flight composition fetches.
    pub async fn validate_on_path(
        &mut self,
        path: &Path,
        target: Option<&str>,
    ) -> Result<AssessmentResults, ValidateError> {
        let cancel = self.cancel.clone();
        let models = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(ValidateError::Cancelled),
            models = self.load(path) => models?,
        };
        if cancel.is_cancelled() {
            return Err(ValidateError::Cancelled);
        }
        let comp_def = models
            .component_definition
            .ok_or(ValidateError::NoComponentDefinition)?;
        let results = self.validate_on_comp_def(&comp_def, target).await?;
        Ok(AssessmentResults::new(results))
    }

    async fn load(&self, path: &Path) -> Result<OscalModels, ValidateError> {
        Ok(match &self.composer {
            Some(composer) => composer.compose_from_path(path).await?,
            None => OscalModels::load(path)?,
        })
    }

    /// One result per target, or only for `target` when given.
    pub async fn validate_on_comp_def(
        &mut self,
        comp_def: &ComponentDefinition,
        target: Option<&str>,
    ) -> Result<Vec<AssessmentResult>, ValidateError> {
        if comp_def.components.is_none() {
            return Err(ValidateError::NoComponents);
        }
        let groups = comp_def.control_implementations_by_target();
        if groups.is_empty() {
            return Err(ValidateError::NoControlImplementations);
        }
        let selected: Vec<(&str, &[ControlImplementationSet])> = match target {
            Some(target) => {
                let cis = groups
                    .get(target)
                    .ok_or_else(|| ValidateError::TargetNotFound(target.to_string()))?;
                vec![(target, cis.as_slice())]
            }
            None => groups
                .iter()
                .map(|(target, cis)| (target.as_str(), cis.as_slice()))
                .collect(),
        };

        let mut store =
            ValidationStore::from_back_matter(comp_def.resources(), Arc::clone(&self.backends));
        let mut results = Vec::with_capacity(selected.len());
        for (target, cis) in selected {
            let outcome = self
                .validate_on_control_implementations(cis, &mut store, target)
                .await?;
            let mut result = AssessmentResult::from_findings(
                format!(
                    "Assessment results for performing Validations with attestor version {}",
                    env!("CARGO_PKG_VERSION")
                ),
                &outcome.findings,
                outcome.observations,
            );
            let props = result.props.get_or_insert_with(Vec::new);
            update_prop(props, "threshold", Some(LULA_NAMESPACE), "false");
            update_prop(props, "target", Some(LULA_NAMESPACE), target);
            results.push(result);
        }
        Ok(results)
    }

    /// Evaluate one group of control implementations against a shared store.
    ///
    /// Asks for consent when a validation needs execution and the policy is
    /// to prompt; the answer holds for the rest of this validator's passes.
    pub async fn validate_on_control_implementations(
        &mut self,
        control_implementations: &[ControlImplementationSet],
        store: &mut ValidationStore,
        target: &str,
    ) -> Result<GroupOutcome, ValidateError> {
        tracing::info!(target, "collecting requirements and validations");
        let mut requirements = RequirementStore::new(control_implementations);
        requirements.resolve_lula_validations(store);

        let stats = requirements.get_stats(store);
        tracing::info!(
            requirements = stats.total_requirements,
            validations = stats.total_validations,
            "resolved requirements"
        );
        if stats.executable_validations {
            if self.policy == ExecutionPolicy::Prompt {
                self.policy = if self.confirmer.confirm(&stats.executable_validations_msg) {
                    ExecutionPolicy::Allow
                } else {
                    ExecutionPolicy::Deny
                };
            }
            if !self.policy.allows() {
                tracing::warn!("validations requiring execution will not be run");
            }
        }

        tracing::info!(target, "running validations");
        let observations = store
            .run_validations(
                &self.cancel,
                self.policy.allows(),
                self.save_resources.as_deref(),
            )
            .await?;
        let findings = requirements.generate_findings(store);
        print_findings_table(target, &findings);

        let referenced: HashSet<&str> = findings
            .values()
            .flat_map(|f| f.related_observations.iter().flatten())
            .map(|r| r.observation_uuid.as_str())
            .collect();
        let observations = observations
            .into_iter()
            .filter(|o| referenced.contains(o.uuid.as_str()))
            .collect();
        Ok(GroupOutcome {
            findings,
            observations,
        })
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
