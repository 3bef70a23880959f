// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Lazily resolved validations and their observations.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use attestor_oscal::{
    add_id_prefix, trim_id_prefix, Link, ObjectiveState, Observation, Property,
    RelatedObservation, RelevantEvidence, Resource, LULA_NAMESPACE,
};
use base64::Engine;
use chrono::Utc;
use thiserror::Error;

use crate::cancel::CancellationToken;
use crate::lula::{
    BackendError, BackendRegistry, LulaValidation, RunStatus, Validation, ValidationError,
};

/// Errors that can occur when resolving a validation
#[derive(Debug, Error)]
pub enum ValidationStoreError {
    #[error("Validation '{0}' not found")]
    NotFound(String),

    #[error("Failed to parse validation '{id}': {source}")]
    Parse {
        id: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to resolve validation '{id}': {source}")]
    Resolve {
        id: String,
        #[source]
        source: BackendError,
    },
}

/// Terminal errors from a validation run
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Validation run cancelled")]
    Cancelled,
}

/// How a validation's observation counts toward its finding
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Satisfied,
    NotSatisfied,
    NotEvaluated,
}

pub struct ValidationStore {
    back_matter: HashMap<String, String>,
    validations: BTreeMap<String, LulaValidation>,
    observations: HashMap<String, Observation>,
    backends: Arc<BackendRegistry>,
}

impl std::fmt::Debug for ValidationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationStore")
            .field("back_matter", &self.back_matter.len())
            .field("validations", &self.validations.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl ValidationStore {
    pub fn new(backends: Arc<BackendRegistry>) -> Self {
        Self {
            back_matter: HashMap::new(),
            validations: BTreeMap::new(),
            observations: HashMap::new(),
            backends,
        }
    }

    /// Index back-matter content by id. Nothing is parsed until requested.
    pub fn from_back_matter(resources: &[Resource], backends: Arc<BackendRegistry>) -> Self {
        let mut store = Self::new(backends);
        for resource in resources {
            if let Some(content) = resource_content(resource) {
                store.back_matter.insert(resource.uuid.clone(), content);
            }
        }
        store
    }

    /// Resolve and store a validation, assigning it a uuid if it has none.
    pub fn add_validation(
        &mut self,
        validation: &mut Validation,
    ) -> Result<String, ValidationStoreError> {
        let id = validation.ensure_uuid();
        let resolved = LulaValidation::resolve(validation, id.clone(), &self.backends).map_err(
            |source| ValidationStoreError::Resolve {
                id: id.clone(),
                source,
            },
        )?;
        self.validations.insert(id.clone(), resolved);
        Ok(id)
    }

    pub fn add_lula_validation(&mut self, validation: LulaValidation, id: &str) {
        self.validations
            .insert(trim_id_prefix(id).to_string(), validation);
    }

    /// Cached validation for `id`, parsing it from the back-matter on first use.
    pub fn get_lula_validation(
        &mut self,
        id: &str,
    ) -> Result<&LulaValidation, ValidationStoreError> {
        let id = trim_id_prefix(id);
        if !self.validations.contains_key(id) {
            let raw = self
                .back_matter
                .get(id)
                .ok_or_else(|| ValidationStoreError::NotFound(id.to_string()))?;
            let resolved = parse_validation(id, raw, &self.backends)?;
            tracing::debug!(id, name = %resolved.name, "resolved validation");
            self.validations.insert(id.to_string(), resolved);
        }
        self.validations
            .get(id)
            .ok_or_else(|| ValidationStoreError::NotFound(id.to_string()))
    }

    pub fn count(&self) -> usize {
        self.validations.len()
    }

    /// Validations that still need consent to run.
    pub fn get_executable(&self) -> Vec<&LulaValidation> {
        self.validations
            .values()
            .filter(|v| v.requires_execution() && !v.evaluated)
            .collect()
    }

    /// Whether any validation requires execution, with a message listing them.
    pub fn dry_run(&self) -> (bool, String) {
        let executable = self.get_executable();
        if executable.is_empty() {
            return (false, "No validations require execution".to_string());
        }
        let mut msg = format!(
            "{} validation(s) will perform execution actions:",
            executable.len()
        );
        for validation in executable {
            msg.push_str(&format!("\n  - {} ({})", validation.name, validation.uuid));
        }
        (true, msg)
    }

    /// Run every resolved validation once and return one observation each.
    ///
    /// Validations requiring execution are left unevaluated unless
    /// `allow_execution` is set. A validation whose domain or provider fails
    /// is recorded as failed. When `save_dir` is given, collected resources
    /// are written there and linked from the observation.
    pub async fn run_validations(
        &mut self,
        cancel: &CancellationToken,
        allow_execution: bool,
        save_dir: Option<&Path>,
    ) -> Result<Vec<Observation>, RunError> {
        let mut observations = Vec::with_capacity(self.validations.len());
        for (id, validation) in self.validations.iter_mut() {
            let status = match validation.validate(cancel, allow_execution).await {
                Ok(status) => status,
                Err(ValidationError::Cancelled) => return Err(RunError::Cancelled),
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "validation failed");
                    validation.fail_with(e.to_string());
                    RunStatus::Evaluated
                }
            };

            let observation = match (status, self.observations.get(id)) {
                (RunStatus::AlreadyEvaluated, Some(existing)) => existing.clone(),
                _ => {
                    let resources_link = match (status, save_dir) {
                        (RunStatus::Evaluated, Some(dir)) => save_resources(dir, validation).await,
                        _ => None,
                    };
                    create_observation(id, validation, resources_link)
                }
            };
            self.observations.insert(id.clone(), observation.clone());
            observations.push(observation);
        }
        Ok(observations)
    }

    /// Reference to the latest observation for `id`, with its outcome.
    pub fn get_related_observation(&self, id: &str) -> (RelatedObservation, Outcome) {
        let id = trim_id_prefix(id);
        let (Some(validation), Some(observation)) =
            (self.validations.get(id), self.observations.get(id))
        else {
            tracing::warn!(id, "no observation recorded for validation");
            return (RelatedObservation::default(), Outcome::NotSatisfied);
        };

        let outcome = if !validation.evaluated {
            Outcome::NotEvaluated
        } else if validation.result.state() == ObjectiveState::Satisfied {
            Outcome::Satisfied
        } else {
            Outcome::NotSatisfied
        };
        (
            RelatedObservation {
                observation_uuid: observation.uuid.clone(),
            },
            outcome,
        )
    }
}

fn resource_content(resource: &Resource) -> Option<String> {
    if let Some(description) = resource.description.as_deref().filter(|d| !d.is_empty()) {
        return Some(description.to_string());
    }
    let encoded = resource.base64.as_ref()?;
    match base64::engine::general_purpose::STANDARD.decode(encoded.value.trim()) {
        Ok(bytes) => String::from_utf8(bytes).ok(),
        Err(e) => {
            tracing::warn!(id = %resource.uuid, error = %e, "skipping undecodable resource");
            None
        }
    }
}

fn parse_validation(
    id: &str,
    raw: &str,
    backends: &BackendRegistry,
) -> Result<LulaValidation, ValidationStoreError> {
    let validation = Validation::from_yaml(raw).map_err(|source| ValidationStoreError::Parse {
        id: id.to_string(),
        source,
    })?;
    LulaValidation::resolve(&validation, id, backends).map_err(|source| {
        ValidationStoreError::Resolve {
            id: id.to_string(),
            source,
        }
    })
}

async fn save_resources(dir: &Path, validation: &LulaValidation) -> Option<Link> {
    let resources = validation.domain_resources.as_ref()?;
    let path = dir.join(format!("{}.json", validation.uuid));
    let written = async {
        tokio::fs::create_dir_all(dir).await?;
        let content = serde_json::to_vec_pretty(resources).map_err(std::io::Error::other)?;
        tokio::fs::write(&path, content).await
    };
    match written.await {
        Ok(()) => Some(Link {
            href: format!("file://{}", path.display()),
            rel: Some("lula.resources".to_string()),
            text: Some("Resources".to_string()),
            ..Default::default()
        }),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to save resources");
            None
        }
    }
}

fn create_observation(
    id: &str,
    validation: &LulaValidation,
    resources: Option<Link>,
) -> Observation {
    let evidence = if validation.evaluated {
        RelevantEvidence {
            description: format!("Result: {}\n", validation.result.state()),
            remarks: (!validation.result.observations.is_empty()).then(|| {
                validation
                    .result
                    .observations
                    .iter()
                    .map(|(k, v)| format!("{k}: {v}\n"))
                    .collect()
            }),
        }
    } else {
        RelevantEvidence {
            description: "Result: not evaluated\n".to_string(),
            remarks: Some("Validation requires execution and was not run".to_string()),
        }
    };

    Observation {
        uuid: uuid::Uuid::new_v4().to_string(),
        description: format!("[TEST]: {id} - {}", validation.name),
        methods: vec!["TEST".to_string()],
        collected: Utc::now(),
        props: Some(vec![Property {
            name: "validation".to_string(),
            value: add_id_prefix(id),
            ns: Some(LULA_NAMESPACE.to_string()),
            remarks: None,
        }]),
        links: resources.map(|link| vec![link]),
        relevant_evidence: Some(vec![evidence]),
        remarks: None,
    }
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
