// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Serialized validation documents.

use std::fmt;

use attestor_oscal::Resource;
use serde::{Deserialize, Serialize};

/// Resource title used when a validation has no name
pub const DEFAULT_VALIDATION_TITLE: &str = "Lula Validation";

/// A validation as written in YAML or JSON
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Validation {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub lula_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ValidationMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<DomainSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderSpec>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ValidationMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

/// Which resources to collect. The `*-spec` bodies are handed to the domain
/// implementation untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DomainSpec {
    Kubernetes {
        #[serde(rename = "kubernetes-spec", default)]
        spec: serde_json::Value,
    },
    Api {
        #[serde(rename = "api-spec", default)]
        spec: serde_json::Value,
    },
    File {
        #[serde(rename = "file-spec", default)]
        spec: serde_json::Value,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DomainKind {
    Kubernetes,
    Api,
    File,
}

impl DomainSpec {
    pub fn kind(&self) -> DomainKind {
        match self {
            Self::Kubernetes { .. } => DomainKind::Kubernetes,
            Self::Api { .. } => DomainKind::Api,
            Self::File { .. } => DomainKind::File,
        }
    }

    pub fn body(&self) -> &serde_json::Value {
        match self {
            Self::Kubernetes { spec } | Self::Api { spec } | Self::File { spec } => spec,
        }
    }
}

impl fmt::Display for DomainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Kubernetes => "kubernetes",
            Self::Api => "api",
            Self::File => "file",
        })
    }
}

/// Which policy engine evaluates the collected resources.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ProviderSpec {
    Opa {
        #[serde(rename = "opa-spec", default)]
        spec: serde_json::Value,
    },
    Kyverno {
        #[serde(rename = "kyverno-spec", default)]
        spec: serde_json::Value,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Opa,
    Kyverno,
}

impl ProviderSpec {
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Opa { .. } => ProviderKind::Opa,
            Self::Kyverno { .. } => ProviderKind::Kyverno,
        }
    }

    pub fn body(&self) -> &serde_json::Value {
        match self {
            Self::Opa { spec } | Self::Kyverno { spec } => spec,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Opa => "opa",
            Self::Kyverno => "kyverno",
        })
    }
}

/// Parse every non-empty document of a YAML stream as a validation.
pub fn read_validations(bytes: &[u8]) -> Result<Vec<Validation>, serde_yaml::Error> {
    let mut validations = Vec::new();
    for document in serde_yaml::Deserializer::from_slice(bytes) {
        let value = serde_yaml::Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }
        validations.push(serde_yaml::from_value(value)?);
    }
    Ok(validations)
}

impl Validation {
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn name(&self) -> &str {
        self.metadata
            .as_ref()
            .map(|m| m.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_VALIDATION_TITLE)
    }

    /// Return the validation's uuid, assigning a fresh one when it is absent or malformed.
    pub fn ensure_uuid(&mut self) -> String {
        let metadata = self.metadata.get_or_insert_with(ValidationMetadata::default);
        match metadata
            .uuid
            .as_deref()
            .filter(|id| uuid::Uuid::parse_str(id).is_ok())
        {
            Some(id) => id.to_string(),
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                metadata.uuid = Some(id.clone());
                id
            }
        }
    }

    /// Embed this validation as a back-matter resource.
    pub fn to_resource(&mut self) -> Result<Resource, serde_yaml::Error> {
        let uuid = self.ensure_uuid();
        Ok(Resource {
            uuid,
            title: Some(self.name().to_string()),
            description: Some(serde_yaml::to_string(self)?),
            ..Default::default()
        })
    }
}

#[cfg(test)]
#[path = "definition_tests.rs"]
mod tests;
