// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Component definition model.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::links::{get_prop, LULA_NAMESPACE};

/// OSCAL schema version written into new documents
pub const OSCAL_VERSION: &str = "1.1.2";

/// Fields not modeled explicitly, preserved verbatim.
pub type Extra = BTreeMap<String, serde_json::Value>;

/// Document metadata block
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Metadata {
    pub title: String,
    pub last_modified: DateTime<Utc>,
    pub version: String,
    pub oscal_version: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Metadata {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            last_modified: Utc::now(),
            version: version.into(),
            oscal_version: OSCAL_VERSION.to_string(),
            extra: Extra::new(),
        }
    }
}

/// Name/value property, optionally namespaced
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Property {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ns: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Typed pointer from a requirement to evidence or validation content
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Link {
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_fragment: Option<String>,
}

/// Top-level component definition
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ComponentDefinition {
    pub uuid: String,
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_component_definitions: Option<Vec<ImportComponentDefinition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<DefinedComponent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_matter: Option<BackMatter>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ImportComponentDefinition {
    pub href: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DefinedComponent {
    pub uuid: String,
    #[serde(rename = "type")]
    pub component_type: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Vec<Property>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_implementations: Option<Vec<ControlImplementationSet>>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A group of implemented requirements sharing one control source
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ControlImplementationSet {
    pub uuid: String,
    pub source: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Vec<Property>>,
    #[serde(default)]
    pub implemented_requirements: Vec<ImplementedRequirement>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ControlImplementationSet {
    /// Framework name declared through a `framework` prop in the lula namespace.
    pub fn framework(&self) -> Option<&str> {
        self.props
            .as_deref()
            .and_then(|props| get_prop(props, "framework", Some(LULA_NAMESPACE)))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ImplementedRequirement {
    pub uuid: String,
    pub control_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Vec<Property>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Document section holding embedded artifacts
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BackMatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<Resource>>,
}

/// A UUID-identified back-matter artifact
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Resource {
    pub uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64: Option<Base64Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rlinks: Option<Vec<ResourceLink>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Vec<Property>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Base64Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    pub value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResourceLink {
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

impl ComponentDefinition {
    /// Every control implementation across all components, in document order.
    pub fn control_implementations(&self) -> Vec<&ControlImplementationSet> {
        self.components
            .iter()
            .flatten()
            .flat_map(|c| c.control_implementations.iter().flatten())
            .collect()
    }

    /// Groups control implementations by source, and additionally by framework
    /// when a framework prop names a different group.
    pub fn control_implementations_by_target(
        &self,
    ) -> BTreeMap<String, Vec<ControlImplementationSet>> {
        let mut groups: BTreeMap<String, Vec<ControlImplementationSet>> = BTreeMap::new();
        for ci in self.control_implementations() {
            groups.entry(ci.source.clone()).or_default().push(ci.clone());
            if let Some(framework) = ci.framework() {
                if framework != ci.source {
                    groups
                        .entry(framework.to_string())
                        .or_default()
                        .push(ci.clone());
                }
            }
        }
        groups
    }

    /// Back-matter resources, or an empty slice when there is no back-matter.
    pub fn resources(&self) -> &[Resource] {
        self.back_matter
            .as_ref()
            .and_then(|bm| bm.resources.as_deref())
            .unwrap_or_default()
    }

    /// Merge another definition into this one.
    ///
    /// Components with a matching uuid gain the other's control
    /// implementations; new components are appended. Back-matter resources
    /// are appended unless their uuid is already present.
    pub fn merge(&mut self, other: ComponentDefinition) {
        if let Some(incoming) = other.components {
            let components = self.components.get_or_insert_with(Vec::new);
            for component in incoming {
                match components.iter_mut().find(|c| c.uuid == component.uuid) {
                    Some(existing) => {
                        if let Some(cis) = component.control_implementations {
                            existing
                                .control_implementations
                                .get_or_insert_with(Vec::new)
                                .extend(cis);
                        }
                    }
                    None => components.push(component),
                }
            }
        }

        let incoming = other
            .back_matter
            .and_then(|bm| bm.resources)
            .unwrap_or_default();
        if !incoming.is_empty() {
            let resources = self
                .back_matter
                .get_or_insert_with(BackMatter::default)
                .resources
                .get_or_insert_with(Vec::new);
            let mut seen: HashSet<String> = resources.iter().map(|r| r.uuid.clone()).collect();
            for resource in incoming {
                if seen.insert(resource.uuid.clone()) {
                    resources.push(resource);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
