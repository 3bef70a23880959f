// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Assessment results model.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Extra, Link, Metadata, Property};

const RESULTS_TITLE: &str = "[System Name] Security Assessment Results (SAR)";
const RESULTS_VERSION: &str = "0.0.1";
const RESULT_TITLE: &str = "Lula Validation Result";

/// Compliance verdict for one control
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectiveState {
    Satisfied,
    #[default]
    NotSatisfied,
}

impl ObjectiveState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Satisfied => "satisfied",
            Self::NotSatisfied => "not-satisfied",
        }
    }
}

impl fmt::Display for ObjectiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ObjectiveStatus {
    pub state: ObjectiveState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FindingTarget {
    #[serde(rename = "type")]
    pub target_type: String,
    pub target_id: String,
    pub status: ObjectiveStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RelatedObservation {
    pub observation_uuid: String,
}

/// Aggregate verdict for one control id
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Finding {
    pub uuid: String,
    pub title: String,
    pub description: String,
    pub target: FindingTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_observations: Option<Vec<RelatedObservation>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RelevantEvidence {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Evidence record from one validation run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Observation {
    pub uuid: String,
    pub description: String,
    pub methods: Vec<String>,
    pub collected: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Vec<Property>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevant_evidence: Option<Vec<RelevantEvidence>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SelectControlById {
    pub control_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AssessedControls {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_controls: Option<Vec<SelectControlById>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReviewedControls {
    #[serde(default)]
    pub description: String,
    pub control_selections: Vec<AssessedControls>,
}

/// One evaluated target: findings plus the observations they reference
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AssessmentResult {
    pub uuid: String,
    pub title: String,
    pub description: String,
    pub start: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Vec<Property>>,
    pub reviewed_controls: ReviewedControls,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub findings: Option<Vec<Finding>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<Vec<Observation>>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl AssessmentResult {
    /// Build a result from a control-id keyed finding map.
    pub fn from_findings(
        description: impl Into<String>,
        findings: &BTreeMap<String, Finding>,
        observations: Vec<Observation>,
    ) -> Self {
        let include_controls: Vec<SelectControlById> = findings
            .keys()
            .map(|id| SelectControlById {
                control_id: id.clone(),
            })
            .collect();

        Self {
            uuid: uuid::Uuid::new_v4().to_string(),
            title: RESULT_TITLE.to_string(),
            description: description.into(),
            start: Utc::now(),
            props: None,
            reviewed_controls: ReviewedControls {
                description: "Controls validated".to_string(),
                control_selections: vec![AssessedControls {
                    description: Some("Controls Assessed by Lula".to_string()),
                    include_controls: (!include_controls.is_empty()).then_some(include_controls),
                }],
            },
            findings: (!findings.is_empty()).then(|| findings.values().cloned().collect()),
            observations: (!observations.is_empty()).then_some(observations),
            extra: Extra::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ImportAp {
    pub href: String,
}

/// Assessment results envelope
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AssessmentResults {
    pub uuid: String,
    pub metadata: Metadata,
    pub import_ap: ImportAp,
    #[serde(default)]
    pub results: Vec<AssessmentResult>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl AssessmentResults {
    pub fn new(results: Vec<AssessmentResult>) -> Self {
        Self {
            uuid: uuid::Uuid::new_v4().to_string(),
            metadata: Metadata::new(RESULTS_TITLE, RESULTS_VERSION),
            import_ap: ImportAp::default(),
            results,
            extra: Extra::new(),
        }
    }

    /// Fold another set of results into this one, newest first.
    pub fn merge(&mut self, other: AssessmentResults) {
        self.results.extend(other.results);
        self.results.sort_by(|a, b| b.start.cmp(&a.start));
        self.uuid = uuid::Uuid::new_v4().to_string();
        self.metadata.last_modified = Utc::now();
    }
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod tests;
