// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Requirements of one control-implementation group, and the findings they
//! aggregate into.

use std::collections::{BTreeMap, HashMap};

use attestor_oscal::{
    is_validation_link, trim_id_prefix, ControlImplementationSet, Finding, FindingTarget,
    ImplementedRequirement, Link, ObjectiveState, ObjectiveStatus,
};

use super::validation::{Outcome, ValidationStore};
use crate::lula::LulaValidation;

/// An implemented requirement with a reference to its control implementation
#[derive(Clone, Copy, Debug)]
pub struct Requirement<'a> {
    pub control_implementation: &'a ControlImplementationSet,
    pub implemented_requirement: &'a ImplementedRequirement,
}

impl<'a> Requirement<'a> {
    pub fn validation_links(&self) -> impl Iterator<Item = &'a Link> {
        self.implemented_requirement
            .links
            .iter()
            .flatten()
            .filter(|link| is_validation_link(link))
    }
}

/// Counts reported before validations run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub total_requirements: usize,
    pub total_validations: usize,
    pub executable_validations: bool,
    pub executable_validations_msg: String,
    pub total_findings: usize,
}

#[derive(Debug)]
pub struct RequirementStore<'a> {
    requirements: Vec<Requirement<'a>>,
    findings: BTreeMap<String, Finding>,
}

impl<'a> RequirementStore<'a> {
    /// Index requirements by uuid. A repeated uuid replaces the earlier entry.
    pub fn new(control_implementations: &'a [ControlImplementationSet]) -> Self {
        let mut requirements: Vec<Requirement<'a>> = Vec::new();
        let mut index: HashMap<&'a str, usize> = HashMap::new();
        for ci in control_implementations {
            for ir in &ci.implemented_requirements {
                let requirement = Requirement {
                    control_implementation: ci,
                    implemented_requirement: ir,
                };
                match index.get(ir.uuid.as_str()) {
                    Some(&i) => requirements[i] = requirement,
                    None => {
                        index.insert(ir.uuid.as_str(), requirements.len());
                        requirements.push(requirement);
                    }
                }
            }
        }
        Self {
            requirements,
            findings: BTreeMap::new(),
        }
    }

    pub fn requirements(&self) -> &[Requirement<'a>] {
        &self.requirements
    }

    /// Make sure every validation link resolves. A link that does not is
    /// backed by a failing placeholder carrying the error.
    pub fn resolve_lula_validations(&self, store: &mut ValidationStore) {
        for requirement in &self.requirements {
            for link in requirement.validation_links() {
                if let Err(e) = store.get_lula_validation(&link.href) {
                    let id = trim_id_prefix(&link.href);
                    tracing::warn!(
                        control_id = %requirement.implemented_requirement.control_id,
                        href = %link.href,
                        error = %e,
                        "validation could not be resolved"
                    );
                    let reason = format!("Error getting Lula validation {}: {e}", link.href);
                    store.add_lula_validation(LulaValidation::failing(id, reason), id);
                }
            }
        }
    }

    /// One finding per control id across every requirement in the group.
    ///
    /// A control that is not satisfied stays that way however many further
    /// requirements merge into it; satisfied needs at least one passing and no
    /// failing observation.
    pub fn generate_findings(&mut self, store: &ValidationStore) -> BTreeMap<String, Finding> {
        let mut findings: BTreeMap<String, Finding> = BTreeMap::new();
        for requirement in &self.requirements {
            let ci = requirement.control_implementation;
            let ir = requirement.implemented_requirement;
            let entry = format!(
                "Control Implementation: {} / Implemented Requirement: {}\n{}\n",
                ci.uuid, ir.uuid, ir.description
            );

            let existing = findings.remove(&ir.control_id);
            let previous_state = existing.as_ref().map(|f| f.target.status.state);
            let mut finding = match existing {
                Some(mut finding) => {
                    finding.description.push_str(&entry);
                    finding
                }
                None => new_finding(&ir.control_id, entry),
            };

            let mut pass = 0;
            let mut fail = 0;
            let mut related = Vec::new();
            for link in requirement.validation_links() {
                let (observation, outcome) = store.get_related_observation(&link.href);
                match outcome {
                    Outcome::Satisfied => pass += 1,
                    Outcome::NotSatisfied => fail += 1,
                    Outcome::NotEvaluated => {}
                }
                related.push(observation);
            }
            if let Some(previous) = finding.related_observations.take() {
                related.extend(previous);
            }
            finding.related_observations = (!related.is_empty()).then_some(related);

            finding.target.status.state = match previous_state {
                Some(ObjectiveState::NotSatisfied) => ObjectiveState::NotSatisfied,
                _ if pass > 0 && fail == 0 => ObjectiveState::Satisfied,
                _ => ObjectiveState::NotSatisfied,
            };
            findings.insert(ir.control_id.clone(), finding);
        }
        self.findings = findings.clone();
        findings
    }

    pub fn get_stats(&self, store: &ValidationStore) -> Stats {
        let (executable_validations, executable_validations_msg) = store.dry_run();
        Stats {
            total_requirements: self.requirements.len(),
            total_validations: store.count(),
            executable_validations,
            executable_validations_msg,
            total_findings: self.findings.len(),
        }
    }
}

fn new_finding(control_id: &str, description: String) -> Finding {
    Finding {
        uuid: uuid::Uuid::new_v4().to_string(),
        title: format!("Validation Result - Control: {control_id}"),
        description,
        target: FindingTarget {
            target_type: "objective-id".to_string(),
            target_id: control_id.to_string(),
            status: ObjectiveStatus::default(),
        },
        related_observations: None,
    }
}

#[cfg(test)]
#[path = "requirement_tests.rs"]
mod tests;
