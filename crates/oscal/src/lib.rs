// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Compliance document types for attestor.
//!
//! Covers the subset of the OSCAL component-definition and assessment-results
//! models that validation reads and writes. Fields outside that subset are
//! kept in `extra` maps so documents survive a load/save cycle intact.

mod document;
mod links;
mod model;
mod results;

pub use document::{DocumentError, DocumentFormat, OscalModels};
pub use links::{
    add_id_prefix, get_prop, is_validation_link, trim_id_prefix, update_prop, ID_PREFIX,
    LULA_NAMESPACE, VALIDATION_LINK_REL, VALIDATION_LINK_TEXT, WILDCARD,
};
pub use model::{
    BackMatter, Base64Content, ComponentDefinition, ControlImplementationSet, DefinedComponent,
    ImplementedRequirement, ImportComponentDefinition, Link, Metadata, Property, Resource,
    ResourceLink, OSCAL_VERSION,
};
pub use results::{
    AssessedControls, AssessmentResult, AssessmentResults, Finding, FindingTarget, ImportAp,
    ObjectiveState, ObjectiveStatus, Observation, RelatedObservation, RelevantEvidence,
    ReviewedControls, SelectControlById,
};
