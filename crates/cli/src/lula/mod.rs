// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Validations: the serialized form found in documents, the resolved runnable
//! form, and the domain/provider capabilities that back it.

mod backend;
mod definition;
mod file;
mod resolved;

pub use backend::{
    BackendError, BackendRegistry, Domain, DomainResources, Provider, ProviderOutcome,
};
pub use definition::{
    read_validations, DomainKind, DomainSpec, ProviderKind, ProviderSpec, Validation,
    ValidationMetadata, DEFAULT_VALIDATION_TITLE,
};
pub use file::{FileDomain, FileInfo, FileParser, FileSpec};
pub use resolved::{LulaValidation, RunStatus, ValidationError, ValidationResult};
