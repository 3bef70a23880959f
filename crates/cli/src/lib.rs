// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Compliance validation for OSCAL component definitions.
//!
//! A component definition links each implemented requirement to validations:
//! a domain that collects resources and a provider that evaluates them.
//! [`compose::Composer`] inlines remote validations into the document's
//! back-matter, and [`validator::Validator`] runs every linked validation once
//! per pass, aggregating the outcomes into one finding per control.
//!
//! ```ignore
//! let mut validator = ValidatorBuilder::new()
//!     .with_composer(Composer::new(Arc::new(NetworkFetcher::new())))
//!     .with_allow_execution(false, true)
//!     .build();
//! let results = validator.validate_on_path(Path::new("component.yaml"), None).await?;
//! ```
//!
#![doc = include_str!("../README.md")]

pub mod cancel;
pub mod cli;
pub mod commands;
pub mod compose;
pub mod config;
pub mod consent;
pub mod env;
pub mod logging;
pub mod lula;
pub mod network;
pub mod output;
pub mod store;
pub mod validator;

#[cfg(test)]
mod test_support;
