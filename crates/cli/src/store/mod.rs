// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-pass caches: artifacts, resolved validations, and requirements.

pub mod requirement;
pub mod resource;
pub mod validation;

pub use requirement::{Requirement, RequirementStore, Stats};
pub use resource::{ResourceError, ResourceStore};
pub use validation::{Outcome, RunError, ValidationStore, ValidationStoreError};
