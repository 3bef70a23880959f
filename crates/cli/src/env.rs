// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! Runtime environment variables read outside of argument parsing are
//! defined here. `ATTESTOR_CONFIG` is bound to `--config` by clap.

/// Generated env var name constants.
mod names {
    include!(concat!(env!("OUT_DIR"), "/env_names.rs"));
}

pub use names::*;

/// `ATTESTOR_LOG`: tracing filter directives, overriding the log level.
pub fn log_filter() -> Option<String> {
    std::env::var(names::ATTESTOR_LOG)
        .ok()
        .filter(|v| !v.is_empty())
}

/// `ATTESTOR_FETCH_TIMEOUT_MS`: HTTP fetch timeout. Default 10000.
pub fn fetch_timeout_ms() -> Option<u64> {
    parse_u64(std::env::var(names::ATTESTOR_FETCH_TIMEOUT_MS).ok())
}

fn parse_u64(value: Option<String>) -> Option<u64> {
    value.and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
