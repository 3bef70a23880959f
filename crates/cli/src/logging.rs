// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing subscriber setup for the binary.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::env;

/// Filter directives: `ATTESTOR_LOG` when set, otherwise `level`.
pub fn filter_directives(level: &str) -> String {
    env::log_filter().unwrap_or_else(|| level.to_string())
}

/// Install the global subscriber, writing to stderr.
///
/// Invalid directives fall back to `info`. Calling this twice is harmless.
pub fn init(level: &str) {
    let filter = EnvFilter::try_new(filter_directives(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}
