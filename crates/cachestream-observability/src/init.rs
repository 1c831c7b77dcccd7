// Copyright 2025 Coopstools
// SPDX-License-Identifier: Apache-2.0

//! Console logging initialization

use anyhow::{anyhow, Context, Result};
use cachestream_config::LoggingConfig;
use tracing_subscriber::EnvFilter;

use crate::cli::CrateDebugFlags;

/// Filter string combining the configured level, the configured debug
/// crates and the debug flags.
pub fn build_filter(config: &LoggingConfig, debug_flags: &CrateDebugFlags) -> String {
    let mut flags = debug_flags.clone();
    for crate_name in &config.debug_crates {
        flags.enable(crate_name);
    }
    flags.to_filter_string(&config.level)
}

/// Install the global console subscriber.
///
/// Fails if the filter does not parse or a global subscriber is already
/// installed.
pub fn init_logging(config: &LoggingConfig, debug_flags: &CrateDebugFlags) -> Result<()> {
    let filter = build_filter(config, debug_flags);
    let env_filter = EnvFilter::try_new(&filter)
        .with_context(|| format!("Invalid log filter: {}", filter))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(config.with_target)
        .try_init()
        .map_err(|err| anyhow!("Failed to install logging subscriber: {}", err))?;

    tracing::debug!(filter = %filter, "logging initialized");
    Ok(())
}

/// Install the console subscriber with default settings and the process's
/// debug flags.
pub fn init_logging_default() -> Result<()> {
    init_logging(&LoggingConfig::default(), &crate::cli::parse_debug_flags())
}
