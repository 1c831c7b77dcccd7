// Copyright 2025 Coopstools
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines the configuration structs that map to sections in
//! `cachestream.toml`.

use serde::{Deserialize, Serialize};

pub use cachestream_structures::ExecutionMode;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheStreamConfig {
    pub execution: ExecutionConfig,
    pub logging: LoggingConfig,
}

/// How configured sources evaluate their pipelines
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExecutionConfig {
    pub mode: ExecutionMode,
    /// Worker threads for a dedicated pool. 0 = share rayon's global pool
    pub worker_threads: usize,
    pub thread_name_prefix: String,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Sequential,
            worker_threads: 0,
            thread_name_prefix: "cachestream-worker".to_string(),
        }
    }
}

impl ExecutionConfig {
    /// Whether a dedicated worker pool should be built for this configuration
    pub fn wants_dedicated_pool(&self) -> bool {
        self.mode.is_parallel() && self.worker_threads > 0
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level (trace, debug, info, warn, error)
    pub level: String,
    /// Include the event target (module path) in console output
    pub with_target: bool,
    /// Crates logged at debug level regardless of `level`
    pub debug_crates: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_target: false,
            debug_crates: Vec::new(),
        }
    }
}

/// Accepted values for `logging.level`
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
