// Copyright 2025 Coopstools
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Ensures configuration values are within valid ranges and consistent with
//! each other.

use crate::{CacheStreamConfig, ConfigError, ConfigResult, LOG_LEVELS};

/// Upper bound for `execution.worker_threads`
pub const MAX_WORKER_THREADS: usize = 1024;

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &CacheStreamConfig) -> ConfigResult<()> {
    let errors = collect_validation_errors(config);
    if errors.is_empty() {
        return Ok(());
    }

    let error_messages = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::ValidationError(format!(
        "Configuration validation failed:\n{}",
        error_messages
    )))
}

/// Collect every validation problem without failing on the first one
pub fn collect_validation_errors(config: &CacheStreamConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();

    if config.execution.worker_threads > MAX_WORKER_THREADS {
        errors.push(ConfigValidationError::InvalidValue {
            field: "execution.worker_threads".to_string(),
            reason: format!(
                "{} exceeds the maximum of {}",
                config.execution.worker_threads, MAX_WORKER_THREADS
            ),
        });
    }

    if config.execution.worker_threads > 0 && !config.execution.mode.is_parallel() {
        errors.push(ConfigValidationError::InvalidValue {
            field: "execution.worker_threads".to_string(),
            reason: "a worker pool requires execution.mode = \"parallel\"".to_string(),
        });
    }

    if config.execution.wants_dedicated_pool() && config.execution.thread_name_prefix.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "execution.thread_name_prefix".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!("'{}' is not one of {}", config.logging.level, LOG_LEVELS.join(", ")),
        });
    }

    for (index, name) in config.logging.debug_crates.iter().enumerate() {
        if name.trim().is_empty() {
            errors.push(ConfigValidationError::MissingRequired {
                field: format!("logging.debug_crates[{}]", index),
            });
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExecutionMode;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&CacheStreamConfig::default()).is_ok());
    }

    #[test]
    fn test_worker_threads_need_parallel_mode() {
        let mut config = CacheStreamConfig::default();
        config.execution.worker_threads = 4;
        let errors = collect_validation_errors(&config);
        assert_eq!(errors.len(), 1);

        config.execution.mode = ExecutionMode::Parallel;
        assert!(collect_validation_errors(&config).is_empty());
    }

    #[test]
    fn test_all_problems_are_reported() {
        let mut config = CacheStreamConfig::default();
        config.execution.mode = ExecutionMode::Parallel;
        config.execution.worker_threads = MAX_WORKER_THREADS + 1;
        config.execution.thread_name_prefix = " ".to_string();
        config.logging.level = "loud".to_string();
        config.logging.debug_crates = vec!["".to_string()];

        assert_eq!(collect_validation_errors(&config).len(), 4);
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }
}
