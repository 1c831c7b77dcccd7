// Copyright 2025 Coopstools
// SPDX-License-Identifier: Apache-2.0

//! # cachestream Configuration
//!
//! Type-safe configuration for applications embedding cachestream:
//! - TOML file parsing
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! The pipeline types never read configuration on their own. An application
//! loads a [`CacheStreamConfig`] and hands its `execution` section to
//! `ExecutionContext::from_config` when it wants configured sources.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cachestream_config::{load_config, CacheStreamConfig};
//!
//! let config: CacheStreamConfig = load_config(None, None).expect("Failed to load config");
//! println!("Execution mode: {}", config.execution.mode);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{
    apply_cli_overrides, apply_environment_overrides, find_config_file, load_config, parse_config,
};
pub use types::*;
pub use validation::{validate_config, ConfigValidationError};

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
