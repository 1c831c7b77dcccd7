// Copyright 2025 Coopstools
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Loading is layered:
//! 1. TOML file (base values, missing keys take defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{validate_config, CacheStreamConfig, ConfigError, ConfigResult, ExecutionMode};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// File name searched for in the working directory
pub const CONFIG_FILE_NAME: &str = "cachestream.toml";

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "CACHESTREAM_CONFIG_PATH";

/// Find the configuration file
///
/// Search order:
/// 1. `CACHESTREAM_CONFIG_PATH` environment variable
/// 2. Current working directory: `./cachestream.toml`
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by {} not found: {}",
            CONFIG_PATH_ENV,
            path.display()
        )));
    }

    let cwd = env::current_dir()?;
    let candidate = cwd.join(CONFIG_FILE_NAME);
    if candidate.exists() {
        return Ok(candidate);
    }

    Err(ConfigError::FileNotFound(format!(
        "  - {}\n\nSet {} to specify a custom location.",
        candidate.display(),
        CONFIG_PATH_ENV
    )))
}

/// Parse configuration from TOML text without applying any overrides
pub fn parse_config(content: &str) -> ConfigResult<CacheStreamConfig> {
    let config: CacheStreamConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load configuration from a TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if the file is not found, contains invalid TOML, or fails validation
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<CacheStreamConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: CacheStreamConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config)?;
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli)?;
    }

    validate_config(&config)?;
    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `CACHESTREAM_EXECUTION_MODE` -> `execution.mode`
/// - `CACHESTREAM_WORKER_THREADS` -> `execution.worker_threads`
/// - `CACHESTREAM_LOG_LEVEL` -> `logging.level`
pub fn apply_environment_overrides(config: &mut CacheStreamConfig) -> ConfigResult<()> {
    if let Ok(value) = env::var("CACHESTREAM_EXECUTION_MODE") {
        config.execution.mode = parse_mode(&value)?;
    }
    if let Ok(value) = env::var("CACHESTREAM_WORKER_THREADS") {
        config.execution.worker_threads = parse_threads(&value)?;
    }
    if let Ok(value) = env::var("CACHESTREAM_LOG_LEVEL") {
        config.logging.level = value.to_lowercase();
    }
    Ok(())
}

/// Apply CLI argument overrides to configuration
///
/// Recognized keys: `execution_mode`, `worker_threads`, `log_level`.
/// Unknown keys are ignored.
pub fn apply_cli_overrides(
    config: &mut CacheStreamConfig,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<()> {
    if let Some(value) = cli_args.get("execution_mode") {
        config.execution.mode = parse_mode(value)?;
    }
    if let Some(value) = cli_args.get("worker_threads") {
        config.execution.worker_threads = parse_threads(value)?;
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.to_lowercase();
    }
    Ok(())
}

fn parse_mode(value: &str) -> ConfigResult<ExecutionMode> {
    ExecutionMode::parse(value).ok_or_else(|| {
        ConfigError::InvalidValue(format!(
            "execution mode must be 'sequential' or 'parallel', got '{}'",
            value
        ))
    })
}

fn parse_threads(value: &str) -> ConfigResult<usize> {
    value.trim().parse::<usize>().map_err(|_| {
        ConfigError::InvalidValue(format!("worker_threads must be a number, got '{}'", value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom.toml");
        File::create(&config_path).unwrap();

        env::set_var(CONFIG_PATH_ENV, config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var(CONFIG_PATH_ENV);

        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_find_config_file_env_var_missing_file() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        env::set_var(CONFIG_PATH_ENV, dir.path().join("nope.toml"));
        let result = find_config_file();
        env::remove_var(CONFIG_PATH_ENV);

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_minimal_config() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        env::remove_var("CACHESTREAM_EXECUTION_MODE");
        env::remove_var("CACHESTREAM_WORKER_THREADS");
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[execution]").unwrap();
        writeln!(file, "mode = \"parallel\"").unwrap();
        writeln!(file, "worker_threads = 4").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert_eq!(config.execution.mode, ExecutionMode::Parallel);
        assert_eq!(config.execution.worker_threads, 4);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = CacheStreamConfig::default();

        env::set_var("CACHESTREAM_EXECUTION_MODE", "Parallel");
        env::set_var("CACHESTREAM_WORKER_THREADS", "3");
        let result = apply_environment_overrides(&mut config);
        env::remove_var("CACHESTREAM_EXECUTION_MODE");
        env::remove_var("CACHESTREAM_WORKER_THREADS");

        assert!(result.is_ok());
        assert_eq!(config.execution.mode, ExecutionMode::Parallel);
        assert_eq!(config.execution.worker_threads, 3);
    }

    #[test]
    fn test_environment_override_rejects_bad_mode() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = CacheStreamConfig::default();

        env::set_var("CACHESTREAM_EXECUTION_MODE", "eventually");
        let result = apply_environment_overrides(&mut config);
        env::remove_var("CACHESTREAM_EXECUTION_MODE");

        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = CacheStreamConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("execution_mode".to_string(), "parallel".to_string());
        cli_args.insert("log_level".to_string(), "DEBUG".to_string());

        apply_cli_overrides(&mut config, &cli_args).unwrap();

        assert_eq!(config.execution.mode, ExecutionMode::Parallel);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_parse_config_validates() {
        let result = parse_config(
            r#"
            [logging]
            level = "chatty"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
