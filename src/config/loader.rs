//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{CarelinkConfig, Environment};
use crate::domain::errors::CarelinkError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`CarelinkConfig`]
/// 4. Applies environment variable overrides (`CARELINK_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`CarelinkError::Configuration`] if the file is missing or
/// unreadable, a referenced variable is unset, parsing fails, or validation
/// fails.
///
/// # Examples
///
/// ```no_run
/// use carelink::config::load_config;
///
/// let config = load_config("carelink.toml").expect("Failed to load config");
/// println!("Default consultation provider: {}", config.providers.defaults.consultation);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CarelinkConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CarelinkError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CarelinkError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Loads configuration from TOML text, applying the same substitution,
/// overrides and validation as [`load_config`]
pub fn load_config_from_str(contents: &str) -> Result<CarelinkConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: CarelinkConfig = toml::from_str(&contents)
        .map_err(|e| CarelinkError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

    config.validate().map_err(|e| {
        CarelinkError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    tracing::debug!(
        environment = ?config.environment,
        providers = config.providers.entries.len(),
        "Configuration loaded"
    );

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| CarelinkError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(CarelinkError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `CARELINK_*` prefix
///
/// Supported variables:
/// - `CARELINK_APPLICATION_LOG_LEVEL`
/// - `CARELINK_ENVIRONMENT`
/// - `CARELINK_DEFAULT_CONSULTATION_PROVIDER`
/// - `CARELINK_DEFAULT_DIAGNOSTICS_PROVIDER`
/// - `CARELINK_DEFAULT_PHARMACY_PROVIDER`
/// - `CARELINK_LOGGING_LOCAL_ENABLED`
/// - `CARELINK_LOGGING_LOCAL_PATH`
fn apply_env_overrides<F>(config: &mut CarelinkConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("CARELINK_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val.to_lowercase();
    }

    if let Some(val) = lookup("CARELINK_ENVIRONMENT") {
        config.environment = match val.to_lowercase().as_str() {
            "development" => Environment::Development,
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            other => {
                return Err(CarelinkError::Configuration(format!(
                    "Invalid CARELINK_ENVIRONMENT '{other}'. Must be one of: development, staging, production"
                )))
            }
        };
    }

    if let Some(val) = lookup("CARELINK_DEFAULT_CONSULTATION_PROVIDER") {
        config.providers.defaults.consultation = val;
    }
    if let Some(val) = lookup("CARELINK_DEFAULT_DIAGNOSTICS_PROVIDER") {
        config.providers.defaults.diagnostics = val;
    }
    if let Some(val) = lookup("CARELINK_DEFAULT_PHARMACY_PROVIDER") {
        config.providers.defaults.pharmacy = val;
    }

    if let Some(val) = lookup("CARELINK_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Some(val) = lookup("CARELINK_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
