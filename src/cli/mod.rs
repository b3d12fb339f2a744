//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Carelink using clap.

pub mod commands;

use crate::adapters::ProviderRegistry;
use crate::config::{load_config, CarelinkConfig};
use clap::{Parser, Subcommand};
use std::path::Path;

/// Carelink - Healthcare partner provider tool
#[derive(Parser, Debug)]
#[command(name = "carelink")]
#[command(version, about, long_about = None)]
#[command(author = "Carelink Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "carelink.toml", env = "CARELINK_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CARELINK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered providers per capability
    Providers(commands::providers::ProvidersArgs),

    /// Run a health check against every registered provider
    Health(commands::health::HealthArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Loads the configuration for commands that can run without a file
///
/// A missing file yields the default configuration, leaving provider
/// settings to the `<NAME>_<KEY>` environment fallback.
pub(crate) fn load_or_default(config_path: &str) -> crate::domain::Result<CarelinkConfig> {
    if Path::new(config_path).exists() {
        load_config(config_path)
    } else {
        tracing::info!(config_path, "No configuration file, using defaults");
        Ok(CarelinkConfig::default())
    }
}

/// Registry with the built-in adapters, as every command sees it
pub(crate) fn build_registry(config: &CarelinkConfig) -> ProviderRegistry {
    ProviderRegistry::with_builtin_providers(&config.providers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_providers() {
        let cli = Cli::parse_from(["carelink", "providers"]);
        assert_eq!(cli.config, "carelink.toml");
        assert!(matches!(cli.command, Commands::Providers(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["carelink", "--config", "custom.toml", "health"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::Health(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["carelink", "--log-level", "debug", "providers"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["carelink", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init_force() {
        let cli = Cli::parse_from(["carelink", "init", "--force"]);
        match cli.command {
            Commands::Init(args) => assert!(args.force),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let config = load_or_default("/nonexistent/carelink.toml").unwrap();
        assert_eq!(config.providers.defaults.consultation, "apollo");
    }
}
