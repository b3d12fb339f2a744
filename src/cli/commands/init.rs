//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "carelink.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Carelink configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your provider settings", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - Set APOLLO_USERNAME and APOLLO_PASSWORD");
                println!("  3. Validate configuration: carelink validate-config");
                println!("  4. Check provider health: carelink health");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    fn generate_minimal_config() -> String {
        r#"# Carelink Configuration File

environment = "development"

[application]
log_level = "info"

[providers.defaults]
consultation = "apollo"
diagnostics = "apollo"
pharmacy = "apollo"

[providers.apollo]
api_base_url = "https://partners.apollo.example/api/v1"
username = "${APOLLO_USERNAME}"
password = "${APOLLO_PASSWORD}"
api_timeout = 30

[logging]
local_enabled = false
local_path = "/var/log/carelink"
local_rotation = "daily"
"#
        .to_string()
    }

    fn generate_config_with_examples() -> String {
        r#"# Carelink Configuration File
#
# This file contains all configuration options with examples and explanations.
# Values written as ${VAR} are read from the environment (or a .env file).

# ============================================================================
# Environment
# ============================================================================
# development | staging | production
# Production requires https:// base URLs for every provider.
environment = "development"

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Default Providers
# ============================================================================
# Provider used by get_default_*_provider for each capability
[providers.defaults]
consultation = "apollo"
diagnostics = "apollo"
pharmacy = "apollo"

# ============================================================================
# Provider Settings
# ============================================================================
# Provider-wide settings apply to every capability of the provider.
# Recognised keys: api_base_url, api_key, api_secret, client_id,
# client_secret, merchant_id, username, password, token, webhook_secret,
# api_timeout, agreement_id
[providers.apollo]
api_base_url = "https://partners.apollo.example/api/v1"
username = "${APOLLO_USERNAME}"
password = "${APOLLO_PASSWORD}"
client_id = "carelink"
agreement_id = "AGR-001"

# Request timeout in seconds (default 30)
api_timeout = 30

# Optional: static API key sent as X-API-Key
# api_key = "${APOLLO_API_KEY}"

# Capability tables replace the provider-wide table for that capability.
# [providers.apollo.pharmacy]
# api_base_url = "https://pharmacy.apollo.example/api/v1"
# username = "${APOLLO_PHARMACY_USERNAME}"
# password = "${APOLLO_PHARMACY_PASSWORD}"

# Providers without a table are configured from <NAME>_<KEY> variables,
# for example MEDPLUS_API_BASE_URL and MEDPLUS_API_KEY.

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON file logging
local_enabled = false

# Directory for log files
local_path = "/var/log/carelink"

# Log rotation (daily, hourly, never)
local_rotation = "daily"

# Emit console logs as JSON
json_console = false
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CarelinkConfig;
    use tempfile::TempDir;

    #[test]
    fn test_generated_configs_parse() {
        for content in [
            InitArgs::generate_minimal_config(),
            InitArgs::generate_config_with_examples(),
        ] {
            let substituted = content
                .replace("${APOLLO_USERNAME}", "svc")
                .replace("${APOLLO_PASSWORD}", "pw");
            let config: CarelinkConfig = toml::from_str(&substituted).unwrap();
            assert!(config.validate().is_ok());
            assert!(config.providers.section("apollo").is_some());
        }
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("carelink.toml");
        fs::write(&output, "# existing").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&output).unwrap(), "# existing");
    }

    #[tokio::test]
    async fn test_init_force_overwrites() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("carelink.toml");
        fs::write(&output, "# existing").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            with_examples: true,
            force: true,
        };
        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&output).unwrap().contains("[providers.defaults]"));
    }
}
