//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Carelink configuration file.

use crate::config::load_config;
use crate::domain::Capability;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);
        for capability in Capability::ALL {
            println!(
                "  Default {capability} provider: {}",
                config.providers.defaults.for_capability(capability)
            );
        }

        if config.providers.entries.is_empty() {
            println!("  Provider tables: none (environment fallback only)");
        }
        for (name, section) in &config.providers.entries {
            let scoped: Vec<&str> = Capability::ALL
                .iter()
                .filter(|c| section.for_capability(**c).is_some())
                .map(|c| c.as_str())
                .collect();
            let base_url = section
                .provider_wide()
                .and_then(|s| s.base_url())
                .unwrap_or("-");
            if scoped.is_empty() {
                println!("  Provider {name}: {base_url}");
            } else {
                println!("  Provider {name}: {base_url} (overrides: {})", scoped.join(", "));
            }
        }

        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                config.logging.local_path.as_str()
            } else {
                "disabled"
            }
        );
        println!();

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_valid_config_exits_zero() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[application]\nlog_level = \"debug\"").unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_invalid_config_exits_two() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[application]\nlog_level = \"chatty\"").unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_missing_config_exits_two() {
        let code = ValidateArgs {}
            .execute("/nonexistent/carelink.toml")
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
