//! Providers command implementation
//!
//! Lists the registered providers per capability, with static provider info
//! for the ones that can be constructed from the current configuration.

use crate::adapters::ProviderRegistry;
use crate::cli::{build_registry, load_or_default};
use crate::domain::{Capability, ProviderInfo};
use clap::Args;
use serde::Serialize;
use std::collections::BTreeMap;

/// Arguments for the providers command
#[derive(Args, Debug)]
pub struct ProvidersArgs {
    /// Print the listing as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ProviderListing {
    defaults: BTreeMap<Capability, String>,
    registered: BTreeMap<Capability, Vec<String>>,
    info: BTreeMap<String, ProviderInfo>,
}

impl ProviderListing {
    fn collect(registry: &ProviderRegistry) -> Self {
        Self {
            defaults: Capability::ALL
                .iter()
                .map(|c| (*c, registry.default_provider(*c).to_string()))
                .collect(),
            registered: Capability::ALL
                .iter()
                .map(|c| (*c, registry.list_providers(*c)))
                .collect(),
            info: registry.get_all_providers_info(),
        }
    }
}

impl ProvidersArgs {
    /// Execute the providers command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let registry = build_registry(&config);
        let listing = ProviderListing::collect(&registry);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&listing)?);
            return Ok(0);
        }

        println!("📋 Registered providers");
        println!();
        for capability in Capability::ALL {
            let default = listing
                .defaults
                .get(&capability)
                .map(String::as_str)
                .unwrap_or_default();
            println!("  {capability} (default: {default})");

            let names = listing.registered.get(&capability).cloned().unwrap_or_default();
            if names.is_empty() {
                println!("    (none)");
            }
            for name in names {
                match listing.info.get(&name) {
                    Some(info) => println!(
                        "    - {name}: {} (API {})",
                        info.display_name, info.api_version
                    ),
                    None => println!("    - {name}: not configured"),
                }
            }
        }
        println!();

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProvidersConfig;

    #[test]
    fn test_listing_reports_unconfigured_providers() {
        let registry = ProviderRegistry::with_parts(
            &ProvidersConfig::default(),
            std::sync::Arc::new(crate::adapters::registry::MapSource::new()),
            std::sync::Arc::new(crate::cache::InMemoryCache::new()),
            std::sync::Arc::new(crate::cache::InMemoryCache::new()),
        );
        crate::adapters::register_builtin_providers(&registry);

        let listing = ProviderListing::collect(&registry);
        assert_eq!(listing.registered[&Capability::Pharmacy], vec!["apollo".to_string()]);
        assert_eq!(listing.defaults[&Capability::Diagnostics], "apollo");
        assert!(listing.info.is_empty());
    }
}
