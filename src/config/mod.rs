//! Configuration management for Carelink.
//!
//! # Overview
//!
//! Carelink uses a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `CARELINK_*` environment overrides
//! - Per-provider and per-capability settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use carelink::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("carelink.toml")?;
//! println!("Default pharmacy provider: {}", config.providers.defaults.pharmacy);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`ProvidersConfig`] - Default providers and `[providers.<name>]` tables
//! - [`ProviderSettings`] - Base URL, credentials and timeout for one provider
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "production"
//!
//! [application]
//! log_level = "info"
//!
//! [providers.defaults]
//! consultation = "apollo"
//! diagnostics = "apollo"
//! pharmacy = "apollo"
//!
//! [providers.apollo]
//! api_base_url = "https://partners.apollo.example/api/v1"
//! username = "carelink"
//! password = "${APOLLO_PASSWORD}"
//! agreement_id = "AGR-001"
//! api_timeout = 30
//! ```
//!
//! Providers without a table fall back to `<NAME>_<KEY>` environment
//! variables, for example `APOLLO_API_BASE_URL` and `APOLLO_PASSWORD`.

pub mod loader;
pub mod providers;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_from_str};
pub use providers::{
    DefaultProviders, ProviderSection, ProviderSettings, ProvidersConfig,
    DEFAULT_API_TIMEOUT_SECONDS, DEFAULT_PROVIDER, WELL_KNOWN_KEYS,
};
pub use schema::{ApplicationConfig, CarelinkConfig, Environment, LoggingConfig};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
