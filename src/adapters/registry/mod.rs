//! Provider registry
//!
//! Maps logical provider names to adapter constructors, resolves settings per
//! (provider, capability) pair and caches one adapter instance per name so
//! authentication state is reused across callers.
//!
//! ```rust,no_run
//! use carelink::adapters::registry::ProviderRegistry;
//! use carelink::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("carelink.toml")?;
//! let registry = ProviderRegistry::with_builtin_providers(&config.providers);
//!
//! let pharmacy = registry.get_default_pharmacy_provider()?;
//! println!("{}", pharmacy.provider_info().display_name);
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
#[allow(clippy::module_inception)]
pub mod registry;
pub mod resolver;

pub use bootstrap::{global, install_global, register_builtin_providers};
pub use registry::{CapabilityRegistry, HealthReport, ProviderConstructor, ProviderRegistry};
pub use resolver::{EnvSource, MapSource, ProviderConfigResolver, SettingsSource};

use crate::cache::SharedCache;
use crate::config::ProviderSettings;
use crate::domain::Capability;
use std::sync::Arc;

/// Everything an adapter constructor receives
///
/// `settings` is `None` when nothing could be resolved for the pair; the
/// adapter decides whether that is fatal.
#[derive(Clone)]
pub struct ProviderContext {
    /// Registered (lowercase) provider name
    pub name: String,
    pub capability: Capability,
    pub settings: Option<ProviderSettings>,
    /// Shared store for authentication tokens
    pub token_cache: Arc<dyn SharedCache>,
    /// Shared store for near-static catalogs
    pub catalog_cache: Arc<dyn SharedCache>,
    /// Private cache namespace for instances built from explicit settings;
    /// `None` for the shared singleton
    pub cache_scope: Option<String>,
}
