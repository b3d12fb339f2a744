//! Explicit startup registration of the built-in adapters

use super::registry::ProviderRegistry;
use crate::adapters::apollo;
use crate::config::ProvidersConfig;
use std::sync::OnceLock;

static GLOBAL_REGISTRY: OnceLock<ProviderRegistry> = OnceLock::new();

/// Registers every adapter shipped with the crate
///
/// Idempotent: registering twice overwrites the same names.
pub fn register_builtin_providers(registry: &ProviderRegistry) {
    apollo::register(registry);
}

impl ProviderRegistry {
    /// New registry with the built-in adapters already registered
    pub fn with_builtin_providers(config: &ProvidersConfig) -> Self {
        let registry = Self::new(config);
        register_builtin_providers(&registry);
        registry
    }
}

/// Installs the process-wide registry
///
/// Only the first call installs; later calls log a warning and return the
/// registry that is already in place.
pub fn install_global(registry: ProviderRegistry) -> &'static ProviderRegistry {
    let mut installed = false;
    let global = GLOBAL_REGISTRY.get_or_init(|| {
        installed = true;
        registry
    });

    if !installed {
        tracing::warn!("Global provider registry already installed, keeping the existing one");
    }

    global
}

/// The process-wide registry, if one has been installed
pub fn global() -> Option<&'static ProviderRegistry> {
    GLOBAL_REGISTRY.get()
}
