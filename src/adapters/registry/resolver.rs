//! Settings resolution for (provider, capability) pairs

use crate::config::{DefaultProviders, ProviderSettings, ProvidersConfig};
use crate::domain::Capability;
use std::collections::HashMap;
use std::sync::Arc;

/// Key/value source probed for `<NAME>_<KEY>` fallback settings
pub trait SettingsSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl SettingsSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory source for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl SettingsSource for MapSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Resolves settings in order: capability table, provider-wide table, then
/// the well-known `<NAME>_<KEY>` probe. The first hit wins as a whole.
pub struct ProviderConfigResolver {
    providers: ProvidersConfig,
    source: Arc<dyn SettingsSource>,
}

impl ProviderConfigResolver {
    pub fn new(providers: ProvidersConfig, source: Arc<dyn SettingsSource>) -> Self {
        Self { providers, source }
    }

    pub fn from_env(providers: ProvidersConfig) -> Self {
        Self::new(providers, Arc::new(EnvSource))
    }

    pub fn defaults(&self) -> &DefaultProviders {
        &self.providers.defaults
    }

    pub fn resolve(&self, name: &str, capability: Capability) -> Option<ProviderSettings> {
        if let Some(section) = self.providers.section(name) {
            if let Some(settings) = section.for_capability(capability) {
                tracing::debug!(provider = name, capability = %capability, "Using capability settings");
                return Some(settings.clone());
            }
            if let Some(settings) = section.provider_wide() {
                tracing::debug!(provider = name, capability = %capability, "Using provider-wide settings");
                return Some(settings.clone());
            }
        }

        let probed = ProviderSettings::from_prefixed(name, |key| self.source.get(key));
        if probed.is_some() {
            tracing::debug!(provider = name, capability = %capability, "Using prefixed settings");
        } else {
            tracing::debug!(provider = name, capability = %capability, "No settings resolved");
        }
        probed
    }
}
