//! Capability registries and the process-wide provider registry

use super::resolver::{EnvSource, ProviderConfigResolver, SettingsSource};
use super::ProviderContext;
use crate::adapters::capabilities::{
    ConsultationProvider, DiagnosticsProvider, PharmacyProvider, ProviderAdapter,
};
use crate::cache::{InMemoryCache, SharedCache};
use crate::config::{ProviderSettings, ProvidersConfig};
use crate::domain::{Capability, ProviderError, ProviderInfo, ProviderResult};
use crate::log_error_with_context;
use dashmap::DashMap;
use futures::future::{join_all, BoxFuture, FutureExt};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// Builds an adapter instance from its context
pub type ProviderConstructor<T> =
    Arc<dyn Fn(&ProviderContext) -> ProviderResult<Arc<T>> + Send + Sync>;

fn normalise(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Name → constructor map plus name → singleton cache for one capability
///
/// Names are case-insensitive. Re-registering a name replaces its
/// constructor and evicts any cached instance.
pub struct CapabilityRegistry<T: ?Sized> {
    capability: Capability,
    constructors: DashMap<String, ProviderConstructor<T>>,
    instances: DashMap<String, Arc<T>>,
}

impl<T: ?Sized> CapabilityRegistry<T> {
    pub fn new(capability: Capability) -> Self {
        Self {
            capability,
            constructors: DashMap::new(),
            instances: DashMap::new(),
        }
    }

    pub fn register(&self, name: &str, constructor: ProviderConstructor<T>) {
        let key = normalise(name);
        let replaced = self.constructors.insert(key.clone(), constructor).is_some();
        self.instances.remove(&key);

        tracing::debug!(
            provider = %key,
            capability = %self.capability,
            replaced,
            "Registered provider"
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(&normalise(name))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .constructors
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    /// Drops the cached instance for `name`, if any
    pub fn evict(&self, name: &str) -> bool {
        self.instances.remove(&normalise(name)).is_some()
    }

    fn constructor(&self, name: &str) -> ProviderResult<(String, ProviderConstructor<T>)> {
        let key = normalise(name);
        if let Some(entry) = self.constructors.get(&key) {
            return Ok((key, Arc::clone(entry.value())));
        }

        let registered = self.names();
        let listed = if registered.is_empty() {
            "none".to_string()
        } else {
            registered.join(", ")
        };
        Err(ProviderError::not_found(
            name,
            format!(
                "No {} provider named '{}'. Registered providers: {}",
                self.capability, name, listed
            ),
        ))
    }

    /// Builds a fresh, uncached instance
    pub fn create<F>(&self, name: &str, context_for: F) -> ProviderResult<Arc<T>>
    where
        F: FnOnce(String) -> ProviderContext,
    {
        let (key, constructor) = self.constructor(name)?;
        constructor(&context_for(key))
    }

    /// Returns the cached singleton, constructing it on first use
    ///
    /// Construction failures are not cached.
    pub fn get_or_create<F>(&self, name: &str, context_for: F) -> ProviderResult<Arc<T>>
    where
        F: FnOnce(String) -> ProviderContext,
    {
        if let Some(instance) = self.instances.get(&normalise(name)) {
            return Ok(Arc::clone(instance.value()));
        }

        let (key, constructor) = self.constructor(name)?;
        let instance = constructor(&context_for(key.clone()))?;

        tracing::info!(provider = %key, capability = %self.capability, "Provider instance created");

        let stored = self.instances.entry(key).or_insert(instance);
        Ok(Arc::clone(stored.value()))
    }
}

/// Outcome of one provider health probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub provider: String,
    pub capability: Capability,
    pub healthy: bool,
}

/// Process-wide provider registry
///
/// Owns one [`CapabilityRegistry`] per capability, the settings resolver,
/// the token cache and the catalog cache. Constructed once at startup and
/// populated by [`register_builtin_providers`](super::register_builtin_providers).
pub struct ProviderRegistry {
    consultation: CapabilityRegistry<dyn ConsultationProvider>,
    diagnostics: CapabilityRegistry<dyn DiagnosticsProvider>,
    pharmacy: CapabilityRegistry<dyn PharmacyProvider>,
    resolver: ProviderConfigResolver,
    token_cache: Arc<dyn SharedCache>,
    catalog_cache: Arc<dyn SharedCache>,
}

impl ProviderRegistry {
    /// Empty registry reading fallback settings from the environment
    pub fn new(config: &ProvidersConfig) -> Self {
        Self::with_parts(
            config,
            Arc::new(EnvSource),
            Arc::new(InMemoryCache::new()),
            Arc::new(InMemoryCache::new()),
        )
    }

    /// Empty registry with explicit settings source and caches
    pub fn with_parts(
        config: &ProvidersConfig,
        source: Arc<dyn SettingsSource>,
        token_cache: Arc<dyn SharedCache>,
        catalog_cache: Arc<dyn SharedCache>,
    ) -> Self {
        Self {
            consultation: CapabilityRegistry::new(Capability::Consultation),
            diagnostics: CapabilityRegistry::new(Capability::Diagnostics),
            pharmacy: CapabilityRegistry::new(Capability::Pharmacy),
            resolver: ProviderConfigResolver::new(config.clone(), source),
            token_cache,
            catalog_cache,
        }
    }

    pub fn token_cache(&self) -> Arc<dyn SharedCache> {
        Arc::clone(&self.token_cache)
    }

    pub fn catalog_cache(&self) -> Arc<dyn SharedCache> {
        Arc::clone(&self.catalog_cache)
    }

    /// Configured default provider name for `capability`
    pub fn default_provider(&self, capability: Capability) -> &str {
        self.resolver.defaults().for_capability(capability)
    }

    fn context(
        &self,
        name: String,
        capability: Capability,
        settings: Option<ProviderSettings>,
    ) -> ProviderContext {
        ProviderContext {
            name,
            capability,
            settings,
            token_cache: Arc::clone(&self.token_cache),
            catalog_cache: Arc::clone(&self.catalog_cache),
            cache_scope: None,
        }
    }

    /// Context for a fresh instance; its tokens never mix with the singleton's
    fn isolated_context(
        &self,
        name: String,
        capability: Capability,
        settings: ProviderSettings,
    ) -> ProviderContext {
        ProviderContext {
            cache_scope: Some(Uuid::new_v4().simple().to_string()),
            ..self.context(name, capability, Some(settings))
        }
    }

    fn resolved_context(&self, name: String, capability: Capability) -> ProviderContext {
        let settings = self.resolver.resolve(&name, capability);
        self.context(name, capability, settings)
    }

    pub fn register_consultation_provider<F>(&self, name: &str, constructor: F)
    where
        F: Fn(&ProviderContext) -> ProviderResult<Arc<dyn ConsultationProvider>>
            + Send
            + Sync
            + 'static,
    {
        self.consultation.register(name, Arc::new(constructor));
    }

    pub fn register_diagnostics_provider<F>(&self, name: &str, constructor: F)
    where
        F: Fn(&ProviderContext) -> ProviderResult<Arc<dyn DiagnosticsProvider>>
            + Send
            + Sync
            + 'static,
    {
        self.diagnostics.register(name, Arc::new(constructor));
    }

    pub fn register_pharmacy_provider<F>(&self, name: &str, constructor: F)
    where
        F: Fn(&ProviderContext) -> ProviderResult<Arc<dyn PharmacyProvider>>
            + Send
            + Sync
            + 'static,
    {
        self.pharmacy.register(name, Arc::new(constructor));
    }

    /// Consultation adapter for `name`
    ///
    /// With `settings` a fresh, uncached instance is built from them;
    /// without, the shared singleton is returned.
    ///
    /// # Errors
    ///
    /// `NotFound` (listing registered names) for an unknown name, or whatever
    /// the adapter constructor returns, typically `NotConfigured`.
    pub fn get_consultation_provider(
        &self,
        name: &str,
        settings: Option<ProviderSettings>,
    ) -> ProviderResult<Arc<dyn ConsultationProvider>> {
        let capability = Capability::Consultation;
        match settings {
            Some(settings) => self
                .consultation
                .create(name, |key| self.isolated_context(key, capability, settings)),
            None => self
                .consultation
                .get_or_create(name, |key| self.resolved_context(key, capability)),
        }
    }

    pub fn get_diagnostics_provider(
        &self,
        name: &str,
        settings: Option<ProviderSettings>,
    ) -> ProviderResult<Arc<dyn DiagnosticsProvider>> {
        let capability = Capability::Diagnostics;
        match settings {
            Some(settings) => self
                .diagnostics
                .create(name, |key| self.isolated_context(key, capability, settings)),
            None => self
                .diagnostics
                .get_or_create(name, |key| self.resolved_context(key, capability)),
        }
    }

    pub fn get_pharmacy_provider(
        &self,
        name: &str,
        settings: Option<ProviderSettings>,
    ) -> ProviderResult<Arc<dyn PharmacyProvider>> {
        let capability = Capability::Pharmacy;
        match settings {
            Some(settings) => self
                .pharmacy
                .create(name, |key| self.isolated_context(key, capability, settings)),
            None => self
                .pharmacy
                .get_or_create(name, |key| self.resolved_context(key, capability)),
        }
    }

    pub fn get_default_consultation_provider(&self) -> ProviderResult<Arc<dyn ConsultationProvider>> {
        self.get_consultation_provider(self.default_provider(Capability::Consultation), None)
    }

    pub fn get_default_diagnostics_provider(&self) -> ProviderResult<Arc<dyn DiagnosticsProvider>> {
        self.get_diagnostics_provider(self.default_provider(Capability::Diagnostics), None)
    }

    pub fn get_default_pharmacy_provider(&self) -> ProviderResult<Arc<dyn PharmacyProvider>> {
        self.get_pharmacy_provider(self.default_provider(Capability::Pharmacy), None)
    }

    pub fn list_consultation_providers(&self) -> Vec<String> {
        self.consultation.names()
    }

    pub fn list_diagnostics_providers(&self) -> Vec<String> {
        self.diagnostics.names()
    }

    pub fn list_pharmacy_providers(&self) -> Vec<String> {
        self.pharmacy.names()
    }

    /// Registered names for `capability`
    pub fn list_providers(&self, capability: Capability) -> Vec<String> {
        match capability {
            Capability::Consultation => self.list_consultation_providers(),
            Capability::Diagnostics => self.list_diagnostics_providers(),
            Capability::Pharmacy => self.list_pharmacy_providers(),
        }
    }

    /// Static info for every registered provider, keyed by name
    ///
    /// Instantiates singletons as needed. Providers that cannot be
    /// constructed are logged and left out.
    pub fn get_all_providers_info(&self) -> BTreeMap<String, ProviderInfo> {
        let mut infos = BTreeMap::new();

        for name in self.list_consultation_providers() {
            collect_info(&mut infos, &name, self.get_consultation_provider(&name, None));
        }
        for name in self.list_diagnostics_providers() {
            collect_info(&mut infos, &name, self.get_diagnostics_provider(&name, None));
        }
        for name in self.list_pharmacy_providers() {
            collect_info(&mut infos, &name, self.get_pharmacy_provider(&name, None));
        }

        infos
    }

    /// Probes every registered (provider, capability) pair concurrently
    ///
    /// A provider that fails to construct or reports unhealthy yields
    /// `healthy: false` without affecting the others.
    pub async fn health_check_all(&self) -> Vec<HealthReport> {
        let mut checks: Vec<BoxFuture<'static, HealthReport>> = Vec::new();

        for name in self.list_consultation_providers() {
            let provider = self.get_consultation_provider(&name, None);
            checks.push(probe(name, Capability::Consultation, provider));
        }
        for name in self.list_diagnostics_providers() {
            let provider = self.get_diagnostics_provider(&name, None);
            checks.push(probe(name, Capability::Diagnostics, provider));
        }
        for name in self.list_pharmacy_providers() {
            let provider = self.get_pharmacy_provider(&name, None);
            checks.push(probe(name, Capability::Pharmacy, provider));
        }

        let reports = join_all(checks).await;
        let unhealthy = reports.iter().filter(|r| !r.healthy).count();
        tracing::info!(checked = reports.len(), unhealthy, "Provider health check complete");

        reports
    }
}

fn collect_info<T>(infos: &mut BTreeMap<String, ProviderInfo>, name: &str, provider: ProviderResult<Arc<T>>)
where
    T: ?Sized + ProviderAdapter,
{
    match provider {
        Ok(provider) => {
            infos
                .entry(name.to_string())
                .or_insert_with(|| provider.provider_info());
        }
        Err(e) => {
            tracing::warn!(provider = name, error = %e, "Skipping provider info");
        }
    }
}

fn probe<T>(
    name: String,
    capability: Capability,
    provider: ProviderResult<Arc<T>>,
) -> BoxFuture<'static, HealthReport>
where
    T: ?Sized + ProviderAdapter + 'static,
{
    async move {
        let healthy = match provider {
            Ok(provider) => provider.health_check().await,
            Err(e) => {
                log_error_with_context!(&e, "Provider could not be constructed for health check");
                false
            }
        };

        if !healthy {
            tracing::warn!(provider = %name, capability = %capability, "Provider unhealthy");
        }

        HealthReport {
            provider: name,
            capability,
            healthy,
        }
    }
    .boxed()
}
