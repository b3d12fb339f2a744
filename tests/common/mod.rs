//! Shared fixtures for integration tests

#![allow(dead_code)]

use carelink::adapters::registry::MapSource;
use carelink::adapters::{register_builtin_providers, ProviderRegistry};
use carelink::cache::{InMemoryCache, SharedCache};
use carelink::config::ProvidersConfig;
use std::sync::Arc;

pub const LOGIN_PATH: &str = "/auth/login";

/// Settings source pointing Apollo at a mock server
pub fn apollo_source(base_url: &str) -> MapSource {
    MapSource::new()
        .with("APOLLO_API_BASE_URL", base_url)
        .with("APOLLO_USERNAME", "carelink")
        .with("APOLLO_PASSWORD", "s3cret")
        .with("APOLLO_API_TIMEOUT", "5")
}

/// Registry with the built-in adapters and explicit caches
pub fn registry_with_caches(
    base_url: &str,
    token_cache: Arc<dyn SharedCache>,
    catalog_cache: Arc<dyn SharedCache>,
) -> ProviderRegistry {
    let registry = ProviderRegistry::with_parts(
        &ProvidersConfig::default(),
        Arc::new(apollo_source(base_url)),
        token_cache,
        catalog_cache,
    );
    register_builtin_providers(&registry);
    registry
}

pub fn registry_for(base_url: &str) -> ProviderRegistry {
    registry_with_caches(
        base_url,
        Arc::new(InMemoryCache::new()),
        Arc::new(InMemoryCache::new()),
    )
}

pub fn login_body(token: &str) -> String {
    format!(r#"{{"success": true, "data": {{"token": "{token}"}}}}"#)
}
