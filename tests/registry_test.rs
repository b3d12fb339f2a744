// Registry lookup, instance caching and health fan-out

mod common;

use carelink::adapters::registry::MapSource;
use carelink::adapters::{
    register_builtin_providers, ConsultationProvider, ProviderAdapter, ProviderRegistry,
};
use carelink::cache::{InMemoryCache, SharedCache};
use carelink::config::{ProviderSettings, ProvidersConfig};
use carelink::domain::{Capability, ProviderError, ProviderErrorKind};
use common::{login_body, registry_for, registry_with_caches, LOGIN_PATH};
use mockito::Matcher;
use serde_json::json;
use std::sync::Arc;

#[test]
fn test_singleton_without_settings() {
    let registry = registry_for("http://127.0.0.1:9");

    let first = registry.get_consultation_provider("apollo", None).unwrap();
    let second = registry.get_consultation_provider("APOLLO", None).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_explicit_settings_build_fresh_instances() {
    let registry = registry_for("http://127.0.0.1:9");
    let settings = ProviderSettings::with_login("http://127.0.0.1:9", "other", "pw");

    let shared = registry.get_pharmacy_provider("apollo", None).unwrap();
    let first = registry
        .get_pharmacy_provider("apollo", Some(settings.clone()))
        .unwrap();
    let second = registry
        .get_pharmacy_provider("apollo", Some(settings))
        .unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert!(!Arc::ptr_eq(&shared, &first));
}

#[tokio::test]
async fn test_explicit_settings_log_in_with_own_credentials() {
    let mut server = mockito::Server::new_async().await;
    let shared_login = server
        .mock("POST", LOGIN_PATH)
        .match_body(Matcher::PartialJson(json!({"username": "carelink"})))
        .with_status(200)
        .with_body(login_body("prod-token"))
        .expect(1)
        .create_async()
        .await;
    let own_login = server
        .mock("POST", LOGIN_PATH)
        .match_body(Matcher::PartialJson(json!({"username": "tester"})))
        .with_status(200)
        .with_body(login_body("test-token"))
        .expect(1)
        .create_async()
        .await;
    let doctor = server
        .mock("GET", "/doctors/7")
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_body(r#"{"doctorId": 7, "doctorName": "Dr. A"}"#)
        .expect(1)
        .create_async()
        .await;

    let token_cache: Arc<dyn SharedCache> = Arc::new(InMemoryCache::new());
    let registry = registry_with_caches(
        &server.url(),
        Arc::clone(&token_cache),
        Arc::new(InMemoryCache::new()),
    );

    let shared = registry.get_consultation_provider("apollo", None).unwrap();
    shared.authenticate().await.unwrap();

    let settings = ProviderSettings::with_login(server.url(), "tester", "pw");
    let isolated = registry
        .get_consultation_provider("apollo", Some(settings))
        .unwrap();
    assert!(!isolated.is_authenticated());

    isolated.get_doctor_details("7").await.unwrap();
    assert!(isolated.is_authenticated());
    assert_eq!(
        token_cache.get("apollo:consultation:auth_token"),
        Some(json!("prod-token"))
    );

    shared_login.assert_async().await;
    own_login.assert_async().await;
    doctor.assert_async().await;
}

#[test]
fn test_unknown_provider_lists_registered_names() {
    let registry = registry_for("http://127.0.0.1:9");

    let err = registry
        .get_diagnostics_provider("medplus", None)
        .err()
        .unwrap();
    assert_eq!(err.kind(), ProviderErrorKind::NotFound);
    assert!(err.message().contains("medplus"));
    assert!(err.message().contains("apollo"));
}

#[test]
fn test_unconfigured_provider_is_not_configured() {
    let registry = ProviderRegistry::with_parts(
        &ProvidersConfig::default(),
        Arc::new(MapSource::new()),
        Arc::new(InMemoryCache::new()),
        Arc::new(InMemoryCache::new()),
    );
    register_builtin_providers(&registry);

    let err = registry
        .get_default_consultation_provider()
        .err()
        .unwrap();
    assert_eq!(err.kind(), ProviderErrorKind::NotConfigured);
    assert!(registry.get_all_providers_info().is_empty());
}

#[test]
fn test_default_provider_and_info() {
    let registry = registry_for("http://127.0.0.1:9");

    assert_eq!(registry.default_provider(Capability::Pharmacy), "apollo");
    let provider = registry.get_default_pharmacy_provider().unwrap();
    let info = provider.provider_info();
    assert_eq!(info.name, "apollo");
    assert!(info.capabilities.supports(Capability::Pharmacy));

    let all = registry.get_all_providers_info();
    assert_eq!(all.len(), 1);
    assert_eq!(all["apollo"].display_name, "Apollo");
}

#[tokio::test]
async fn test_health_check_all_isolates_failures() {
    let mut server = mockito::Server::new_async().await;
    let _login = server
        .mock("POST", LOGIN_PATH)
        .with_status(200)
        .with_body(login_body("tok"))
        .create_async()
        .await;
    let health = server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(r#"{"status": "ok"}"#)
        .expect(3)
        .create_async()
        .await;

    let registry = registry_for(&server.url());
    registry.register_pharmacy_provider("broken", |context| {
        Err(ProviderError::not_configured(&context.name, "missing credentials"))
    });

    let reports = registry.health_check_all().await;
    assert_eq!(reports.len(), 4);

    let broken: Vec<_> = reports.iter().filter(|r| !r.healthy).collect();
    assert_eq!(broken.len(), 1);
    assert_eq!(broken[0].provider, "broken");
    assert_eq!(broken[0].capability, Capability::Pharmacy);

    health.assert_async().await;
}
