// Configuration loading and settings resolution from a TOML file

use carelink::adapters::registry::MapSource;
use carelink::adapters::ProviderConfigResolver;
use carelink::config::{load_config, Environment};
use carelink::domain::{Capability, CarelinkError};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_full_config_with_substitution() {
    std::env::set_var("CARELINK_IT_APOLLO_PASSWORD", "from-env");

    let file = write_config(
        r#"
environment = "staging"

[application]
log_level = "debug"

[providers.defaults]
pharmacy = "medplus"

[providers.apollo]
api_base_url = "https://apollo.example/api/v1/"
username = "svc"
password = "${CARELINK_IT_APOLLO_PASSWORD}"

[providers.apollo.diagnostics]
api_base_url = "https://labs.apollo.example"
username = "labs"
password = "labs-pw"
api_timeout = 45
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.environment, Environment::Staging);
    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.providers.defaults.consultation, "apollo");
    assert_eq!(config.providers.defaults.pharmacy, "medplus");

    let apollo = config.providers.section("apollo").unwrap();
    assert_eq!(apollo.settings.password_str(), Some("from-env"));
    assert_eq!(apollo.settings.base_url(), Some("https://apollo.example/api/v1"));

    std::env::remove_var("CARELINK_IT_APOLLO_PASSWORD");
}

#[test]
fn test_resolution_prefers_capability_table() {
    let file = write_config(
        r#"
[providers.apollo]
api_base_url = "https://apollo.example"
username = "svc"
password = "pw"

[providers.apollo.diagnostics]
api_base_url = "https://labs.apollo.example"
username = "labs"
password = "labs-pw"
"#,
    );
    let config = load_config(file.path()).unwrap();

    let source = MapSource::new()
        .with("APOLLO_API_BASE_URL", "https://ignored.example")
        .with("MEDPLUS_API_BASE_URL", "https://medplus.example")
        .with("MEDPLUS_API_KEY", "k-123");
    let resolver = ProviderConfigResolver::new(config.providers, Arc::new(source));

    let labs = resolver.resolve("apollo", Capability::Diagnostics).unwrap();
    assert_eq!(labs.base_url(), Some("https://labs.apollo.example"));
    assert_eq!(labs.username.as_deref(), Some("labs"));

    let pharmacy = resolver.resolve("Apollo", Capability::Pharmacy).unwrap();
    assert_eq!(pharmacy.base_url(), Some("https://apollo.example"));

    let medplus = resolver.resolve("medplus", Capability::Pharmacy).unwrap();
    assert_eq!(medplus.base_url(), Some("https://medplus.example"));
    assert_eq!(medplus.api_key_str(), Some("k-123"));

    assert!(resolver.resolve("ghost", Capability::Consultation).is_none());
}

#[test]
fn test_production_requires_https() {
    let file = write_config(
        r#"
environment = "production"

[providers.apollo]
api_base_url = "http://apollo.example"
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(err, CarelinkError::Configuration(_)));
    assert!(err.to_string().contains("https"));
}

#[test]
fn test_missing_variable_is_reported() {
    std::env::remove_var("CARELINK_IT_UNSET_SECRET");
    let file = write_config(
        r#"
[providers.apollo]
password = "${CARELINK_IT_UNSET_SECRET}"
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("CARELINK_IT_UNSET_SECRET"));
}

#[test]
fn test_invalid_timeout_is_rejected() {
    let file = write_config(
        r#"
[providers.apollo]
api_base_url = "https://apollo.example"
api_timeout = 0
"#,
    );

    assert!(load_config(file.path()).is_err());
}
