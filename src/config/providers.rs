//! Per-provider settings
//!
//! Settings for a (provider, capability) pair are resolved in three steps by
//! the registry (see [`ProviderConfigResolver`](crate::adapters::registry::ProviderConfigResolver)):
//!
//! 1. the capability table `[providers.<name>.<capability>]`,
//! 2. the provider-wide table `[providers.<name>]`,
//! 3. the well-known keys in [`WELL_KNOWN_KEYS`], each probed as
//!    `<NAME>_<KEY>` in the environment (e.g. `APOLLO_API_BASE_URL`).
//!
//! ```toml
//! [providers.defaults]
//! consultation = "apollo"
//!
//! [providers.apollo]
//! api_base_url = "https://partners.apollo.example/api/v1"
//! username = "carelink"
//! password = "${APOLLO_PASSWORD}"
//!
//! [providers.apollo.diagnostics]
//! api_base_url = "https://diagnostics.apollo.example/api/v1"
//! username = "carelink-labs"
//! password = "${APOLLO_LABS_PASSWORD}"
//! ```

use crate::config::schema::Environment;
use crate::config::secret::{secret_string_opt, SecretString};
use crate::domain::Capability;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Request timeout used when a provider does not configure one
pub const DEFAULT_API_TIMEOUT_SECONDS: u64 = 30;

/// Provider used for every capability when no default is configured
pub const DEFAULT_PROVIDER: &str = "apollo";

/// Keys probed as `<NAME>_<KEY>` when no table configures a provider
pub const WELL_KNOWN_KEYS: [&str; 12] = [
    "API_BASE_URL",
    "API_KEY",
    "API_SECRET",
    "CLIENT_ID",
    "CLIENT_SECRET",
    "MERCHANT_ID",
    "USERNAME",
    "PASSWORD",
    "TOKEN",
    "WEBHOOK_SECRET",
    "API_TIMEOUT",
    "AGREEMENT_ID",
];

/// Connection and credential settings for one provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default)]
    pub api_secret: Option<SecretString>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<SecretString>,
    #[serde(default)]
    pub merchant_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<SecretString>,
    #[serde(default)]
    pub token: Option<SecretString>,
    #[serde(default)]
    pub webhook_secret: Option<SecretString>,
    /// Request timeout in seconds
    #[serde(default)]
    pub api_timeout: Option<u64>,
    #[serde(default)]
    pub agreement_id: Option<String>,
}

impl ProviderSettings {
    /// Builds settings by probing `<PREFIX>_<KEY>` for every well-known key
    ///
    /// `lookup` receives the full key name. Returns `None` when no key is set.
    pub fn from_prefixed<F>(prefix: &str, lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = prefix.to_uppercase();
        let get = |key: &str| {
            lookup(&format!("{prefix}_{key}"))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_timeout = get("API_TIMEOUT").and_then(|raw| match raw.parse::<u64>() {
            Ok(seconds) => Some(seconds),
            Err(_) => {
                tracing::warn!(
                    key = %format!("{prefix}_API_TIMEOUT"),
                    value = %raw,
                    "Ignoring non-numeric API timeout"
                );
                None
            }
        });

        let settings = Self {
            api_base_url: get("API_BASE_URL"),
            api_key: secret_string_opt(get("API_KEY")),
            api_secret: secret_string_opt(get("API_SECRET")),
            client_id: get("CLIENT_ID"),
            client_secret: secret_string_opt(get("CLIENT_SECRET")),
            merchant_id: get("MERCHANT_ID"),
            username: get("USERNAME"),
            password: secret_string_opt(get("PASSWORD")),
            token: secret_string_opt(get("TOKEN")),
            webhook_secret: secret_string_opt(get("WEBHOOK_SECRET")),
            api_timeout,
            agreement_id: get("AGREEMENT_ID"),
        };

        (!settings.is_empty()).then_some(settings)
    }

    /// Convenience constructor for a base URL plus username/password login
    pub fn with_login(
        api_base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            api_base_url: Some(api_base_url.into()),
            username: Some(username.into()),
            password: secret_string_opt(Some(password.into())),
            ..Default::default()
        }
    }

    /// True when nothing at all is configured
    pub fn is_empty(&self) -> bool {
        self.api_base_url.is_none()
            && self.api_key.is_none()
            && self.api_secret.is_none()
            && self.client_id.is_none()
            && self.client_secret.is_none()
            && self.merchant_id.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.token.is_none()
            && self.webhook_secret.is_none()
            && self.api_timeout.is_none()
            && self.agreement_id.is_none()
    }

    /// Request timeout, defaulting to [`DEFAULT_API_TIMEOUT_SECONDS`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout.unwrap_or(DEFAULT_API_TIMEOUT_SECONDS))
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> Option<&str> {
        self.api_base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
    }

    /// Returns the exposed password, if set and non-blank
    pub fn password_str(&self) -> Option<&str> {
        self.password
            .as_ref()
            .map(|p| p.expose_secret().as_str())
            .filter(|p| !p.trim().is_empty())
    }

    /// Returns the exposed API key, if set and non-blank
    pub fn api_key_str(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(|k| k.expose_secret().as_str())
            .filter(|k| !k.trim().is_empty())
    }

    pub(crate) fn validate(&self, label: &str, environment: &Environment) -> Result<(), String> {
        if let Some(raw) = &self.api_base_url {
            let parsed = url::Url::parse(raw)
                .map_err(|e| format!("{label}.api_base_url '{raw}' is not a valid URL: {e}"))?;

            match parsed.scheme() {
                "https" => {}
                "http" if *environment != Environment::Production => {}
                "http" => {
                    return Err(format!(
                        "{label}.api_base_url must use https:// in production environments"
                    ))
                }
                other => {
                    return Err(format!(
                        "{label}.api_base_url has unsupported scheme '{other}'"
                    ))
                }
            }
        }

        if let Some(timeout) = self.api_timeout {
            if timeout == 0 || timeout > 300 {
                return Err(format!(
                    "{label}.api_timeout must be between 1 and 300 seconds, got {timeout}"
                ));
            }
        }

        Ok(())
    }
}

/// `[providers.<name>]` table: provider-wide settings plus optional
/// capability-specific overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSection {
    #[serde(flatten)]
    pub settings: ProviderSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultation: Option<ProviderSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<ProviderSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pharmacy: Option<ProviderSettings>,
}

impl ProviderSection {
    /// Capability-specific settings, if configured
    pub fn for_capability(&self, capability: Capability) -> Option<&ProviderSettings> {
        match capability {
            Capability::Consultation => self.consultation.as_ref(),
            Capability::Diagnostics => self.diagnostics.as_ref(),
            Capability::Pharmacy => self.pharmacy.as_ref(),
        }
    }

    /// Provider-wide settings, if the table sets anything at the top level
    pub fn provider_wide(&self) -> Option<&ProviderSettings> {
        (!self.settings.is_empty()).then_some(&self.settings)
    }
}

/// Default provider name per capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultProviders {
    #[serde(default = "default_provider")]
    pub consultation: String,
    #[serde(default = "default_provider")]
    pub diagnostics: String,
    #[serde(default = "default_provider")]
    pub pharmacy: String,
}

impl DefaultProviders {
    pub fn for_capability(&self, capability: Capability) -> &str {
        match capability {
            Capability::Consultation => &self.consultation,
            Capability::Diagnostics => &self.diagnostics,
            Capability::Pharmacy => &self.pharmacy,
        }
    }
}

impl Default for DefaultProviders {
    fn default() -> Self {
        Self {
            consultation: default_provider(),
            diagnostics: default_provider(),
            pharmacy: default_provider(),
        }
    }
}

/// `[providers]` section: defaults plus one table per provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub defaults: DefaultProviders,
    #[serde(flatten)]
    pub entries: BTreeMap<String, ProviderSection>,
}

impl ProvidersConfig {
    /// Looks up a provider table, ignoring case
    pub fn section(&self, name: &str) -> Option<&ProviderSection> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, section)| section)
    }

    pub(crate) fn validate(&self, environment: &Environment) -> Result<(), String> {
        for capability in Capability::ALL {
            if self.defaults.for_capability(capability).trim().is_empty() {
                return Err(format!(
                    "providers.defaults.{capability} cannot be empty"
                ));
            }
        }

        for (name, section) in &self.entries {
            let label = format!("providers.{name}");
            section.settings.validate(&label, environment)?;
            for capability in Capability::ALL {
                if let Some(settings) = section.for_capability(capability) {
                    settings.validate(&format!("{label}.{capability}"), environment)?;
                }
            }
        }

        Ok(())
    }
}

fn default_provider() -> String {
    DEFAULT_PROVIDER.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_from_prefixed_reads_well_known_keys() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("APOLLO_API_BASE_URL", "https://apollo.example/api/"),
            ("APOLLO_USERNAME", "svc"),
            ("APOLLO_PASSWORD", "pw"),
            ("APOLLO_API_TIMEOUT", "12"),
            ("OTHER_USERNAME", "ignored"),
        ]);

        let settings =
            ProviderSettings::from_prefixed("apollo", |key| env.get(key).map(|v| v.to_string()))
                .unwrap();

        assert_eq!(settings.base_url(), Some("https://apollo.example/api"));
        assert_eq!(settings.username.as_deref(), Some("svc"));
        assert_eq!(settings.password_str(), Some("pw"));
        assert_eq!(settings.timeout(), Duration::from_secs(12));
        assert!(settings.client_id.is_none());
    }

    #[test]
    fn test_from_prefixed_returns_none_when_nothing_set() {
        assert!(ProviderSettings::from_prefixed("ghost", |_| None).is_none());
    }

    #[test]
    fn test_from_prefixed_ignores_bad_timeout() {
        let settings = ProviderSettings::from_prefixed("apollo", |key| match key {
            "APOLLO_API_TIMEOUT" => Some("soon".to_string()),
            "APOLLO_USERNAME" => Some("svc".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(settings.timeout(), Duration::from_secs(DEFAULT_API_TIMEOUT_SECONDS));
    }

    #[test]
    fn test_section_parses_capability_tables() {
        let toml = r#"
[defaults]
diagnostics = "thyrocare"

[apollo]
api_base_url = "https://apollo.example"
username = "svc"
password = "pw"

[apollo.diagnostics]
api_base_url = "https://labs.apollo.example"
api_timeout = 45
"#;
        let config: ProvidersConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.defaults.consultation, "apollo");
        assert_eq!(config.defaults.diagnostics, "thyrocare");

        let section = config.section("APOLLO").unwrap();
        assert_eq!(
            section.provider_wide().unwrap().base_url(),
            Some("https://apollo.example")
        );
        let diagnostics = section.for_capability(Capability::Diagnostics).unwrap();
        assert_eq!(diagnostics.api_timeout, Some(45));
        assert!(section.for_capability(Capability::Pharmacy).is_none());
    }

    #[test]
    fn test_section_with_only_capability_tables_has_no_provider_wide_settings() {
        let toml = r#"
[apollo.pharmacy]
api_base_url = "https://pharmacy.apollo.example"
"#;
        let config: ProvidersConfig = toml::from_str(toml).unwrap();
        let section = config.section("apollo").unwrap();
        assert!(section.provider_wide().is_none());
        assert!(section.for_capability(Capability::Pharmacy).is_some());
    }

    #[test]
    fn test_validate_rejects_http_in_production() {
        let settings = ProviderSettings::with_login("http://apollo.example", "u", "p");
        assert!(settings.validate("providers.apollo", &Environment::Development).is_ok());
        let err = settings
            .validate("providers.apollo", &Environment::Production)
            .unwrap_err();
        assert!(err.contains("https"));
    }

    #[test]
    fn test_validate_rejects_bad_timeout() {
        let settings = ProviderSettings {
            api_timeout: Some(0),
            ..Default::default()
        };
        assert!(settings.validate("p", &Environment::Development).is_err());
    }

    #[test]
    fn test_validate_rejects_invalid_url() {
        let settings = ProviderSettings {
            api_base_url: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(settings.validate("p", &Environment::Development).is_err());
    }
}
