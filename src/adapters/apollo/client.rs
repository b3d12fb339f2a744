//! Shared Apollo HTTP engine
//!
//! One [`ApolloClient`] backs each Apollo capability adapter. It owns the
//! login flow, the bearer token and the request pipeline:
//!
//! 1. a live token in the shared token cache is adopted without a login call,
//! 2. otherwise `POST /auth/login` is issued and the token is cached for
//!    [`TOKEN_TTL`],
//! 3. a `401` evicts the token, forces one fresh login and retries the request
//!    exactly once; a second `401` is surfaced as an API error,
//! 4. any `4xx`/`5xx` becomes [`ProviderError::Api`] with the status code and
//!    parsed body, and transport failures become `Api` without a status.

use super::parse;
use crate::adapters::registry::ProviderContext;
use crate::cache::SharedCache;
use crate::config::SecretString;
use crate::domain::{Capability, ProviderError, ProviderResult};
use crate::{log_error_with_context, log_provider_call, log_retry_attempt};
use reqwest::{Client, ClientBuilder, Method, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Apollo tokens live 24 hours; the cache drops them an hour early
pub const TOKEN_TTL: Duration = Duration::from_secs(23 * 60 * 60);

/// Lifetime of cached specialization and city lists
pub const CATALOG_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Connect timeout, independent of the configured request timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

enum Credentials {
    Login {
        username: String,
        password: SecretString,
    },
    StaticToken(SecretString),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    agreement_id: Option<&'a str>,
}

/// Authenticated request pipeline for one (provider, capability) pair
pub struct ApolloClient {
    provider: String,
    capability: Capability,
    base_url: String,
    credentials: Credentials,
    client_id: Option<String>,
    agreement_id: Option<String>,
    api_key: Option<SecretString>,
    http: Client,
    token_cache: Arc<dyn SharedCache>,
    catalog_cache: Arc<dyn SharedCache>,
    cache_prefix: String,
    cache_key: String,
}

impl ApolloClient {
    /// Builds a client from resolved settings
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotConfigured`] when no settings were
    /// resolved, the base URL is missing, or neither username/password nor a
    /// static token is configured.
    pub fn new(context: &ProviderContext) -> ProviderResult<Self> {
        let provider = context.name.clone();
        let settings = context.settings.as_ref().ok_or_else(|| {
            ProviderError::not_configured(
                &provider,
                format!("No configuration found for {} capability", context.capability),
            )
        })?;

        let base_url = settings
            .base_url()
            .ok_or_else(|| ProviderError::not_configured(&provider, "api_base_url is required"))?
            .to_string();

        let credentials = match (&settings.username, &settings.password, &settings.token) {
            (Some(username), Some(password), _)
                if !username.trim().is_empty() && settings.password_str().is_some() =>
            {
                Credentials::Login {
                    username: username.clone(),
                    password: password.clone(),
                }
            }
            (_, _, Some(token)) if !token.expose_secret().is_empty() => {
                Credentials::StaticToken(token.clone())
            }
            _ => {
                return Err(ProviderError::not_configured(
                    &provider,
                    "username and password (or a static token) are required",
                ))
            }
        };

        let http = ClientBuilder::new()
            .timeout(settings.timeout())
            .connect_timeout(CONNECT_TIMEOUT.min(settings.timeout()))
            .build()
            .map_err(|e| {
                ProviderError::not_configured(&provider, format!("Failed to build HTTP client: {e}"))
            })?;

        let cache_prefix = match &context.cache_scope {
            Some(scope) => format!("{}:{}:{}", provider, context.capability, scope),
            None => format!("{}:{}", provider, context.capability),
        };
        let cache_key = format!("{cache_prefix}:auth_token");

        tracing::debug!(
            provider = %provider,
            capability = %context.capability,
            base_url = %base_url,
            timeout_secs = settings.timeout().as_secs(),
            "Apollo client configured"
        );

        Ok(Self {
            provider,
            capability: context.capability,
            base_url,
            credentials,
            client_id: settings.client_id.clone(),
            agreement_id: settings.agreement_id.clone(),
            api_key: settings.api_key.clone(),
            http,
            token_cache: Arc::clone(&context.token_cache),
            catalog_cache: Arc::clone(&context.catalog_cache),
            cache_prefix,
            cache_key,
        })
    }

    /// Registered provider name, used in every error
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Key under which the token lives in the shared token cache
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    /// Adopts a live cached token or performs a login
    pub async fn authenticate(&self) -> ProviderResult<bool> {
        self.ensure_token().await.map(|_| true)
    }

    /// True when the shared cache holds a live token for this client
    pub fn is_authenticated(&self) -> bool {
        self.cached_token().is_some()
    }

    /// Authenticates, then probes `GET /health`
    pub async fn health_check(&self) -> bool {
        if let Err(e) = self.authenticate().await {
            log_error_with_context!(&e, "Apollo health check could not authenticate");
            return false;
        }

        match self.get("/health", &[]).await {
            Ok(_) => true,
            Err(e) => {
                log_error_with_context!(&e, "Apollo health check failed");
                false
            }
        }
    }

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> ProviderResult<Value> {
        self.request(Method::GET, path, query, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> ProviderResult<Value> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> ProviderResult<Value> {
        self.request(Method::PUT, path, &[], Some(body)).await
    }

    /// Fetches a single record
    ///
    /// Apollo reports a missing ID either with a `404` or with a `200` and an
    /// empty body. Both surface as `Api { status_code: Some(404) }`.
    pub async fn get_record(&self, path: &str, what: &str) -> ProviderResult<Value> {
        let body = self.get(path, &[]).await?;
        parse::record(&body).cloned().ok_or_else(|| {
            ProviderError::api(&self.provider, format!("{what} not found"), Some(404), None)
        })
    }

    /// Near-static catalog list, served from the catalog cache when fresh
    pub async fn cached_catalog(
        &self,
        name: &str,
        path: &str,
        list_keys: &[&str],
    ) -> ProviderResult<Vec<String>> {
        let key = format!("{}:{}", self.cache_prefix, name);

        if let Some(cached) = self.catalog_cache.get(&key) {
            if let Ok(entries) = serde_json::from_value::<Vec<String>>(cached) {
                tracing::debug!(provider = %self.provider, catalog = name, "Catalog cache hit");
                return Ok(entries);
            }
        }

        let body = self.get(path, &[]).await?;
        let entries: Vec<String> = parse::list(&body, list_keys)
            .iter()
            .filter_map(|item| match item {
                Value::Object(_) => parse::opt_text(item, parse::CATALOG_NAME),
                Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
                _ => None,
            })
            .collect();

        self.catalog_cache.set(&key, json!(entries), CATALOG_TTL);
        tracing::debug!(
            provider = %self.provider,
            catalog = name,
            entries = entries.len(),
            "Catalog refreshed"
        );

        Ok(entries)
    }

    /// Issues one logical request, with a single re-login retry on `401`
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> ProviderResult<Value> {
        let token = self.ensure_token().await?;
        let response = self.send(&method, path, query, body, &token).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return self.read_response(path, response).await;
        }

        log_retry_attempt!(1, 1, format!("{path} rejected the token with 401"));
        self.invalidate_token();
        let token = self.refresh_token().await?;
        let response = self.send(&method, path, query, body, &token).await?;
        self.read_response(path, response).await
    }

    async fn ensure_token(&self) -> ProviderResult<String> {
        match self.cached_token() {
            Some(token) => Ok(token),
            None => self.refresh_token().await,
        }
    }

    fn cached_token(&self) -> Option<String> {
        self.token_cache
            .get(&self.cache_key)?
            .as_str()
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }

    async fn refresh_token(&self) -> ProviderResult<String> {
        let token = self.login().await?;
        self.token_cache
            .set(&self.cache_key, Value::String(token.clone()), TOKEN_TTL);

        tracing::info!(
            provider = %self.provider,
            capability = %self.capability,
            "Authenticated with Apollo"
        );

        Ok(token)
    }

    fn invalidate_token(&self) {
        self.token_cache.delete(&self.cache_key);
        tracing::debug!(
            provider = %self.provider,
            capability = %self.capability,
            "Evicted rejected token"
        );
    }

    async fn login(&self) -> ProviderResult<String> {
        let (username, password) = match &self.credentials {
            Credentials::StaticToken(token) => {
                return Ok(token.expose_secret().as_str().to_string())
            }
            Credentials::Login { username, password } => (username, password),
        };

        let url = format!("{}/auth/login", self.base_url);
        log_provider_call!(self.provider, self.capability, "POST", "/auth/login");

        let body = LoginRequest {
            username,
            password: password.expose_secret().as_str(),
            client_id: self.client_id.as_deref(),
            agreement_id: self.agreement_id.as_deref(),
        };

        let response = self
            .with_common_headers(self.http.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                ProviderError::authentication(&self.provider, format!("Login request failed: {e}"))
            })?;

        let status = response.status();
        let payload: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            let message = parse::opt_text(&payload, parse::booking::ERROR_MESSAGE)
                .unwrap_or_else(|| format!("login rejected with status {status}"));
            return Err(ProviderError::authentication(&self.provider, message)
                .with_details(json!({ "status_code": status.as_u16() })));
        }

        parse::opt_text(&payload, parse::TOKEN).ok_or_else(|| {
            ProviderError::authentication(&self.provider, "Login response did not contain a token")
        })
    }

    fn with_common_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.header("X-Request-Id", Uuid::new_v4().to_string());
        match &self.api_key {
            Some(key) => request.header("X-API-Key", key.expose_secret().as_str()),
            None => request,
        }
    }

    async fn send(
        &self,
        method: &Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        token: &str,
    ) -> ProviderResult<Response> {
        let url = format!("{}{}", self.base_url, path);
        log_provider_call!(self.provider, self.capability, method, path);

        let mut request = self
            .with_common_headers(self.http.request(method.clone(), &url))
            .bearer_auth(token);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        request.send().await.map_err(|e| {
            let message = if e.is_timeout() {
                format!("Request to {path} timed out")
            } else {
                format!("Request to {path} failed: {e}")
            };
            ProviderError::transport(&self.provider, message)
        })
    }

    async fn read_response(&self, path: &str, response: Response) -> ProviderResult<Value> {
        let status = response.status();
        let raw = response.text().await.map_err(|e| {
            ProviderError::transport(
                &self.provider,
                format!("Failed to read response from {path}: {e}"),
            )
        })?;

        let parsed = if raw.trim().is_empty() {
            Some(Value::Null)
        } else {
            serde_json::from_str::<Value>(&raw).ok()
        };

        if status.is_client_error() || status.is_server_error() {
            let body = parsed.unwrap_or(Value::String(raw));
            let message = parse::opt_text(&body, parse::booking::ERROR_MESSAGE)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "Request failed".to_string());

            tracing::warn!(
                provider = %self.provider,
                capability = %self.capability,
                status = status.as_u16(),
                path = path,
                "Apollo API returned an error"
            );

            return Err(ProviderError::api(
                &self.provider,
                message,
                Some(status.as_u16()),
                (!body.is_null()).then_some(body),
            ));
        }

        parsed.ok_or_else(|| {
            ProviderError::api(
                &self.provider,
                format!("Invalid JSON in response from {path}"),
                Some(status.as_u16()),
                None,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCache;
    use crate::config::ProviderSettings;
    use crate::domain::ProviderErrorKind;

    fn context(settings: Option<ProviderSettings>) -> ProviderContext {
        ProviderContext {
            name: "apollo".to_string(),
            capability: Capability::Consultation,
            settings,
            token_cache: Arc::new(InMemoryCache::new()),
            catalog_cache: Arc::new(InMemoryCache::new()),
            cache_scope: None,
        }
    }

    #[test]
    fn test_missing_settings_is_not_configured() {
        let err = ApolloClient::new(&context(None)).err().unwrap();
        assert_eq!(err.kind(), ProviderErrorKind::NotConfigured);
        assert_eq!(err.provider(), "apollo");
    }

    #[test]
    fn test_missing_base_url_is_not_configured() {
        let settings = ProviderSettings {
            username: Some("svc".to_string()),
            ..Default::default()
        };
        let err = ApolloClient::new(&context(Some(settings))).err().unwrap();
        assert_eq!(err.kind(), ProviderErrorKind::NotConfigured);
        assert!(err.message().contains("api_base_url"));
    }

    #[test]
    fn test_missing_credentials_is_not_configured() {
        let settings = ProviderSettings {
            api_base_url: Some("https://apollo.example".to_string()),
            username: Some("svc".to_string()),
            ..Default::default()
        };
        let err = ApolloClient::new(&context(Some(settings))).err().unwrap();
        assert_eq!(err.kind(), ProviderErrorKind::NotConfigured);
    }

    #[test]
    fn test_cache_key_is_scoped_to_capability() {
        let settings = ProviderSettings::with_login("https://apollo.example/", "svc", "pw");
        let client = ApolloClient::new(&context(Some(settings))).unwrap();
        assert_eq!(client.cache_key(), "apollo:consultation:auth_token");
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_scoped_client_uses_private_cache_key() {
        let settings = ProviderSettings::with_login("https://apollo.example", "tester", "pw");
        let scoped = ProviderContext {
            cache_scope: Some("t1".to_string()),
            ..context(Some(settings))
        };
        let client = ApolloClient::new(&scoped).unwrap();
        assert_eq!(client.cache_key(), "apollo:consultation:t1:auth_token");
    }

    #[tokio::test]
    async fn test_static_token_authenticates_without_login() {
        let settings = ProviderSettings {
            api_base_url: Some("https://apollo.example".to_string()),
            token: crate::config::secret_string_opt(Some("static-token".to_string())),
            ..Default::default()
        };
        let client = ApolloClient::new(&context(Some(settings))).unwrap();

        assert!(client.authenticate().await.unwrap());
        assert!(client.is_authenticated());
    }
}
