//! Domain error types
//!
//! This module defines the error hierarchy for Carelink. Provider-facing
//! failures are modelled by [`ProviderError`], a single-rooted taxonomy that
//! always carries the provider name, so callers can branch on the kind of
//! failure without knowing which vendor produced it. Everything else
//! (configuration, I/O, logging setup) is a [`CarelinkError`].
//!
//! None of the variants expose third-party types: HTTP client errors are
//! stringified at the adapter boundary.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Main Carelink error type
///
/// Used by configuration loading, logging initialisation and the CLI.
/// Provider failures are wrapped transparently.
#[derive(Debug, Error)]
pub enum CarelinkError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Provider-related errors
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Logging setup errors
    #[error("Logging error: {0}")]
    Logging(String),
}

/// Discriminant of a [`ProviderError`], convenient for matching and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    Authentication,
    Api,
    NotFound,
    NotConfigured,
    SlotNotAvailable,
    BookingFailed,
    CancellationFailed,
    RescheduleFailed,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Authentication => "authentication",
            Self::Api => "api",
            Self::NotFound => "not_found",
            Self::NotConfigured => "not_configured",
            Self::SlotNotAvailable => "slot_not_available",
            Self::BookingFailed => "booking_failed",
            Self::CancellationFailed => "cancellation_failed",
            Self::RescheduleFailed => "reschedule_failed",
        };
        f.write_str(name)
    }
}

/// Provider failure taxonomy
///
/// Every adapter method that fails returns one of these variants with
/// `provider` populated. Structured context goes into `details`.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Credential or login failure
    #[error("[{provider}] authentication failed: {message}")]
    Authentication {
        provider: String,
        message: String,
        details: Option<Value>,
    },

    /// Non-2xx vendor response or transport failure
    ///
    /// `status_code` is `None` when no HTTP response was received at all
    /// (connection refused, timeout).
    #[error("[{provider}] API error{}: {message}", status_suffix(.status_code))]
    Api {
        provider: String,
        message: String,
        status_code: Option<u16>,
        response_data: Option<Value>,
        details: Option<Value>,
    },

    /// The requested logical provider name is not registered
    #[error("[{provider}] provider not found: {message}")]
    NotFound {
        provider: String,
        message: String,
        details: Option<Value>,
    },

    /// Provider registered but lacking required configuration
    #[error("[{provider}] provider not configured: {message}")]
    NotConfigured {
        provider: String,
        message: String,
        details: Option<Value>,
    },

    /// Booking rejected because the slot has since been taken
    #[error("[{provider}] slot not available: {message}")]
    SlotNotAvailable {
        provider: String,
        message: String,
        details: Option<Value>,
    },

    /// Booking rejected for a reason other than slot contention
    #[error("[{provider}] booking failed: {message}")]
    BookingFailed {
        provider: String,
        message: String,
        booking_id: Option<String>,
        reason: Option<String>,
        details: Option<Value>,
    },

    /// Cancellation rejected by the provider
    #[error("[{provider}] cancellation failed: {message}")]
    CancellationFailed {
        provider: String,
        message: String,
        details: Option<Value>,
    },

    /// Reschedule rejected by the provider
    #[error("[{provider}] reschedule failed: {message}")]
    RescheduleFailed {
        provider: String,
        message: String,
        details: Option<Value>,
    },
}

fn status_suffix(status_code: &Option<u16>) -> String {
    status_code
        .map(|code| format!(" (status {code})"))
        .unwrap_or_default()
}

impl ProviderError {
    /// Authentication failure for `provider`
    pub fn authentication(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Authentication {
            provider: provider.into(),
            message: message.into(),
            details: None,
        }
    }

    /// API failure with an optional HTTP status and parsed body
    pub fn api(
        provider: impl Into<String>,
        message: impl Into<String>,
        status_code: Option<u16>,
        response_data: Option<Value>,
    ) -> Self {
        Self::Api {
            provider: provider.into(),
            message: message.into(),
            status_code,
            response_data,
            details: None,
        }
    }

    /// Transport-level failure (no HTTP response received)
    pub fn transport(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::api(provider, message, None, None)
    }

    /// Unknown provider name
    pub fn not_found(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            provider: provider.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Missing required configuration
    pub fn not_configured(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotConfigured {
            provider: provider.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Slot contention
    pub fn slot_not_available(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SlotNotAvailable {
            provider: provider.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Booking rejection
    pub fn booking_failed(
        provider: impl Into<String>,
        message: impl Into<String>,
        booking_id: Option<String>,
        reason: Option<String>,
    ) -> Self {
        Self::BookingFailed {
            provider: provider.into(),
            message: message.into(),
            booking_id,
            reason,
            details: None,
        }
    }

    /// Cancellation rejection
    pub fn cancellation_failed(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CancellationFailed {
            provider: provider.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Reschedule rejection
    pub fn reschedule_failed(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RescheduleFailed {
            provider: provider.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Attaches structured details to the error
    pub fn with_details(mut self, value: Value) -> Self {
        match &mut self {
            Self::Authentication { details, .. }
            | Self::Api { details, .. }
            | Self::NotFound { details, .. }
            | Self::NotConfigured { details, .. }
            | Self::SlotNotAvailable { details, .. }
            | Self::BookingFailed { details, .. }
            | Self::CancellationFailed { details, .. }
            | Self::RescheduleFailed { details, .. } => *details = Some(value),
        }
        self
    }

    /// Name of the provider that produced the error
    pub fn provider(&self) -> &str {
        match self {
            Self::Authentication { provider, .. }
            | Self::Api { provider, .. }
            | Self::NotFound { provider, .. }
            | Self::NotConfigured { provider, .. }
            | Self::SlotNotAvailable { provider, .. }
            | Self::BookingFailed { provider, .. }
            | Self::CancellationFailed { provider, .. }
            | Self::RescheduleFailed { provider, .. } => provider,
        }
    }

    /// Human-readable message without the provider prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Authentication { message, .. }
            | Self::Api { message, .. }
            | Self::NotFound { message, .. }
            | Self::NotConfigured { message, .. }
            | Self::SlotNotAvailable { message, .. }
            | Self::BookingFailed { message, .. }
            | Self::CancellationFailed { message, .. }
            | Self::RescheduleFailed { message, .. } => message,
        }
    }

    /// Structured details, if any were attached
    pub fn details(&self) -> Option<&Value> {
        match self {
            Self::Authentication { details, .. }
            | Self::Api { details, .. }
            | Self::NotFound { details, .. }
            | Self::NotConfigured { details, .. }
            | Self::SlotNotAvailable { details, .. }
            | Self::BookingFailed { details, .. }
            | Self::CancellationFailed { details, .. }
            | Self::RescheduleFailed { details, .. } => details.as_ref(),
        }
    }

    /// Kind of failure
    pub fn kind(&self) -> ProviderErrorKind {
        match self {
            Self::Authentication { .. } => ProviderErrorKind::Authentication,
            Self::Api { .. } => ProviderErrorKind::Api,
            Self::NotFound { .. } => ProviderErrorKind::NotFound,
            Self::NotConfigured { .. } => ProviderErrorKind::NotConfigured,
            Self::SlotNotAvailable { .. } => ProviderErrorKind::SlotNotAvailable,
            Self::BookingFailed { .. } => ProviderErrorKind::BookingFailed,
            Self::CancellationFailed { .. } => ProviderErrorKind::CancellationFailed,
            Self::RescheduleFailed { .. } => ProviderErrorKind::RescheduleFailed,
        }
    }

    /// HTTP status code for API errors
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// Parsed vendor response body for API errors
    pub fn response_data(&self) -> Option<&Value> {
        match self {
            Self::Api { response_data, .. } => response_data.as_ref(),
            _ => None,
        }
    }

    /// True when a detail-by-ID lookup found nothing upstream
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

impl From<std::io::Error> for CarelinkError {
    fn from(err: std::io::Error) -> Self {
        CarelinkError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CarelinkError {
    fn from(err: serde_json::Error) -> Self {
        CarelinkError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for CarelinkError {
    fn from(err: toml::de::Error) -> Self {
        CarelinkError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_error_display_with_status() {
        let err = ProviderError::api("apollo", "Bad gateway", Some(502), None);
        assert_eq!(err.to_string(), "[apollo] API error (status 502): Bad gateway");
    }

    #[test]
    fn test_api_error_display_without_status() {
        let err = ProviderError::transport("apollo", "connection refused");
        assert_eq!(err.to_string(), "[apollo] API error: connection refused");
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_accessors_cover_every_variant() {
        let errors = vec![
            ProviderError::authentication("p", "m"),
            ProviderError::api("p", "m", Some(500), None),
            ProviderError::not_found("p", "m"),
            ProviderError::not_configured("p", "m"),
            ProviderError::slot_not_available("p", "m"),
            ProviderError::booking_failed("p", "m", None, None),
            ProviderError::cancellation_failed("p", "m"),
            ProviderError::reschedule_failed("p", "m"),
        ];

        for err in errors {
            assert_eq!(err.provider(), "p");
            assert_eq!(err.message(), "m");
            assert!(err.details().is_none());
        }
    }

    #[test]
    fn test_with_details() {
        let err = ProviderError::slot_not_available("apollo", "taken")
            .with_details(json!({"slot_id": "s-1"}));
        assert_eq!(err.details(), Some(&json!({"slot_id": "s-1"})));
        assert_eq!(err.kind(), ProviderErrorKind::SlotNotAvailable);
    }

    #[test]
    fn test_booking_failed_fields() {
        let err = ProviderError::booking_failed(
            "apollo",
            "Rejected",
            Some("BK-1".to_string()),
            Some("patient blocked".to_string()),
        );
        match err {
            ProviderError::BookingFailed {
                booking_id, reason, ..
            } => {
                assert_eq!(booking_id.as_deref(), Some("BK-1"));
                assert_eq!(reason.as_deref(), Some("patient blocked"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_is_not_found() {
        assert!(ProviderError::api("apollo", "missing", Some(404), None).is_not_found());
        assert!(!ProviderError::api("apollo", "boom", Some(500), None).is_not_found());
        assert!(!ProviderError::not_found("x", "unregistered").is_not_found());
    }

    #[test]
    fn test_provider_error_conversion() {
        let err: CarelinkError = ProviderError::not_configured("apollo", "no url").into();
        assert!(matches!(err, CarelinkError::Provider(_)));
        assert_eq!(err.to_string(), "[apollo] provider not configured: no url");
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: CarelinkError = toml_err.into();
        assert!(matches!(err, CarelinkError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ProviderErrorKind::SlotNotAvailable.to_string(), "slot_not_available");
        assert_eq!(ProviderErrorKind::Api.to_string(), "api");
    }
}
