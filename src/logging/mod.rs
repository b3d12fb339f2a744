//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable or JSON console output
//! - Configurable log levels
//! - Local JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use carelink::logging::init_logging;
//! use carelink::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(provider = "apollo", "Registry ready");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log an outbound provider call
///
/// # Example
///
/// ```no_run
/// use carelink::log_provider_call;
///
/// log_provider_call!("apollo", "consultation", "GET", "/doctors");
/// ```
#[macro_export]
macro_rules! log_provider_call {
    ($provider:expr, $capability:expr, $method:expr, $path:expr) => {
        tracing::debug!(
            provider = %$provider,
            capability = %$capability,
            method = %$method,
            path = %$path,
            "Calling provider API"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use carelink::log_error_with_context;
/// use carelink::domain::ProviderError;
///
/// let error = ProviderError::transport("apollo", "connection refused");
/// log_error_with_context!(&error, "Health check failed");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use carelink::log_retry_attempt;
///
/// log_retry_attempt!(1, 1, "Token rejected with 401");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = %$reason,
            "Retrying operation"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::ProviderError;

    #[test]
    fn test_macros_expand_without_subscriber() {
        let error = ProviderError::transport("apollo", "refused");
        crate::log_provider_call!("apollo", "pharmacy", "GET", "/medicines");
        crate::log_error_with_context!(&error, "probe");
        crate::log_retry_attempt!(1, 1, "401");
    }
}
