//! Result type aliases for Carelink
//!
//! [`Result`] is used by configuration, logging and CLI code; capability
//! methods and the registry return [`ProviderResult`].

use super::errors::{CarelinkError, ProviderError};

/// Result type alias for crate-level operations
///
/// # Examples
///
/// ```
/// use carelink::domain::result::Result;
/// use carelink::domain::errors::CarelinkError;
///
/// fn failing_function() -> Result<()> {
///     Err(CarelinkError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, CarelinkError>;

/// Result type alias for provider operations
///
/// # Examples
///
/// ```
/// use carelink::domain::result::ProviderResult;
/// use carelink::domain::errors::ProviderError;
///
/// fn lookup() -> ProviderResult<String> {
///     Err(ProviderError::not_found("acme", "not registered"))
/// }
/// ```
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;
