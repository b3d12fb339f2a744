//! Partner API integrations for Carelink.
//!
//! This module provides the capability contracts, the registry that resolves
//! provider names to configured adapter instances, and the built-in adapters:
//!
//! - [`capabilities`] - `ConsultationProvider`, `DiagnosticsProvider`, `PharmacyProvider`
//! - [`registry`] - Provider registration, settings resolution and singletons
//! - [`apollo`] - Apollo partner API (all three capabilities)
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern**: each one translates a vendor's
//! REST API into the domain vocabulary, so callers only ever see
//! [`crate::domain`] types and [`ProviderError`](crate::domain::ProviderError).
//!
//! # Usage
//!
//! ```rust,no_run
//! use carelink::adapters::{ConsultationProvider, ProviderRegistry};
//! use carelink::config::ProvidersConfig;
//! use carelink::domain::{DoctorSearchFilters, Pagination};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ProviderRegistry::with_builtin_providers(&ProvidersConfig::default());
//! let provider = registry.get_default_consultation_provider()?;
//!
//! let filters = DoctorSearchFilters::default().city("Chennai");
//! let doctors = provider.search_doctors(&filters, Pagination::default()).await?;
//! println!("Found {} doctors", doctors.len());
//! # Ok(())
//! # }
//! ```

pub mod apollo;
pub mod capabilities;
pub mod registry;

pub use capabilities::{ConsultationProvider, DiagnosticsProvider, PharmacyProvider, ProviderAdapter};
pub use registry::{
    global, install_global, register_builtin_providers, HealthReport, ProviderConfigResolver,
    ProviderContext, ProviderRegistry,
};
