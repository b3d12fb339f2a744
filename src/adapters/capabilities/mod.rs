//! Capability interfaces
//!
//! Callers depend on these traits only, never on a concrete adapter type.
//! Every adapter implements [`ProviderAdapter`] plus one or more of the
//! capability traits. All methods take `&self` so a single `Arc<dyn ...>`
//! instance can be shared by concurrent callers.

pub mod consultation;
pub mod diagnostics;
pub mod pharmacy;

pub use consultation::ConsultationProvider;
pub use diagnostics::DiagnosticsProvider;
pub use pharmacy::PharmacyProvider;

use crate::domain::{ProviderInfo, ProviderResult};
use async_trait::async_trait;

/// Operations shared by every capability
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Performs the vendor login, or adopts a live cached token
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Authentication`](crate::domain::ProviderError::Authentication)
    /// when credentials are rejected or the login response carries no token.
    async fn authenticate(&self) -> ProviderResult<bool>;

    /// True when a live token is held; never touches the network
    fn is_authenticated(&self) -> bool;

    /// Static metadata about this adapter
    fn provider_info(&self) -> ProviderInfo;

    /// Reachability probe. Never fails: every internal error maps to `false`.
    async fn health_check(&self) -> bool;
}
