//! Shared caches used by provider adapters
//!
//! Two independent caches are handed to every adapter by the registry:
//!
//! - the **token cache**, holding short-lived vendor credentials keyed per
//!   provider and capability (`"apollo:consultation:auth_token"`), and
//! - the **catalog cache**, holding near-static lists such as
//!   specializations and cities with a long TTL.
//!
//! Both implement [`SharedCache`]. Races between concurrent writers are
//! tolerated: the last write wins.

pub mod clock;
pub mod memory;

pub use clock::{Clock, ManualClock, SystemClock};
pub use memory::InMemoryCache;

use serde_json::Value;
use std::time::Duration;

/// Key-value store with per-entry expiry
pub trait SharedCache: Send + Sync {
    /// Returns a live value, or `None` when absent or past its TTL
    fn get(&self, key: &str) -> Option<Value>;

    /// Stores `value` under `key` for `ttl`
    fn set(&self, key: &str, value: Value, ttl: Duration);

    /// Removes `key` immediately
    fn delete(&self, key: &str);
}
