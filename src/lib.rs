// Carelink - Healthcare Partner Provider Abstraction Layer
// Copyright (c) 2025 Carelink Contributors
// Licensed under the MIT License

//! # Carelink - Healthcare Partner Provider Abstraction
//!
//! Carelink puts consultation, diagnostics and pharmacy partner APIs behind one
//! provider-agnostic vocabulary, so a platform can book a doctor, a lab test
//! or a medicine order without knowing which vendor fulfils it.
//!
//! ## Overview
//!
//! This library provides:
//! - **Capability contracts** for consultation, diagnostics and pharmacy
//! - **Domain types** every adapter translates into
//! - **A provider registry** that resolves names to configured, cached adapters
//! - **Transparent authentication** with token caching and one re-login on `401`
//!
//! ## Architecture
//!
//! Carelink follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`adapters`] - Capability traits, registry and vendor adapters
//! - [`cache`] - TTL caches shared by adapters
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use carelink::adapters::{PharmacyProvider, ProviderRegistry};
//! use carelink::config::load_config;
//! use carelink::domain::{MedicineSearchFilters, Pagination};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("carelink.toml")?;
//!     let registry = ProviderRegistry::with_builtin_providers(&config.providers);
//!
//!     let pharmacy = registry.get_default_pharmacy_provider()?;
//!     let filters = MedicineSearchFilters::default().query("paracetamol");
//!     let medicines = pharmacy.search_medicines(&filters, Pagination::default()).await?;
//!
//!     println!("Found {} medicines", medicines.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Provider calls return [`domain::ProviderResult`]. Callers branch on
//! [`domain::ProviderErrorKind`], never on the vendor:
//!
//! ```rust,no_run
//! use carelink::domain::{ProviderError, ProviderErrorKind};
//!
//! fn describe(err: &ProviderError) -> &'static str {
//!     match err.kind() {
//!         ProviderErrorKind::SlotNotAvailable => "pick another slot",
//!         ProviderErrorKind::Authentication => "check credentials",
//!         _ if err.is_not_found() => "no such record",
//!         _ => "try again later",
//!     }
//! }
//! ```
//!
//! ## Logging
//!
//! Carelink uses structured logging with the `tracing` crate. Adapters tag
//! events with `provider`, `capability` and `path` fields.

pub mod adapters;
pub mod cache;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
