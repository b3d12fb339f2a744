//! Value types shared across the consultation, diagnostics and pharmacy models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form, provider-specific extension bag
///
/// Callers that need vendor-specific fields read them from here rather than
/// from a concrete adapter type.
pub type ExtraData = Map<String, Value>;

/// Default page size for catalog and search operations
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound on page size accepted from callers
pub const MAX_PAGE_SIZE: u32 = 100;

/// 1-indexed pagination for catalog and search operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    /// Creates pagination, normalising page 0 to 1 and clamping page size
    /// to `1..=MAX_PAGE_SIZE`
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Zero-based offset of the first item on this page
    pub fn offset(&self) -> u32 {
        (self.page - 1) * self.page_size
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// Patient details attached to bookings and orders
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PatientDetails {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
}

impl PatientDetails {
    /// Creates patient details with the mandatory fields
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            ..Default::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }
}

/// Postal address used for sample collection and deliveries
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    #[serde(default)]
    pub landmark: Option<String>,
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub pincode: String,
}
