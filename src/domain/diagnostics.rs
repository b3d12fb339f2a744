//! Diagnostics domain model
//!
//! Lab tests, packages, collection centers and lab bookings. Same identity
//! and immutability rules as the consultation types.

use super::common::{Address, ExtraData, PatientDetails};
use super::status::BookingStatus;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A single orderable lab test
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LabTest {
    pub provider_test_id: String,
    pub provider_name: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub discounted_price: Option<f64>,
    pub sample_type: String,
    pub preparation: String,
    pub turnaround_hours: u32,
    pub home_collection: bool,
    pub extra_data: ExtraData,
}

/// A bundle of lab tests sold together
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LabPackage {
    pub provider_package_id: String,
    pub provider_name: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub discounted_price: Option<f64>,
    pub tests: Vec<LabTest>,
    /// Number of tests as reported by the provider, which may exceed
    /// `tests.len()` when the listing omits the breakdown
    pub test_count: u32,
    pub extra_data: ExtraData,
}

/// A collection center or lab branch
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiagnosticCenter {
    pub provider_center_id: String,
    pub provider_name: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
    pub phone: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub home_collection: bool,
    pub extra_data: ExtraData,
}

/// How the sample is collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionType {
    HomeCollection,
    CenterVisit,
}

/// A sample-collection window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSlot {
    pub slot_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
}

/// Optional filters for test and package search
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TestSearchFilters {
    pub query: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
}

impl TestSearchFilters {
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }
}

/// Canonical lab booking request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabBookingRequest {
    #[serde(default)]
    pub test_ids: Vec<String>,
    #[serde(default)]
    pub package_ids: Vec<String>,
    pub collection_type: CollectionType,
    #[serde(default)]
    pub center_id: Option<String>,
    pub collection_date: NaiveDate,
    #[serde(default)]
    pub slot_id: Option<String>,
    #[serde(default)]
    pub slot_time: Option<NaiveTime>,
    pub patient: PatientDetails,
    /// Required for home collection
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub client_reference_id: Option<String>,
}

impl LabBookingRequest {
    /// Finds the slot this booking refers to, by ID first and start time second
    pub fn find_slot<'a>(&self, slots: &'a [CollectionSlot]) -> Option<&'a CollectionSlot> {
        self.slot_id
            .as_deref()
            .and_then(|id| slots.iter().find(|slot| slot.slot_id == id))
            .or_else(|| {
                let time = self.slot_time?;
                slots.iter().find(|slot| slot.start_time == time)
            })
    }
}

/// Canonical result of a lab booking operation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LabBookingResponse {
    pub success: bool,
    pub provider_booking_id: Option<String>,
    pub status: BookingStatus,
    pub message: String,
    pub collection_date: Option<NaiveDate>,
    pub slot_time: Option<NaiveTime>,
    pub total_amount: f64,
    pub extra_data: ExtraData,
}

/// Report for a lab booking
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LabReport {
    pub provider_booking_id: String,
    pub is_ready: bool,
    pub report_url: Option<String>,
    pub generated_at: Option<NaiveDateTime>,
    pub extra_data: ExtraData,
}
