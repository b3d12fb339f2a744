//! Diagnostics capability

use super::ProviderAdapter;
use crate::domain::{
    CancellationRequest, CollectionSlot, DiagnosticCenter, LabBookingRequest, LabBookingResponse,
    LabPackage, LabReport, LabTest, Pagination, ProviderResult, RescheduleRequest,
    TestSearchFilters,
};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Lab test catalog, sample collection and lab booking lifecycle
#[async_trait]
pub trait DiagnosticsProvider: ProviderAdapter {
    async fn search_tests(
        &self,
        filters: &TestSearchFilters,
        pagination: Pagination,
    ) -> ProviderResult<Vec<LabTest>>;

    async fn get_test_details(&self, test_id: &str) -> ProviderResult<LabTest>;

    async fn search_packages(
        &self,
        filters: &TestSearchFilters,
        pagination: Pagination,
    ) -> ProviderResult<Vec<LabPackage>>;

    /// Fetches one package, including its embedded tests when the vendor lists them
    async fn get_package_details(&self, package_id: &str) -> ProviderResult<LabPackage>;

    async fn search_centers(
        &self,
        city: Option<&str>,
        pincode: Option<&str>,
    ) -> ProviderResult<Vec<DiagnosticCenter>>;

    /// Sample collection slots for a date, narrowed by pincode (home
    /// collection) or center (center visit)
    async fn get_collection_slots(
        &self,
        date: NaiveDate,
        pincode: Option<&str>,
        center_id: Option<&str>,
    ) -> ProviderResult<Vec<CollectionSlot>>;

    /// Books tests and/or packages
    ///
    /// # Errors
    ///
    /// `SlotNotAvailable` when the collection slot has been taken,
    /// `BookingFailed` for any other rejection.
    async fn book_lab_test(&self, request: &LabBookingRequest)
        -> ProviderResult<LabBookingResponse>;

    async fn cancel_lab_booking(
        &self,
        request: &CancellationRequest,
    ) -> ProviderResult<LabBookingResponse>;

    async fn reschedule_lab_booking(
        &self,
        request: &RescheduleRequest,
    ) -> ProviderResult<LabBookingResponse>;

    async fn get_booking_status(&self, booking_id: &str) -> ProviderResult<LabBookingResponse>;

    /// Report for a booking; `is_ready` is false until the lab publishes it
    async fn get_lab_report(&self, booking_id: &str) -> ProviderResult<LabReport>;
}
