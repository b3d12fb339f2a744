//! Pharmacy capability

use super::ProviderAdapter;
use crate::domain::{
    CancellationRequest, Medicine, MedicineSearchFilters, Pagination, PharmacyOrderRequest,
    PharmacyOrderResponse, PharmacyStore, ProviderResult,
};
use async_trait::async_trait;

/// Medicine catalog, stores and order lifecycle
#[async_trait]
pub trait PharmacyProvider: ProviderAdapter {
    async fn search_medicines(
        &self,
        filters: &MedicineSearchFilters,
        pagination: Pagination,
    ) -> ProviderResult<Vec<Medicine>>;

    async fn get_medicine_details(&self, medicine_id: &str) -> ProviderResult<Medicine>;

    async fn get_stores(
        &self,
        city: Option<&str>,
        pincode: Option<&str>,
    ) -> ProviderResult<Vec<PharmacyStore>>;

    /// Places an order. Item totals are taken from the request as given.
    async fn place_order(&self, request: &PharmacyOrderRequest)
        -> ProviderResult<PharmacyOrderResponse>;

    async fn cancel_order(
        &self,
        request: &CancellationRequest,
    ) -> ProviderResult<PharmacyOrderResponse>;

    async fn get_order_status(&self, order_id: &str) -> ProviderResult<PharmacyOrderResponse>;
}
