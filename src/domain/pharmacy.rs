//! Pharmacy domain model

use super::common::{Address, ExtraData, PatientDetails};
use super::status::OrderStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A medicine as listed in a provider's catalog
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Medicine {
    pub provider_medicine_id: String,
    pub provider_name: String,
    pub name: String,
    pub generic_name: String,
    pub manufacturer: String,
    pub composition: String,
    pub pack_size: String,
    pub dosage_form: String,
    pub mrp: f64,
    pub selling_price: f64,
    pub requires_prescription: bool,
    pub in_stock: bool,
    pub extra_data: ExtraData,
}

/// Optional filters for medicine search
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MedicineSearchFilters {
    pub query: Option<String>,
    pub category: Option<String>,
    pub pincode: Option<String>,
}

impl MedicineSearchFilters {
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn pincode(mut self, pincode: impl Into<String>) -> Self {
        self.pincode = Some(pincode.into());
        self
    }
}

/// A pharmacy outlet
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PharmacyStore {
    pub provider_store_id: String,
    pub provider_name: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
    pub phone: String,
    pub is_open: bool,
    pub delivery_available: bool,
    pub extra_data: ExtraData,
}

/// One line of a pharmacy order
///
/// `total_price` is computed by the caller and forwarded as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub provider_medicine_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
}

/// Canonical pharmacy order request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PharmacyOrderRequest {
    pub items: Vec<CartItem>,
    pub patient: PatientDetails,
    pub delivery_address: Address,
    #[serde(default)]
    pub store_id: Option<String>,
    #[serde(default)]
    pub prescription_urls: Vec<String>,
    #[serde(default)]
    pub payment_mode: Option<String>,
    #[serde(default)]
    pub client_reference_id: Option<String>,
}

/// Canonical result of a pharmacy order operation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PharmacyOrderResponse {
    pub success: bool,
    pub provider_order_id: Option<String>,
    pub status: OrderStatus,
    pub message: String,
    pub total_amount: f64,
    pub estimated_delivery: Option<NaiveDateTime>,
    pub tracking_url: Option<String>,
    pub extra_data: ExtraData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_item_total_is_not_derived() {
        let item = CartItem {
            provider_medicine_id: "M-1".to_string(),
            name: "Paracetamol 500mg".to_string(),
            quantity: 2,
            unit_price: 30.0,
            total_price: 55.0,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["total_price"], 55.0);
    }

    #[test]
    fn test_order_response_default() {
        let response = PharmacyOrderResponse::default();
        assert!(!response.success);
        assert_eq!(response.status, OrderStatus::Pending);
        assert!(response.provider_order_id.is_none());
    }
}
