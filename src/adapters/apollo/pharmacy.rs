//! Apollo pharmacy adapter

use super::client::ApolloClient;
use super::parse::{self, booking, medicine, order, store};
use super::{
    address_json, classify_booking_error, classify_lifecycle_error, patient_json, provider_info,
    segment,
};
use crate::adapters::capabilities::{PharmacyProvider, ProviderAdapter};
use crate::adapters::registry::ProviderContext;
use crate::domain::{
    CancellationRequest, Medicine, MedicineSearchFilters, OrderStatus, Pagination,
    PharmacyOrderRequest, PharmacyOrderResponse, PharmacyStore, ProviderError, ProviderInfo,
    ProviderResult,
};
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct ApolloPharmacyProvider {
    client: ApolloClient,
}

impl ApolloPharmacyProvider {
    pub fn new(context: &ProviderContext) -> ProviderResult<Self> {
        Ok(Self {
            client: ApolloClient::new(context)?,
        })
    }

    pub fn client(&self) -> &ApolloClient {
        &self.client
    }
}

/// Builds a medicine; selling price falls back to MRP when not discounted
pub fn parse_medicine(provider: &str, raw: &Value) -> Medicine {
    let mrp = parse::number(raw, medicine::MRP);
    Medicine {
        provider_medicine_id: parse::text(raw, medicine::ID),
        provider_name: provider.to_string(),
        name: parse::text(raw, medicine::NAME),
        generic_name: parse::text(raw, medicine::GENERIC),
        manufacturer: parse::text(raw, medicine::MANUFACTURER),
        composition: parse::text(raw, medicine::COMPOSITION),
        pack_size: parse::text(raw, medicine::PACK_SIZE),
        dosage_form: parse::text(raw, medicine::DOSAGE_FORM),
        mrp,
        selling_price: parse::opt_number(raw, medicine::SELLING_PRICE).unwrap_or(mrp),
        requires_prescription: parse::flag(raw, medicine::PRESCRIPTION, false),
        in_stock: parse::flag(raw, medicine::IN_STOCK, false),
        extra_data: parse::extra(raw, medicine::EXTRA),
    }
}

pub fn parse_store(provider: &str, raw: &Value) -> PharmacyStore {
    PharmacyStore {
        provider_store_id: parse::text(raw, store::ID),
        provider_name: provider.to_string(),
        name: parse::text(raw, store::NAME),
        address: parse::text(raw, store::ADDRESS),
        city: parse::text(raw, store::CITY),
        pincode: parse::text(raw, store::PINCODE),
        phone: parse::text(raw, store::PHONE),
        is_open: parse::flag(raw, store::IS_OPEN, false),
        delivery_available: parse::flag(raw, store::DELIVERY, false),
        extra_data: parse::extra(raw, store::EXTRA),
    }
}

pub fn parse_order_response(
    raw: &Value,
    fallback_id: Option<&str>,
    default_status: OrderStatus,
) -> PharmacyOrderResponse {
    let success = parse::opt_flag(raw, booking::SUCCESS).unwrap_or(true);
    let status = match parse::opt_text(raw, booking::STATUS) {
        Some(vendor) => OrderStatus::from_vendor(&vendor),
        None if success => default_status,
        None => OrderStatus::Failed,
    };

    PharmacyOrderResponse {
        success,
        provider_order_id: parse::opt_text(raw, booking::ID)
            .or_else(|| fallback_id.map(str::to_string)),
        status,
        message: parse::opt_text(raw, booking::MESSAGE).unwrap_or_else(|| {
            let message = if success { "OK" } else { "Rejected by provider" };
            message.to_string()
        }),
        total_amount: parse::number(raw, booking::AMOUNT),
        estimated_delivery: parse::datetime(raw, order::ESTIMATED_DELIVERY),
        tracking_url: parse::opt_text(raw, order::TRACKING_URL),
        extra_data: parse::record(raw)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
    }
}

#[async_trait]
impl ProviderAdapter for ApolloPharmacyProvider {
    async fn authenticate(&self) -> ProviderResult<bool> {
        self.client.authenticate().await
    }

    fn is_authenticated(&self) -> bool {
        self.client.is_authenticated()
    }

    fn provider_info(&self) -> ProviderInfo {
        provider_info(self.client.provider())
    }

    async fn health_check(&self) -> bool {
        self.client.health_check().await
    }
}

#[async_trait]
impl PharmacyProvider for ApolloPharmacyProvider {
    async fn search_medicines(
        &self,
        filters: &MedicineSearchFilters,
        pagination: Pagination,
    ) -> ProviderResult<Vec<Medicine>> {
        let mut query: Vec<(&str, String)> = vec![
            ("page", pagination.page.to_string()),
            ("pageSize", pagination.page_size.to_string()),
        ];
        if let Some(q) = &filters.query {
            query.push(("q", q.clone()));
        }
        if let Some(category) = &filters.category {
            query.push(("category", category.clone()));
        }
        if let Some(pincode) = &filters.pincode {
            query.push(("pincode", pincode.clone()));
        }

        let body = self.client.get("/medicines", &query).await?;
        Ok(parse::list(&body, medicine::LIST)
            .iter()
            .map(|raw| parse_medicine(self.client.provider(), raw))
            .collect())
    }

    async fn get_medicine_details(&self, medicine_id: &str) -> ProviderResult<Medicine> {
        let path = format!("/medicines/{}", segment(medicine_id));
        let raw = self.client.get_record(&path, "Medicine").await?;
        Ok(parse_medicine(self.client.provider(), &raw))
    }

    async fn get_stores(
        &self,
        city: Option<&str>,
        pincode: Option<&str>,
    ) -> ProviderResult<Vec<PharmacyStore>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(city) = city {
            query.push(("city", city.to_string()));
        }
        if let Some(pincode) = pincode {
            query.push(("pincode", pincode.to_string()));
        }

        let body = self.client.get("/stores", &query).await?;
        Ok(parse::list(&body, store::LIST)
            .iter()
            .map(|raw| parse_store(self.client.provider(), raw))
            .collect())
    }

    async fn place_order(
        &self,
        request: &PharmacyOrderRequest,
    ) -> ProviderResult<PharmacyOrderResponse> {
        if request.items.is_empty() {
            return Err(ProviderError::booking_failed(
                self.client.provider(),
                "Order has no items",
                None,
                Some("EMPTY_ORDER".to_string()),
            ));
        }

        let items: Vec<Value> = request
            .items
            .iter()
            .map(|item| {
                json!({
                    "medicineId": item.provider_medicine_id,
                    "name": item.name,
                    "quantity": item.quantity,
                    "unitPrice": item.unit_price,
                    "totalPrice": item.total_price,
                })
            })
            .collect();

        let body = json!({
            "items": items,
            "patient": patient_json(&request.patient),
            "deliveryAddress": address_json(&request.delivery_address),
            "storeId": request.store_id,
            "prescriptionUrls": request.prescription_urls,
            "paymentMode": request.payment_mode,
            "referenceId": request.client_reference_id,
        });

        let response = self
            .client
            .post("/orders", &body)
            .await
            .map_err(classify_booking_error)?;

        let parsed = parse_order_response(&response, None, OrderStatus::Confirmed);
        tracing::info!(
            provider = %self.client.provider(),
            success = parsed.success,
            order_id = ?parsed.provider_order_id,
            items = request.items.len(),
            "Pharmacy order submitted"
        );
        Ok(parsed)
    }

    async fn cancel_order(
        &self,
        request: &CancellationRequest,
    ) -> ProviderResult<PharmacyOrderResponse> {
        let path = format!("/orders/{}/cancel", segment(&request.provider_booking_id));
        let response = self
            .client
            .post(&path, &json!({ "reason": request.reason }))
            .await
            .map_err(|e| classify_lifecycle_error(e, |p, m| ProviderError::cancellation_failed(p, m)))?;

        Ok(parse_order_response(
            &response,
            Some(&request.provider_booking_id),
            OrderStatus::Cancelled,
        ))
    }

    async fn get_order_status(&self, order_id: &str) -> ProviderResult<PharmacyOrderResponse> {
        let path = format!("/orders/{}", segment(order_id));
        let raw = self.client.get_record(&path, "Order").await?;
        Ok(parse_order_response(&raw, Some(order_id), OrderStatus::Pending))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medicine_selling_price_falls_back_to_mrp() {
        let raw = json!({"sku": "M-1", "productName": "Paracetamol 500mg", "mrp": 30});
        let medicine = parse_medicine("apollo", &raw);
        assert_eq!(medicine.provider_medicine_id, "M-1");
        assert_eq!(medicine.selling_price, 30.0);
        assert!(!medicine.requires_prescription);
        assert_eq!(medicine.extra_data.get("sku"), Some(&json!("M-1")));
    }

    #[test]
    fn test_medicine_flags_accept_strings() {
        let raw = json!({"isRx": "Yes", "inStock": 1, "specialPrice": "27.5"});
        let medicine = parse_medicine("apollo", &raw);
        assert!(medicine.requires_prescription);
        assert!(medicine.in_stock);
        assert_eq!(medicine.selling_price, 27.5);
    }

    #[test]
    fn test_store_defaults() {
        let store = parse_store("apollo", &json!({"storeId": 11, "storeName": "Adyar"}));
        assert_eq!(store.provider_store_id, "11");
        assert!(!store.is_open);
        assert!(!store.delivery_available);
    }

    #[test]
    fn test_order_response_delivery_and_tracking() {
        let raw = json!({
            "orderId": "ORD-1",
            "orderStatus": "PLACED",
            "orderTotal": 412.0,
            "estimatedDelivery": "2025-03-15T18:00:00",
            "trackingUrl": "https://track.example/ORD-1",
        });
        let response = parse_order_response(&raw, None, OrderStatus::Confirmed);
        assert_eq!(response.provider_order_id.as_deref(), Some("ORD-1"));
        assert_eq!(response.status, OrderStatus::Confirmed);
        assert_eq!(response.total_amount, 412.0);
        assert!(response.estimated_delivery.is_some());
        assert_eq!(response.tracking_url.as_deref(), Some("https://track.example/ORD-1"));
    }

    #[test]
    fn test_cancel_response_keeps_requested_id() {
        let response = parse_order_response(&json!({}), Some("ORD-9"), OrderStatus::Cancelled);
        assert!(response.success);
        assert_eq!(response.status, OrderStatus::Cancelled);
        assert_eq!(response.provider_order_id.as_deref(), Some("ORD-9"));
        assert!(response.extra_data.is_empty());
    }
}
