//! Apollo diagnostics adapter

use super::client::ApolloClient;
use super::parse::{self, booking, center, lab_test, package, report, slot};
use super::{
    address_json, classify_booking_error, classify_lifecycle_error, patient_json, provider_info,
    segment,
};
use crate::adapters::capabilities::{DiagnosticsProvider, ProviderAdapter};
use crate::adapters::registry::ProviderContext;
use crate::domain::{
    BookingStatus, CancellationRequest, CollectionSlot, CollectionType, DiagnosticCenter,
    LabBookingRequest, LabBookingResponse, LabPackage, LabReport, LabTest, Pagination,
    ProviderError, ProviderInfo, ProviderResult, RescheduleRequest, TestSearchFilters,
};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use serde_json::{json, Value};

/// Collection windows are hourly unless Apollo says otherwise
pub const DEFAULT_COLLECTION_WINDOW_MINUTES: i64 = 60;

const COLLECTION_SLOT_LIST: &[&str] = &["collectionSlots", "slots", "timeSlots"];

pub struct ApolloDiagnosticsProvider {
    client: ApolloClient,
}

impl ApolloDiagnosticsProvider {
    pub fn new(context: &ProviderContext) -> ProviderResult<Self> {
        Ok(Self {
            client: ApolloClient::new(context)?,
        })
    }

    pub fn client(&self) -> &ApolloClient {
        &self.client
    }

    fn search_query(filters: &TestSearchFilters, pagination: Pagination) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", pagination.page.to_string()),
            ("pageSize", pagination.page_size.to_string()),
        ];
        if let Some(q) = &filters.query {
            query.push(("q", q.clone()));
        }
        if let Some(category) = &filters.category {
            query.push(("category", category.clone()));
        }
        if let Some(city) = &filters.city {
            query.push(("city", city.clone()));
        }
        query
    }
}

pub fn parse_lab_test(provider: &str, raw: &Value) -> LabTest {
    LabTest {
        provider_test_id: parse::text(raw, lab_test::ID),
        provider_name: provider.to_string(),
        name: parse::text(raw, lab_test::NAME),
        description: parse::text(raw, lab_test::DESCRIPTION),
        category: parse::text(raw, lab_test::CATEGORY),
        price: parse::number(raw, lab_test::PRICE),
        discounted_price: parse::opt_number(raw, lab_test::DISCOUNTED_PRICE),
        sample_type: parse::text(raw, lab_test::SAMPLE),
        preparation: parse::text(raw, lab_test::PREPARATION),
        turnaround_hours: parse::count(raw, lab_test::TURNAROUND),
        home_collection: parse::flag(raw, lab_test::HOME_COLLECTION, false),
        extra_data: parse::extra(raw, lab_test::EXTRA),
    }
}

/// Builds a package; embedded tests may be objects or bare test names
pub fn parse_package(provider: &str, raw: &Value) -> LabPackage {
    let tests: Vec<LabTest> = match parse::first(raw, package::TESTS) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(_) => Some(parse_lab_test(provider, item)),
                Value::String(name) if !name.trim().is_empty() => Some(LabTest {
                    provider_name: provider.to_string(),
                    name: name.trim().to_string(),
                    ..Default::default()
                }),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    let test_count = parse::opt_count(raw, package::TEST_COUNT)
        .unwrap_or_else(|| u32::try_from(tests.len()).unwrap_or(u32::MAX));

    LabPackage {
        provider_package_id: parse::text(raw, package::ID),
        provider_name: provider.to_string(),
        name: parse::text(raw, package::NAME),
        description: parse::text(raw, lab_test::DESCRIPTION),
        price: parse::number(raw, lab_test::PRICE),
        discounted_price: parse::opt_number(raw, lab_test::DISCOUNTED_PRICE),
        tests,
        test_count,
        extra_data: parse::extra(raw, package::EXTRA),
    }
}

pub fn parse_center(provider: &str, raw: &Value) -> DiagnosticCenter {
    DiagnosticCenter {
        provider_center_id: parse::text(raw, center::ID),
        provider_name: provider.to_string(),
        name: parse::text(raw, center::NAME),
        address: parse::text(raw, center::ADDRESS),
        city: parse::text(raw, center::CITY),
        pincode: parse::text(raw, center::PINCODE),
        phone: parse::text(raw, center::PHONE),
        latitude: parse::opt_number(raw, center::LATITUDE),
        longitude: parse::opt_number(raw, center::LONGITUDE),
        home_collection: parse::flag(raw, center::HOME_COLLECTION, false),
        extra_data: parse::extra(raw, center::EXTRA),
    }
}

/// Builds a collection slot; `None` when the start time is unusable
pub fn parse_collection_slot(date: NaiveDate, raw: &Value) -> Option<CollectionSlot> {
    let start_time = parse::time(raw, slot::START)?;
    let end_time = parse::time(raw, slot::END)
        .unwrap_or_else(|| start_time + Duration::minutes(DEFAULT_COLLECTION_WINDOW_MINUTES));
    let is_available = match parse::opt_flag(raw, slot::AVAILABLE) {
        Some(flag) => flag,
        None => match (
            parse::opt_count(raw, slot::CAPACITY),
            parse::opt_count(raw, slot::BOOKED),
        ) {
            (Some(capacity), Some(booked)) => capacity > booked,
            _ => true,
        },
    };

    Some(CollectionSlot {
        slot_id: parse::opt_text(raw, slot::ID)
            .unwrap_or_else(|| start_time.format("%H:%M").to_string()),
        date: parse::date(raw, booking::DATE).unwrap_or(date),
        start_time,
        end_time,
        is_available,
    })
}

pub fn parse_lab_booking_response(
    raw: &Value,
    fallback_id: Option<&str>,
    default_status: BookingStatus,
) -> LabBookingResponse {
    let success = parse::opt_flag(raw, booking::SUCCESS).unwrap_or(true);
    let status = match parse::opt_text(raw, booking::STATUS) {
        Some(vendor) => BookingStatus::from_vendor(&vendor),
        None if success => default_status,
        None => BookingStatus::Failed,
    };

    LabBookingResponse {
        success,
        provider_booking_id: parse::opt_text(raw, booking::ID)
            .or_else(|| fallback_id.map(str::to_string)),
        status,
        message: parse::opt_text(raw, booking::MESSAGE).unwrap_or_else(|| {
            let message = if success { "OK" } else { "Rejected by provider" };
            message.to_string()
        }),
        collection_date: parse::date(raw, booking::DATE),
        slot_time: parse::time(raw, booking::TIME),
        total_amount: parse::number(raw, booking::AMOUNT),
        extra_data: parse::record(raw)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
    }
}

pub fn parse_report(booking_id: &str, raw: &Value) -> LabReport {
    let report_url = parse::opt_text(raw, report::URL);
    LabReport {
        provider_booking_id: booking_id.to_string(),
        is_ready: parse::opt_flag(raw, report::READY).unwrap_or(report_url.is_some()),
        report_url,
        generated_at: parse::datetime(raw, report::GENERATED_AT),
        extra_data: parse::record(raw)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
    }
}

fn collection_code(collection_type: CollectionType) -> &'static str {
    match collection_type {
        CollectionType::HomeCollection => "HOME",
        CollectionType::CenterVisit => "CENTER",
    }
}

#[async_trait]
impl ProviderAdapter for ApolloDiagnosticsProvider {
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
impl DiagnosticsProvider for ApolloDiagnosticsProvider {
    async fn search_tests(
        &self,
        filters: &TestSearchFilters,
        pagination: Pagination,
    ) -> ProviderResult<Vec<LabTest>> {
        let query = Self::search_query(filters, pagination);
        let body = self.client.get("/tests", &query).await?;
        Ok(parse::list(&body, &["tests"])
            .iter()
            .map(|raw| parse_lab_test(self.client.provider(), raw))
            .collect())
    }

    async fn get_test_details(&self, test_id: &str) -> ProviderResult<LabTest> {
        let path = format!("/tests/{}", segment(test_id));
        let raw = self.client.get_record(&path, "Test").await?;
        Ok(parse_lab_test(self.client.provider(), &raw))
    }

    async fn search_packages(
        &self,
        filters: &TestSearchFilters,
        pagination: Pagination,
    ) -> ProviderResult<Vec<LabPackage>> {
        let query = Self::search_query(filters, pagination);
        let body = self.client.get("/packages", &query).await?;
        Ok(parse::list(&body, &["packages"])
            .iter()
            .map(|raw| parse_package(self.client.provider(), raw))
            .collect())
    }

    async fn get_package_details(&self, package_id: &str) -> ProviderResult<LabPackage> {
        let path = format!("/packages/{}", segment(package_id));
        let raw = self.client.get_record(&path, "Package").await?;
        Ok(parse_package(self.client.provider(), &raw))
    }

    async fn search_centers(
        &self,
        city: Option<&str>,
        pincode: Option<&str>,
    ) -> ProviderResult<Vec<DiagnosticCenter>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(city) = city {
            query.push(("city", city.to_string()));
        }
        if let Some(pincode) = pincode {
            query.push(("pincode", pincode.to_string()));
        }

        let body = self.client.get("/centers", &query).await?;
        Ok(parse::list(&body, center::LIST)
            .iter()
            .map(|raw| parse_center(self.client.provider(), raw))
            .collect())
    }

    async fn get_collection_slots(
        &self,
        date: NaiveDate,
        pincode: Option<&str>,
        center_id: Option<&str>,
    ) -> ProviderResult<Vec<CollectionSlot>> {
        let mut query = vec![("date", date.format("%Y-%m-%d").to_string())];
        if let Some(pincode) = pincode {
            query.push(("pincode", pincode.to_string()));
        }
        if let Some(center_id) = center_id {
            query.push(("centerId", center_id.to_string()));
        }

        let body = self.client.get("/collection-slots", &query).await?;
        let mut slots = Vec::new();
        for raw in parse::list(&body, COLLECTION_SLOT_LIST) {
            match parse_collection_slot(date, raw) {
                Some(parsed) => slots.push(parsed),
                None => tracing::warn!(
                    provider = %self.client.provider(),
                    %date,
                    slot = %raw,
                    "Dropping collection slot with unparseable start time"
                ),
            }
        }
        slots.sort_by_key(|s| s.start_time);
        Ok(slots)
    }

    async fn book_lab_test(
        &self,
        request: &LabBookingRequest,
    ) -> ProviderResult<LabBookingResponse> {
        let provider = self.client.provider();

        if request.test_ids.is_empty() && request.package_ids.is_empty() {
            return Err(ProviderError::booking_failed(
                provider,
                "Booking names no tests or packages",
                None,
                Some("EMPTY_BOOKING".to_string()),
            ));
        }
        if request.collection_type == CollectionType::HomeCollection && request.address.is_none() {
            return Err(ProviderError::booking_failed(
                provider,
                "Home collection requires an address",
                None,
                Some("ADDRESS_REQUIRED".to_string()),
            ));
        }

        if request.slot_id.is_some() || request.slot_time.is_some() {
            let pincode = request.address.as_ref().map(|a| a.pincode.as_str());
            let slots = self
                .get_collection_slots(request.collection_date, pincode, request.center_id.as_deref())
                .await?;
            if let Some(taken) = request.find_slot(&slots).filter(|s| !s.is_available) {
                return Err(ProviderError::slot_not_available(
                    provider,
                    format!(
                        "Collection slot {} on {} is no longer available",
                        taken.slot_id, request.collection_date
                    ),
                ));
            }
        }

        let body = json!({
            "testIds": request.test_ids,
            "packageIds": request.package_ids,
            "collectionType": collection_code(request.collection_type),
            "centerId": request.center_id,
            "collectionDate": request.collection_date.format("%Y-%m-%d").to_string(),
            "slotId": request.slot_id,
            "slotTime": request.slot_time.map(|t| t.format("%H:%M").to_string()),
            "patient": patient_json(&request.patient),
            "address": request.address.as_ref().map(address_json),
            "referenceId": request.client_reference_id,
        });

        let response = self
            .client
            .post("/bookings", &body)
            .await
            .map_err(classify_booking_error)?;

        let mut parsed = parse_lab_booking_response(&response, None, BookingStatus::Confirmed);
        parsed.collection_date = parsed.collection_date.or(Some(request.collection_date));
        parsed.slot_time = parsed.slot_time.or(request.slot_time);

        tracing::info!(
            provider = %provider,
            success = parsed.success,
            booking_id = ?parsed.provider_booking_id,
            tests = request.test_ids.len(),
            packages = request.package_ids.len(),
            "Lab booking submitted"
        );

        Ok(parsed)
    }

    async fn cancel_lab_booking(
        &self,
        request: &CancellationRequest,
    ) -> ProviderResult<LabBookingResponse> {
        let path = format!("/bookings/{}/cancel", segment(&request.provider_booking_id));
        let response = self
            .client
            .post(&path, &json!({ "reason": request.reason }))
            .await
            .map_err(|e| classify_lifecycle_error(e, |p, m| ProviderError::cancellation_failed(p, m)))?;

        Ok(parse_lab_booking_response(
            &response,
            Some(&request.provider_booking_id),
            BookingStatus::Cancelled,
        ))
    }

    async fn reschedule_lab_booking(
        &self,
        request: &RescheduleRequest,
    ) -> ProviderResult<LabBookingResponse> {
        let path = format!("/bookings/{}/reschedule", segment(&request.provider_booking_id));
        let body = json!({
            "newDate": request.new_date.format("%Y-%m-%d").to_string(),
            "newSlotTime": request.new_slot_time.format("%H:%M").to_string(),
            "newSlotId": request.new_slot_id,
            "reason": request.reason,
        });

        let response = self
            .client
            .put(&path, &body)
            .await
            .map_err(|e| classify_lifecycle_error(e, |p, m| ProviderError::reschedule_failed(p, m)))?;

        let mut parsed = parse_lab_booking_response(
            &response,
            Some(&request.provider_booking_id),
            BookingStatus::Confirmed,
        );
        parsed.collection_date = parsed.collection_date.or(Some(request.new_date));
        parsed.slot_time = parsed.slot_time.or(Some(request.new_slot_time));
        Ok(parsed)
    }

    async fn get_booking_status(&self, booking_id: &str) -> ProviderResult<LabBookingResponse> {
        let path = format!("/bookings/{}", segment(booking_id));
        let raw = self.client.get_record(&path, "Booking").await?;
        Ok(parse_lab_booking_response(&raw, Some(booking_id), BookingStatus::Pending))
    }

    async fn get_lab_report(&self, booking_id: &str) -> ProviderResult<LabReport> {
        let path = format!("/bookings/{}/report", segment(booking_id));
        let raw = self.client.get_record(&path, "Report").await?;
        Ok(parse_report(booking_id, &raw))
    }
}
