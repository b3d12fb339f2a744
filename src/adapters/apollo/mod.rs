//! Apollo adapter
//!
//! Implements all three capabilities against the Apollo partner API. Each
//! capability gets its own [`ApolloClient`] (and therefore its own token
//! cache entry) because Apollo issues separate credentials per product line.
//!
//! Not-found signal: a detail lookup for a missing ID yields either `404` or
//! `200` with an empty body. Both are reported as
//! `ProviderError::Api { status_code: Some(404), .. }`; use
//! [`ProviderError::is_not_found`](crate::domain::ProviderError::is_not_found).

pub mod client;
pub mod consultation;
pub mod diagnostics;
pub mod parse;
pub mod pharmacy;

pub use client::{ApolloClient, CATALOG_TTL, TOKEN_TTL};
pub use consultation::ApolloConsultationProvider;
pub use diagnostics::ApolloDiagnosticsProvider;
pub use pharmacy::ApolloPharmacyProvider;

use crate::adapters::capabilities::{ConsultationProvider, DiagnosticsProvider, PharmacyProvider};
use crate::adapters::registry::ProviderRegistry;
use crate::domain::{Address, CapabilityFlags, PatientDetails, ProviderError, ProviderInfo};
use serde_json::{json, Value};
use std::sync::Arc;

/// Name Apollo registers under
pub const PROVIDER_NAME: &str = "apollo";

pub const API_VERSION: &str = "v1";

/// Registers the three Apollo adapters under [`PROVIDER_NAME`]
pub fn register(registry: &ProviderRegistry) {
    registry.register_consultation_provider(PROVIDER_NAME, |context| {
        let provider: Arc<dyn ConsultationProvider> =
            Arc::new(ApolloConsultationProvider::new(context)?);
        Ok(provider)
    });
    registry.register_diagnostics_provider(PROVIDER_NAME, |context| {
        let provider: Arc<dyn DiagnosticsProvider> =
            Arc::new(ApolloDiagnosticsProvider::new(context)?);
        Ok(provider)
    });
    registry.register_pharmacy_provider(PROVIDER_NAME, |context| {
        let provider: Arc<dyn PharmacyProvider> = Arc::new(ApolloPharmacyProvider::new(context)?);
        Ok(provider)
    });
}

pub(crate) fn provider_info(name: &str) -> ProviderInfo {
    ProviderInfo {
        name: name.to_string(),
        display_name: "Apollo".to_string(),
        capabilities: CapabilityFlags {
            consultation: true,
            diagnostics: true,
            pharmacy: true,
        },
        api_version: API_VERSION.to_string(),
    }
}

/// Percent-encodes an identifier for use as one path segment
pub(crate) fn segment(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.trim().as_bytes()).collect()
}

pub(crate) fn patient_json(patient: &PatientDetails) -> Value {
    json!({
        "name": patient.name,
        "phone": patient.phone,
        "email": patient.email,
        "age": patient.age,
        "gender": patient.gender,
    })
}

pub(crate) fn address_json(address: &Address) -> Value {
    json!({
        "line1": address.line1,
        "line2": address.line2,
        "landmark": address.landmark,
        "city": address.city,
        "state": address.state,
        "pincode": address.pincode,
    })
}

fn vendor_error_code(err: &ProviderError) -> Option<String> {
    err.response_data()
        .and_then(|data| parse::opt_text(data, parse::booking::ERROR_CODE))
}

/// Maps a failed booking call onto the booking taxonomy
///
/// `409` or a vendor error code mentioning `SLOT` is slot contention; any
/// other client error (except an unrecovered `401`) is a rejection. Server
/// and transport errors pass through unchanged.
pub(crate) fn classify_booking_error(err: ProviderError) -> ProviderError {
    let Some(status) = err.status_code() else {
        return err;
    };

    let code = vendor_error_code(&err);
    let slot_contention =
        status == 409 || code.as_deref().is_some_and(|c| c.to_uppercase().contains("SLOT"));

    if slot_contention {
        let mapped = ProviderError::slot_not_available(err.provider(), err.message());
        return with_vendor_body(mapped, &err);
    }

    if (400..500).contains(&status) && status != 401 {
        let mapped = ProviderError::booking_failed(
            err.provider(),
            err.message(),
            None,
            code.or_else(|| Some(err.message().to_string())),
        );
        return with_vendor_body(mapped, &err);
    }

    err
}

fn with_vendor_body(mapped: ProviderError, original: &ProviderError) -> ProviderError {
    match original.response_data() {
        Some(body) => mapped.with_details(body.clone()),
        None => mapped,
    }
}

/// Maps a failed cancel/reschedule call onto `make` for client errors
pub(crate) fn classify_lifecycle_error(
    err: ProviderError,
    make: fn(&str, &str) -> ProviderError,
) -> ProviderError {
    match err.status_code() {
        Some(status) if (400..500).contains(&status) && status != 401 => {
            with_vendor_body(make(err.provider(), err.message()), &err)
        }
        _ => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProviderErrorKind;

    #[test]
    fn test_conflict_is_slot_contention() {
        let err = ProviderError::api("apollo", "Conflict", Some(409), None);
        assert_eq!(classify_booking_error(err).kind(), ProviderErrorKind::SlotNotAvailable);
    }

    #[test]
    fn test_slot_error_code_is_slot_contention() {
        let err = ProviderError::api(
            "apollo",
            "Slot already booked",
            Some(400),
            Some(json!({"errorCode": "SLOT_UNAVAILABLE"})),
        );
        let classified = classify_booking_error(err);
        assert_eq!(classified.kind(), ProviderErrorKind::SlotNotAvailable);
        assert_eq!(classified.details(), Some(&json!({"errorCode": "SLOT_UNAVAILABLE"})));
    }

    #[test]
    fn test_other_client_errors_are_booking_failures() {
        let err = ProviderError::api(
            "apollo",
            "Patient blocked",
            Some(422),
            Some(json!({"errorCode": "PATIENT_BLOCKED"})),
        );
        match classify_booking_error(err) {
            ProviderError::BookingFailed { reason, .. } => {
                assert_eq!(reason.as_deref(), Some("PATIENT_BLOCKED"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_server_and_auth_errors_pass_through() {
        let server = ProviderError::api("apollo", "Bad gateway", Some(502), None);
        assert_eq!(classify_booking_error(server).kind(), ProviderErrorKind::Api);

        let auth = ProviderError::api("apollo", "Unauthorized", Some(401), None);
        assert_eq!(classify_booking_error(auth).kind(), ProviderErrorKind::Api);

        let transport = ProviderError::transport("apollo", "timed out");
        assert_eq!(classify_booking_error(transport).kind(), ProviderErrorKind::Api);
    }

    #[test]
    fn test_lifecycle_classification() {
        let err = ProviderError::api("apollo", "Too late to cancel", Some(400), None);
        let classified = classify_lifecycle_error(err, |p, m| ProviderError::cancellation_failed(p, m));
        assert_eq!(classified.kind(), ProviderErrorKind::CancellationFailed);

        let err = ProviderError::api("apollo", "Down", Some(503), None);
        let classified = classify_lifecycle_error(err, |p, m| ProviderError::reschedule_failed(p, m));
        assert_eq!(classified.kind(), ProviderErrorKind::Api);
    }

    #[test]
    fn test_segment_encodes_separators() {
        assert_eq!(segment("A/1"), "A%2F1");
        assert_eq!(segment(" 42 "), "42");
    }

    #[test]
    fn test_provider_info_declares_all_capabilities() {
        let info = provider_info("apollo");
        assert!(info.capabilities.consultation && info.capabilities.diagnostics && info.capabilities.pharmacy);
    }
}
