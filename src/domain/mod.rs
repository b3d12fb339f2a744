//! Domain models and types for Carelink.
//!
//! This module contains the provider-agnostic vocabulary every adapter
//! translates into: plain value records with no behaviour beyond small
//! derived accessors.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Consultation types** ([`ProviderDoctor`], [`TimeSlot`], [`DoctorAvailability`],
//!   [`BookingRequest`], [`BookingResponse`])
//! - **Diagnostics types** ([`LabTest`], [`LabPackage`], [`DiagnosticCenter`],
//!   [`LabBookingRequest`], [`LabReport`])
//! - **Pharmacy types** ([`Medicine`], [`PharmacyStore`], [`CartItem`],
//!   [`PharmacyOrderRequest`])
//! - **Status enums** ([`AppointmentStatus`], [`BookingStatus`], [`OrderStatus`])
//! - **Error types** ([`ProviderError`], [`CarelinkError`])
//!
//! # Identity
//!
//! Records carry the provider-assigned ID plus the provider name; the pair is
//! the identity of the record across the system:
//!
//! ```rust
//! use carelink::domain::ProviderDoctor;
//!
//! let doctor = ProviderDoctor {
//!     provider_doctor_id: "7".to_string(),
//!     provider_name: "apollo".to_string(),
//!     name: "Dr. A".to_string(),
//!     ..Default::default()
//! };
//! assert_eq!(doctor.key(), ("apollo", "7"));
//! ```
//!
//! # Error Handling
//!
//! Provider operations return [`ProviderResult<T>`]; callers branch on the
//! error kind, never on the vendor:
//!
//! ```rust
//! use carelink::domain::{ProviderError, ProviderErrorKind};
//!
//! let err = ProviderError::slot_not_available("apollo", "slot taken");
//! match err.kind() {
//!     ProviderErrorKind::SlotNotAvailable => { /* offer another slot */ }
//!     _ => { /* retry later */ }
//! }
//! ```

pub mod capability;
pub mod common;
pub mod consultation;
pub mod diagnostics;
pub mod errors;
pub mod pharmacy;
pub mod result;
pub mod status;

pub use capability::{Capability, CapabilityFlags, ProviderInfo};
pub use common::{Address, ExtraData, Pagination, PatientDetails};
pub use consultation::{
    BookingRequest, BookingResponse, CancellationRequest, ConsultationMode, DoctorAvailability,
    DoctorSearchFilters, ProviderDoctor, RescheduleRequest, TimeSlot,
};
pub use diagnostics::{
    CollectionSlot, CollectionType, DiagnosticCenter, LabBookingRequest, LabBookingResponse,
    LabPackage, LabReport, LabTest, TestSearchFilters,
};
pub use errors::{CarelinkError, ProviderError, ProviderErrorKind};
pub use pharmacy::{
    CartItem, Medicine, MedicineSearchFilters, PharmacyOrderRequest, PharmacyOrderResponse,
    PharmacyStore,
};
pub use result::{ProviderResult, Result};
pub use status::{AppointmentStatus, BookingStatus, OrderStatus};
