//! Consultation domain model
//!
//! Provider-agnostic doctor, slot and appointment types. Instances are built
//! by adapters when they parse a vendor response, or by callers when they
//! build a request, and are never mutated afterwards: a reschedule yields a
//! new [`BookingResponse`] rather than updating an existing one.

use super::common::{ExtraData, PatientDetails};
use super::status::AppointmentStatus;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Consultation mode a doctor supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationMode {
    /// Video or chat consultation
    Online,
    /// Visit at the hospital or clinic
    InClinic,
    /// Audio-only consultation
    Phone,
}

impl ConsultationMode {
    /// Maps a vendor mode string, returning `None` for unrecognised modes
    pub fn from_vendor(raw: &str) -> Option<Self> {
        let normalised: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match normalised.as_str() {
            "online" | "video" | "videoconsult" | "tele" | "teleconsultation" | "chat" => {
                Some(Self::Online)
            }
            "inclinic" | "offline" | "physical" | "inperson" | "walkin" | "hospital" => {
                Some(Self::InClinic)
            }
            "phone" | "audio" | "call" | "voice" => Some(Self::Phone),
            _ => None,
        }
    }
}

impl fmt::Display for ConsultationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Online => "online",
            Self::InClinic => "in_clinic",
            Self::Phone => "phone",
        };
        f.write_str(name)
    }
}

/// A doctor as listed by a consultation provider
///
/// `provider_doctor_id` together with `provider_name` uniquely identifies a
/// doctor across the whole system.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProviderDoctor {
    pub provider_doctor_id: String,
    pub provider_name: String,
    pub name: String,
    pub specialization: String,
    pub qualification: String,
    pub experience_years: u32,
    pub consultation_fee: f64,
    pub hospital_name: String,
    pub city: String,
    pub available_modes: Vec<ConsultationMode>,
    pub languages: Vec<String>,
    pub profile_image_url: Option<String>,
    pub extra_data: ExtraData,
}

impl ProviderDoctor {
    /// System-wide identity of this doctor
    pub fn key(&self) -> (&str, &str) {
        (&self.provider_name, &self.provider_doctor_id)
    }

    /// Whether the doctor offers `mode`
    pub fn supports(&self, mode: ConsultationMode) -> bool {
        self.available_modes.contains(&mode)
    }
}

/// Optional filters for doctor search
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DoctorSearchFilters {
    pub specialization: Option<String>,
    pub city: Option<String>,
    pub name: Option<String>,
    pub mode: Option<ConsultationMode>,
}

impl DoctorSearchFilters {
    pub fn specialization(mut self, specialization: impl Into<String>) -> Self {
        self.specialization = Some(specialization.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn mode(mut self, mode: ConsultationMode) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// A bookable consultation slot
///
/// Availability is derived from `capacity > booked_count`. A vendor reporting
/// more bookings than capacity yields an unavailable slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub slot_id: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub capacity: u32,
    pub booked_count: u32,
}

impl TimeSlot {
    pub fn new(
        slot_id: impl Into<String>,
        start_time: NaiveTime,
        end_time: NaiveTime,
        capacity: u32,
        booked_count: u32,
    ) -> Self {
        Self {
            slot_id: slot_id.into(),
            start_time,
            end_time,
            capacity,
            booked_count,
        }
    }

    /// True while at least one place is left in the slot
    pub fn is_available(&self) -> bool {
        self.capacity > self.booked_count
    }

    /// Places left, zero when overbooked
    pub fn remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.booked_count)
    }
}

/// Slots offered by one doctor on one date
///
/// Produced fresh per request and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorAvailability {
    pub provider_doctor_id: String,
    pub date: NaiveDate,
    pub slots: Vec<TimeSlot>,
}

impl DoctorAvailability {
    pub fn new(provider_doctor_id: impl Into<String>, date: NaiveDate, slots: Vec<TimeSlot>) -> Self {
        Self {
            provider_doctor_id: provider_doctor_id.into(),
            date,
            slots,
        }
    }

    /// Slots that can still be booked
    pub fn available_slots(&self) -> impl Iterator<Item = &TimeSlot> {
        self.slots.iter().filter(|slot| slot.is_available())
    }

    /// Finds the slot a booking refers to, by ID first and start time second
    pub fn find_slot(&self, slot_id: Option<&str>, start_time: NaiveTime) -> Option<&TimeSlot> {
        slot_id
            .and_then(|id| self.slots.iter().find(|slot| slot.slot_id == id))
            .or_else(|| self.slots.iter().find(|slot| slot.start_time == start_time))
    }
}

/// Canonical consultation booking request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub provider_doctor_id: String,
    pub appointment_date: NaiveDate,
    pub slot_time: NaiveTime,
    #[serde(default)]
    pub slot_id: Option<String>,
    pub mode: ConsultationMode,
    pub patient: PatientDetails,
    #[serde(default)]
    pub reason: Option<String>,
    /// Caller's reference, forwarded to the provider for idempotency
    #[serde(default)]
    pub client_reference_id: Option<String>,
}

/// Canonical result of a booking, cancellation or reschedule
///
/// `success == false` is a normal outcome reported by the provider, distinct
/// from a raised [`ProviderError`](crate::domain::ProviderError).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BookingResponse {
    pub success: bool,
    pub provider_booking_id: Option<String>,
    pub status: AppointmentStatus,
    pub message: String,
    pub appointment_date: Option<NaiveDate>,
    pub slot_time: Option<NaiveTime>,
    pub consultation_link: Option<String>,
    pub extra_data: ExtraData,
}

/// Cancellation keyed by the provider's own appointment identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationRequest {
    pub provider_booking_id: String,
    #[serde(default)]
    pub reason: Option<String>,
}

impl CancellationRequest {
    pub fn new(provider_booking_id: impl Into<String>) -> Self {
        Self {
            provider_booking_id: provider_booking_id.into(),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Reschedule keyed by the provider's own appointment identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescheduleRequest {
    pub provider_booking_id: String,
    pub new_date: NaiveDate,
    pub new_slot_time: NaiveTime,
    #[serde(default)]
    pub new_slot_id: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_time_slot_availability() {
        let open = TimeSlot::new("s1", time(9, 0), time(9, 15), 2, 1);
        let full = TimeSlot::new("s2", time(9, 15), time(9, 30), 1, 1);
        assert!(open.is_available());
        assert!(!full.is_available());
        assert_eq!(open.remaining(), 1);
    }

    #[test]
    fn test_overbooked_slot_is_not_available() {
        let slot = TimeSlot::new("s1", time(10, 0), time(10, 15), 1, 3);
        assert!(!slot.is_available());
        assert_eq!(slot.remaining(), 0);
    }

    #[test]
    fn test_find_slot_prefers_id() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let availability = DoctorAvailability::new(
            "7",
            date,
            vec![
                TimeSlot::new("a", time(9, 0), time(9, 15), 1, 0),
                TimeSlot::new("b", time(9, 15), time(9, 30), 1, 0),
            ],
        );

        let by_id = availability.find_slot(Some("b"), time(9, 0)).unwrap();
        assert_eq!(by_id.slot_id, "b");

        let by_time = availability.find_slot(None, time(9, 0)).unwrap();
        assert_eq!(by_time.slot_id, "a");

        assert!(availability.find_slot(Some("zz"), time(18, 0)).is_none());
    }

    #[test]
    fn test_consultation_mode_from_vendor() {
        assert_eq!(ConsultationMode::from_vendor("VIDEO"), Some(ConsultationMode::Online));
        assert_eq!(ConsultationMode::from_vendor("in-clinic"), Some(ConsultationMode::InClinic));
        assert_eq!(ConsultationMode::from_vendor("Audio"), Some(ConsultationMode::Phone));
        assert_eq!(ConsultationMode::from_vendor("hologram"), None);
    }

    #[test]
    fn test_doctor_default_is_empty() {
        let doctor = ProviderDoctor::default();
        assert_eq!(doctor.name, "");
        assert_eq!(doctor.consultation_fee, 0.0);
        assert!(doctor.available_modes.is_empty());
        assert!(doctor.extra_data.is_empty());
    }

    #[test]
    fn test_doctor_key() {
        let doctor = ProviderDoctor {
            provider_doctor_id: "7".to_string(),
            provider_name: "apollo".to_string(),
            ..Default::default()
        };
        assert_eq!(doctor.key(), ("apollo", "7"));
    }

    #[test]
    fn test_booking_response_default_is_pending_failure() {
        let response = BookingResponse::default();
        assert!(!response.success);
        assert_eq!(response.status, AppointmentStatus::Pending);
    }
}
