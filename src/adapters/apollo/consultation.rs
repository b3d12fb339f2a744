//! Apollo consultation adapter

use super::client::ApolloClient;
use super::parse::{self, booking, doctor, slot};
use super::{
    classify_booking_error, classify_lifecycle_error, patient_json, provider_info, segment,
};
use crate::adapters::capabilities::{ConsultationProvider, ProviderAdapter};
use crate::adapters::registry::ProviderContext;
use crate::domain::{
    AppointmentStatus, BookingRequest, BookingResponse, CancellationRequest, ConsultationMode,
    DoctorAvailability, DoctorSearchFilters, Pagination, ProviderDoctor, ProviderError,
    ProviderInfo, ProviderResult, RescheduleRequest, TimeSlot,
};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime};
use serde_json::{json, Value};

/// Length assumed for a slot when Apollo omits its end time
pub const DEFAULT_SLOT_MINUTES: i64 = 15;

/// Capacity assumed when Apollo omits it
const DEFAULT_SLOT_CAPACITY: u32 = 1;

pub struct ApolloConsultationProvider {
    client: ApolloClient,
}

impl ApolloConsultationProvider {
    pub fn new(context: &ProviderContext) -> ProviderResult<Self> {
        Ok(Self {
            client: ApolloClient::new(context)?,
        })
    }

    pub fn client(&self) -> &ApolloClient {
        &self.client
    }
}

/// Builds a doctor from an Apollo payload; every missing field defaults
pub fn parse_doctor(provider: &str, raw: &Value) -> ProviderDoctor {
    let mut available_modes: Vec<ConsultationMode> = Vec::new();
    for mode in parse::text_list(raw, doctor::MODES)
        .iter()
        .filter_map(|m| ConsultationMode::from_vendor(m))
    {
        if !available_modes.contains(&mode) {
            available_modes.push(mode);
        }
    }

    ProviderDoctor {
        provider_doctor_id: parse::text(raw, doctor::ID),
        provider_name: provider.to_string(),
        name: parse::text(raw, doctor::NAME),
        specialization: parse::text(raw, doctor::SPECIALIZATION),
        qualification: parse::text_list(raw, doctor::QUALIFICATION).join(", "),
        experience_years: parse::count(raw, doctor::EXPERIENCE),
        consultation_fee: parse::number(raw, doctor::FEE),
        hospital_name: parse::text(raw, doctor::HOSPITAL),
        city: parse::text(raw, doctor::CITY),
        available_modes,
        languages: parse::text_list(raw, doctor::LANGUAGES),
        profile_image_url: parse::opt_text(raw, doctor::IMAGE),
        extra_data: parse::extra(raw, doctor::EXTRA),
    }
}

/// Builds a slot; `None` when the start time is missing or unparseable
///
/// A missing end time is synthesised as start + [`DEFAULT_SLOT_MINUTES`]. A
/// missing booked count is derived from an availability flag when present.
pub fn parse_slot(raw: &Value) -> Option<TimeSlot> {
    let start_time = parse::time(raw, slot::START)?;
    let end_time = parse::time(raw, slot::END)
        .unwrap_or_else(|| start_time + Duration::minutes(DEFAULT_SLOT_MINUTES));
    let capacity = parse::opt_count(raw, slot::CAPACITY).unwrap_or(DEFAULT_SLOT_CAPACITY);
    let booked_count = parse::opt_count(raw, slot::BOOKED).unwrap_or_else(|| {
        match parse::opt_flag(raw, slot::AVAILABLE) {
            Some(false) => capacity,
            _ => 0,
        }
    });
    let slot_id = parse::opt_text(raw, slot::ID)
        .unwrap_or_else(|| start_time.format("%H:%M").to_string());

    Some(TimeSlot::new(slot_id, start_time, end_time, capacity, booked_count))
}

/// Builds a booking response; a body without `success` counts as success
pub fn parse_booking_response(
    raw: &Value,
    fallback_id: Option<&str>,
    default_status: AppointmentStatus,
) -> BookingResponse {
    let success = parse::opt_flag(raw, booking::SUCCESS).unwrap_or(true);
    let status = match parse::opt_text(raw, booking::STATUS) {
        Some(vendor) => AppointmentStatus::from_vendor(&vendor),
        None if success => default_status,
        None => AppointmentStatus::Failed,
    };
    let message = parse::opt_text(raw, booking::MESSAGE).unwrap_or_else(|| {
        if success {
            "OK".to_string()
        } else {
            "Rejected by provider".to_string()
        }
    });

    BookingResponse {
        success,
        provider_booking_id: parse::opt_text(raw, booking::ID)
            .or_else(|| fallback_id.map(str::to_string)),
        status,
        message,
        appointment_date: parse::date(raw, booking::DATE),
        slot_time: parse::time(raw, booking::TIME),
        consultation_link: parse::opt_text(raw, booking::LINK),
        extra_data: parse::record(raw)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
    }
}

fn mode_code(mode: ConsultationMode) -> &'static str {
    match mode {
        ConsultationMode::Online => "ONLINE",
        ConsultationMode::InClinic => "IN_CLINIC",
        ConsultationMode::Phone => "PHONE",
    }
}

fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

#[async_trait]
impl ProviderAdapter for ApolloConsultationProvider {
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
impl ConsultationProvider for ApolloConsultationProvider {
    async fn search_doctors(
        &self,
        filters: &DoctorSearchFilters,
        pagination: Pagination,
    ) -> ProviderResult<Vec<ProviderDoctor>> {
        let mut query: Vec<(&str, String)> = vec![
            ("page", pagination.page.to_string()),
            ("pageSize", pagination.page_size.to_string()),
        ];
        if let Some(specialization) = &filters.specialization {
            query.push(("specialization", specialization.clone()));
        }
        if let Some(city) = &filters.city {
            query.push(("city", city.clone()));
        }
        if let Some(name) = &filters.name {
            query.push(("name", name.clone()));
        }
        if let Some(mode) = filters.mode {
            query.push(("consultationMode", mode_code(mode).to_string()));
        }

        let body = self.client.get("/doctors", &query).await?;
        let doctors: Vec<ProviderDoctor> = parse::list(&body, &["doctors"])
            .iter()
            .map(|raw| parse_doctor(self.client.provider(), raw))
            .collect();

        tracing::debug!(provider = %self.client.provider(), results = doctors.len(), "Doctor search complete");
        Ok(doctors)
    }

    async fn get_doctor_details(&self, doctor_id: &str) -> ProviderResult<ProviderDoctor> {
        let path = format!("/doctors/{}", segment(doctor_id));
        let raw = self.client.get_record(&path, "Doctor").await?;
        Ok(parse_doctor(self.client.provider(), &raw))
    }

    async fn get_specializations(&self) -> ProviderResult<Vec<String>> {
        self.client
            .cached_catalog("specializations", "/specializations", &["specializations"])
            .await
    }

    async fn get_cities(&self) -> ProviderResult<Vec<String>> {
        self.client.cached_catalog("cities", "/cities", &["cities"]).await
    }

    async fn get_doctor_availability(
        &self,
        doctor_id: &str,
        date: NaiveDate,
    ) -> ProviderResult<DoctorAvailability> {
        let path = format!("/doctors/{}/availability", segment(doctor_id));
        let query = [("date", date.format("%Y-%m-%d").to_string())];
        let body = self.client.get(&path, &query).await?;

        let mut slots = Vec::new();
        for raw in parse::list(&body, slot::LIST) {
            match parse_slot(raw) {
                Some(parsed) => slots.push(parsed),
                None => tracing::warn!(
                    provider = %self.client.provider(),
                    doctor_id,
                    %date,
                    slot = %raw,
                    "Dropping slot with unparseable start time"
                ),
            }
        }
        slots.sort_by_key(|s| s.start_time);

        Ok(DoctorAvailability::new(doctor_id, date, slots))
    }

    async fn book_appointment(&self, request: &BookingRequest) -> ProviderResult<BookingResponse> {
        let availability = self
            .get_doctor_availability(&request.provider_doctor_id, request.appointment_date)
            .await?;

        if let Some(taken) = availability
            .find_slot(request.slot_id.as_deref(), request.slot_time)
            .filter(|s| !s.is_available())
        {
            return Err(ProviderError::slot_not_available(
                self.client.provider(),
                format!(
                    "Slot {} on {} is fully booked",
                    format_time(taken.start_time),
                    request.appointment_date
                ),
            )
            .with_details(json!({
                "slot_id": taken.slot_id,
                "capacity": taken.capacity,
                "booked_count": taken.booked_count,
            })));
        }

        let body = json!({
            "doctorId": request.provider_doctor_id,
            "appointmentDate": request.appointment_date.format("%Y-%m-%d").to_string(),
            "slotTime": format_time(request.slot_time),
            "slotId": request.slot_id,
            "consultationMode": mode_code(request.mode),
            "patient": patient_json(&request.patient),
            "reason": request.reason,
            "referenceId": request.client_reference_id,
        });

        let response = self
            .client
            .post("/appointments", &body)
            .await
            .map_err(classify_booking_error)?;

        let mut parsed = parse_booking_response(&response, None, AppointmentStatus::Confirmed);
        parsed.appointment_date = parsed.appointment_date.or(Some(request.appointment_date));
        parsed.slot_time = parsed.slot_time.or(Some(request.slot_time));

        tracing::info!(
            provider = %self.client.provider(),
            success = parsed.success,
            booking_id = ?parsed.provider_booking_id,
            "Appointment booking submitted"
        );

        Ok(parsed)
    }

    async fn cancel_appointment(
        &self,
        request: &CancellationRequest,
    ) -> ProviderResult<BookingResponse> {
        let path = format!("/appointments/{}/cancel", segment(&request.provider_booking_id));
        let body = json!({ "reason": request.reason });

        let response = self
            .client
            .post(&path, &body)
            .await
            .map_err(|e| classify_lifecycle_error(e, |p, m| ProviderError::cancellation_failed(p, m)))?;

        Ok(parse_booking_response(
            &response,
            Some(&request.provider_booking_id),
            AppointmentStatus::Cancelled,
        ))
    }

    async fn reschedule_appointment(
        &self,
        request: &RescheduleRequest,
    ) -> ProviderResult<BookingResponse> {
        let path = format!("/appointments/{}/reschedule", segment(&request.provider_booking_id));
        let body = json!({
            "newDate": request.new_date.format("%Y-%m-%d").to_string(),
            "newSlotTime": format_time(request.new_slot_time),
            "newSlotId": request.new_slot_id,
            "reason": request.reason,
        });

        let response = self
            .client
            .put(&path, &body)
            .await
            .map_err(|e| classify_lifecycle_error(e, |p, m| ProviderError::reschedule_failed(p, m)))?;

        let mut parsed = parse_booking_response(
            &response,
            Some(&request.provider_booking_id),
            AppointmentStatus::Rescheduled,
        );
        parsed.appointment_date = parsed.appointment_date.or(Some(request.new_date));
        parsed.slot_time = parsed.slot_time.or(Some(request.new_slot_time));
        Ok(parsed)
    }

    async fn get_appointment_status(&self, booking_id: &str) -> ProviderResult<BookingResponse> {
        let path = format!("/appointments/{}", segment(booking_id));
        let raw = self.client.get_record(&path, "Appointment").await?;
        Ok(parse_booking_response(&raw, Some(booking_id), AppointmentStatus::Pending))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_doctor_payload() {
        let raw = json!({"doctorId": 7, "doctorName": "Dr. A", "consultationFee": "500"});
        let doctor = parse_doctor("apollo", &raw);

        assert_eq!(doctor.provider_doctor_id, "7");
        assert_eq!(doctor.provider_name, "apollo");
        assert_eq!(doctor.name, "Dr. A");
        assert_eq!(doctor.consultation_fee, 500.0);
        assert!(doctor.available_modes.is_empty());
        assert_eq!(doctor.extra_data.get("doctorId"), Some(&json!(7)));
        assert_eq!(doctor.specialization, "");
        assert_eq!(doctor.experience_years, 0);
        assert!(doctor.languages.is_empty());
        assert!(doctor.profile_image_url.is_none());
    }

    #[test]
    fn test_empty_doctor_payload_yields_defaults() {
        let doctor = parse_doctor("apollo", &json!({}));
        assert_eq!(doctor.provider_doctor_id, "");
        assert_eq!(doctor.consultation_fee, 0.0);
        assert!(doctor.extra_data.is_empty());
    }

    #[test]
    fn test_doctor_modes_are_mapped_and_deduplicated() {
        let raw = json!({"consultationModes": ["VIDEO", "online", "IN_CLINIC", "telepathy"]});
        let doctor = parse_doctor("apollo", &raw);
        assert_eq!(
            doctor.available_modes,
            vec![ConsultationMode::Online, ConsultationMode::InClinic]
        );
    }

    #[test]
    fn test_slot_end_time_is_synthesised() {
        let slot = parse_slot(&json!({"slotId": "s1", "startTime": "10:00"})).unwrap();
        assert_eq!(slot.end_time, NaiveTime::from_hms_opt(10, 15, 0).unwrap());
        assert_eq!(slot.capacity, 1);
        assert!(slot.is_available());
    }

    #[test]
    fn test_slot_without_start_is_dropped() {
        assert!(parse_slot(&json!({"slotId": "s1", "startTime": "later"})).is_none());
        assert!(parse_slot(&json!({"slotId": "s1"})).is_none());
    }

    #[test]
    fn test_slot_availability_flag_fills_booked_count() {
        let slot = parse_slot(&json!({"startTime": "11:30", "isAvailable": false})).unwrap();
        assert!(!slot.is_available());
        assert_eq!(slot.slot_id, "11:30");
    }

    #[test]
    fn test_booking_response_success_false_is_not_an_error() {
        let raw = json!({"success": false, "message": "Doctor on leave"});
        let response = parse_booking_response(&raw, None, AppointmentStatus::Confirmed);
        assert!(!response.success);
        assert_eq!(response.status, AppointmentStatus::Failed);
        assert_eq!(response.message, "Doctor on leave");
    }

    #[test]
    fn test_booking_response_reads_envelope() {
        let raw = json!({"success": true, "data": {"appointmentId": "AP-1", "status": "BOOKED"}});
        let response = parse_booking_response(&raw, None, AppointmentStatus::Confirmed);
        assert!(response.success);
        assert_eq!(response.provider_booking_id.as_deref(), Some("AP-1"));
        assert_eq!(response.extra_data.get("appointmentId"), Some(&json!("AP-1")));
    }

    #[test]
    fn test_unknown_vendor_status_is_pending() {
        let raw = json!({"status": "WAITING_ON_MOON"});
        let response = parse_booking_response(&raw, Some("AP-9"), AppointmentStatus::Pending);
        assert_eq!(response.status, AppointmentStatus::Pending);
        assert_eq!(response.provider_booking_id.as_deref(), Some("AP-9"));
    }
}
