//! Consultation capability

use super::ProviderAdapter;
use crate::domain::{
    BookingRequest, BookingResponse, CancellationRequest, DoctorAvailability,
    DoctorSearchFilters, Pagination, ProviderDoctor, ProviderResult, RescheduleRequest,
};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Doctor search, availability and appointment lifecycle
///
/// # Example
///
/// ```no_run
/// use carelink::adapters::ConsultationProvider;
/// use carelink::domain::{DoctorSearchFilters, Pagination};
///
/// # async fn example(provider: &dyn ConsultationProvider) -> carelink::domain::ProviderResult<()> {
/// let filters = DoctorSearchFilters::default().specialization("Cardiology").city("Chennai");
/// for doctor in provider.search_doctors(&filters, Pagination::default()).await? {
///     println!("{} ({})", doctor.name, doctor.hospital_name);
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait ConsultationProvider: ProviderAdapter {
    /// Searches doctors; an empty result is not an error
    async fn search_doctors(
        &self,
        filters: &DoctorSearchFilters,
        pagination: Pagination,
    ) -> ProviderResult<Vec<ProviderDoctor>>;

    /// Fetches one doctor by provider ID
    async fn get_doctor_details(&self, doctor_id: &str) -> ProviderResult<ProviderDoctor>;

    /// Specializations offered by the provider
    async fn get_specializations(&self) -> ProviderResult<Vec<String>>;

    /// Cities the provider operates in
    async fn get_cities(&self) -> ProviderResult<Vec<String>>;

    /// Slots for one doctor on one date
    async fn get_doctor_availability(
        &self,
        doctor_id: &str,
        date: NaiveDate,
    ) -> ProviderResult<DoctorAvailability>;

    /// Availability for every date in `[start, end]`, ascending
    ///
    /// Dates with no slots are omitted. `start > end` yields an empty vector.
    /// The first failing date aborts the walk.
    async fn get_doctor_availability_range(
        &self,
        doctor_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ProviderResult<Vec<DoctorAvailability>> {
        let mut days = Vec::new();
        let mut date = start;

        while date <= end {
            let availability = self.get_doctor_availability(doctor_id, date).await?;
            if !availability.slots.is_empty() {
                days.push(availability);
            }

            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }

        Ok(days)
    }

    /// Books an appointment
    ///
    /// # Errors
    ///
    /// [`ProviderError::SlotNotAvailable`](crate::domain::ProviderError::SlotNotAvailable)
    /// when the slot has been taken, [`ProviderError::BookingFailed`](crate::domain::ProviderError::BookingFailed)
    /// for any other rejection.
    async fn book_appointment(&self, request: &BookingRequest) -> ProviderResult<BookingResponse>;

    async fn cancel_appointment(
        &self,
        request: &CancellationRequest,
    ) -> ProviderResult<BookingResponse>;

    async fn reschedule_appointment(
        &self,
        request: &RescheduleRequest,
    ) -> ProviderResult<BookingResponse>;

    /// Current state of an appointment, keyed by the provider's booking ID
    async fn get_appointment_status(&self, booking_id: &str) -> ProviderResult<BookingResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CapabilityFlags, ProviderError, ProviderInfo, TimeSlot};
    use chrono::NaiveTime;
    use std::sync::Mutex;

    /// Returns slots only on even days of the month
    struct EvenDays {
        requested: Mutex<Vec<NaiveDate>>,
    }

    #[async_trait]
    impl ProviderAdapter for EvenDays {
        async fn authenticate(&self) -> ProviderResult<bool> {
            Ok(true)
        }

        fn is_authenticated(&self) -> bool {
            true
        }

        fn provider_info(&self) -> ProviderInfo {
            ProviderInfo {
                name: "even".to_string(),
                display_name: "Even".to_string(),
                capabilities: CapabilityFlags::default(),
                api_version: "1".to_string(),
            }
        }

        async fn health_check(&self) -> bool {
            true
        }
    }

    #[async_trait]
    impl ConsultationProvider for EvenDays {
        async fn search_doctors(
            &self,
            _filters: &DoctorSearchFilters,
            _pagination: Pagination,
        ) -> ProviderResult<Vec<ProviderDoctor>> {
            Ok(Vec::new())
        }

        async fn get_doctor_details(&self, doctor_id: &str) -> ProviderResult<ProviderDoctor> {
            Err(ProviderError::api("even", doctor_id, Some(404), None))
        }

        async fn get_specializations(&self) -> ProviderResult<Vec<String>> {
            Ok(Vec::new())
        }

        async fn get_cities(&self) -> ProviderResult<Vec<String>> {
            Ok(Vec::new())
        }

        async fn get_doctor_availability(
            &self,
            doctor_id: &str,
            date: NaiveDate,
        ) -> ProviderResult<DoctorAvailability> {
            use chrono::Datelike;
            self.requested.lock().unwrap().push(date);
            let slots = if date.day() % 2 == 0 {
                let start = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
                let end = NaiveTime::from_hms_opt(9, 15, 0).unwrap();
                vec![TimeSlot::new("s", start, end, 1, 0)]
            } else {
                Vec::new()
            };
            Ok(DoctorAvailability::new(doctor_id, date, slots))
        }

        async fn book_appointment(&self, _: &BookingRequest) -> ProviderResult<BookingResponse> {
            unimplemented!()
        }

        async fn cancel_appointment(
            &self,
            _: &CancellationRequest,
        ) -> ProviderResult<BookingResponse> {
            unimplemented!()
        }

        async fn reschedule_appointment(
            &self,
            _: &RescheduleRequest,
        ) -> ProviderResult<BookingResponse> {
            unimplemented!()
        }

        async fn get_appointment_status(&self, _: &str) -> ProviderResult<BookingResponse> {
            unimplemented!()
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    #[tokio::test]
    async fn test_range_omits_empty_days_in_ascending_order() {
        let provider = EvenDays {
            requested: Mutex::new(Vec::new()),
        };

        let days = provider
            .get_doctor_availability_range("7", date(1), date(6))
            .await
            .unwrap();

        let dates: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date(2), date(4), date(6)]);
        assert_eq!(provider.requested.lock().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_range_with_start_after_end_is_empty() {
        let provider = EvenDays {
            requested: Mutex::new(Vec::new()),
        };

        let days = provider
            .get_doctor_availability_range("7", date(6), date(1))
            .await
            .unwrap();

        assert!(days.is_empty());
        assert!(provider.requested.lock().unwrap().is_empty());
    }
}
