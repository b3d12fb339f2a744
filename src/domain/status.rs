//! Status enumerations shared by all providers
//!
//! Each enum is a closed set. Adapters map vendor status strings through
//! `from_vendor`, which normalises case and separators and falls back to
//! `Pending` for anything it does not recognise, so raw vendor strings never
//! leak out as a status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowercases and strips separators so `"No-Show"`, `"NO_SHOW"` and
/// `"no show"` compare equal.
fn normalise(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Consultation appointment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    Rescheduled,
    NoShow,
    Failed,
}

impl AppointmentStatus {
    /// Maps a vendor status string onto the closed set
    pub fn from_vendor(raw: &str) -> Self {
        match normalise(raw).as_str() {
            "confirmed" | "booked" | "scheduled" | "success" | "active" => Self::Confirmed,
            "cancelled" | "canceled" | "cancelledbypatient" | "cancelledbydoctor" => {
                Self::Cancelled
            }
            "completed" | "done" | "consulted" | "closed" => Self::Completed,
            "rescheduled" => Self::Rescheduled,
            "noshow" | "missed" => Self::NoShow,
            "failed" | "rejected" | "declined" => Self::Failed,
            _ => Self::Pending,
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
            Self::Rescheduled => "rescheduled",
            Self::NoShow => "no_show",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Diagnostics booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    SampleCollected,
    Processing,
    ReportReady,
    Completed,
    Cancelled,
    Failed,
}

impl BookingStatus {
    /// Maps a vendor status string onto the closed set
    pub fn from_vendor(raw: &str) -> Self {
        match normalise(raw).as_str() {
            "confirmed" | "booked" | "scheduled" | "assigned" => Self::Confirmed,
            "samplecollected" | "collected" | "samplepicked" => Self::SampleCollected,
            "processing" | "inprogress" | "samplereceived" | "underprocess" => Self::Processing,
            "reportready" | "reportgenerated" | "reportavailable" => Self::ReportReady,
            "completed" | "done" | "delivered" => Self::Completed,
            "cancelled" | "canceled" => Self::Cancelled,
            "failed" | "rejected" => Self::Failed,
            _ => Self::Pending,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::SampleCollected => "sample_collected",
            Self::Processing => "processing",
            Self::ReportReady => "report_ready",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Pharmacy order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Dispatched,
    Delivered,
    Cancelled,
    Returned,
    Failed,
}

impl OrderStatus {
    /// Maps a vendor status string onto the closed set
    pub fn from_vendor(raw: &str) -> Self {
        match normalise(raw).as_str() {
            "confirmed" | "accepted" | "placed" => Self::Confirmed,
            "processing" | "packed" | "packing" | "billed" => Self::Processing,
            "dispatched" | "shipped" | "outfordelivery" | "intransit" => Self::Dispatched,
            "delivered" | "completed" => Self::Delivered,
            "cancelled" | "canceled" => Self::Cancelled,
            "returned" | "rto" => Self::Returned,
            "failed" | "rejected" => Self::Failed,
            _ => Self::Pending,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Dispatched => "dispatched",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Returned => "returned",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appointment_status_mapping() {
        assert_eq!(AppointmentStatus::from_vendor("CONFIRMED"), AppointmentStatus::Confirmed);
        assert_eq!(AppointmentStatus::from_vendor("Canceled"), AppointmentStatus::Cancelled);
        assert_eq!(AppointmentStatus::from_vendor("NO_SHOW"), AppointmentStatus::NoShow);
        assert_eq!(AppointmentStatus::from_vendor("no-show"), AppointmentStatus::NoShow);
    }

    #[test]
    fn test_unknown_status_defaults_to_pending() {
        assert_eq!(AppointmentStatus::from_vendor("WAITLISTED"), AppointmentStatus::Pending);
        assert_eq!(BookingStatus::from_vendor(""), BookingStatus::Pending);
        assert_eq!(OrderStatus::from_vendor("???"), OrderStatus::Pending);
    }

    #[test]
    fn test_booking_status_mapping() {
        assert_eq!(BookingStatus::from_vendor("sample_collected"), BookingStatus::SampleCollected);
        assert_eq!(BookingStatus::from_vendor("Report Ready"), BookingStatus::ReportReady);
    }

    #[test]
    fn test_order_status_mapping() {
        assert_eq!(OrderStatus::from_vendor("OUT_FOR_DELIVERY"), OrderStatus::Dispatched);
        assert_eq!(OrderStatus::from_vendor("delivered"), OrderStatus::Delivered);
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&AppointmentStatus::NoShow).unwrap();
        assert_eq!(json, "\"no_show\"");
        assert_eq!(AppointmentStatus::NoShow.to_string(), "no_show");
    }
}
