//! Defensive readers for Apollo JSON payloads
//!
//! Apollo is inconsistent about field names across endpoint versions, so every
//! domain attribute is read from an ordered list of candidate keys. The first
//! candidate holding a non-null value wins; when none does the reader returns
//! a typed default. Dotted candidates (`"doctor.name"`) walk nested objects.
//!
//! The candidate lists below are the single source of truth for how each
//! Apollo payload maps onto the domain model.

use crate::domain::ExtraData;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

/// Envelope keys that may wrap a list or a single record
pub const ENVELOPE_KEYS: &[&str] = &["data", "results", "items"];

pub mod doctor {
    pub const ID: &[&str] = &["doctorId", "doctor_id", "id"];
    pub const NAME: &[&str] = &["doctorName", "doctor_name", "name", "fullName"];
    pub const SPECIALIZATION: &[&str] = &[
        "specialization",
        "speciality",
        "specialty",
        "specializationName",
        "department",
    ];
    pub const QUALIFICATION: &[&str] = &["qualification", "qualifications", "degree"];
    pub const EXPERIENCE: &[&str] = &["experience", "experienceYears", "experience_years", "yearsOfExperience"];
    pub const FEE: &[&str] = &["consultationFee", "consultation_fee", "fee", "fees"];
    pub const HOSPITAL: &[&str] = &["hospitalName", "hospital_name", "hospital", "hospital.name", "clinicName"];
    pub const CITY: &[&str] = &["city", "cityName", "hospital.city", "location.city"];
    pub const MODES: &[&str] = &["consultationModes", "consultation_modes", "modes", "consultationTypes"];
    pub const LANGUAGES: &[&str] = &["languages", "languagesKnown", "language"];
    pub const IMAGE: &[&str] = &["profileImage", "profile_image_url", "imageUrl", "photo"];
    /// Raw vendor fields preserved in `extra_data`
    pub const EXTRA: &[&str] = &[
        "doctorId",
        "doctor_id",
        "id",
        "rating",
        "registrationNumber",
        "about",
        "slotDuration",
        "hospitalId",
    ];
}

pub mod slot {
    pub const LIST: &[&str] = &["slots", "data.slots", "availableSlots", "timeSlots"];
    pub const ID: &[&str] = &["slotId", "slot_id", "id"];
    pub const START: &[&str] = &["startTime", "start_time", "slotTime", "time", "start"];
    pub const END: &[&str] = &["endTime", "end_time", "end"];
    pub const CAPACITY: &[&str] = &["capacity", "maxBookings", "totalSlots"];
    pub const BOOKED: &[&str] = &["bookedCount", "booked_count", "booked", "bookings"];
    pub const AVAILABLE: &[&str] = &["isAvailable", "is_available", "available"];
}

pub mod booking {
    pub const ID: &[&str] = &[
        "appointmentId",
        "appointment_id",
        "bookingId",
        "booking_id",
        "orderId",
        "order_id",
        "id",
        "data.appointmentId",
        "data.bookingId",
        "data.orderId",
        "data.id",
    ];
    pub const STATUS: &[&str] = &["status", "appointmentStatus", "bookingStatus", "orderStatus", "data.status"];
    pub const MESSAGE: &[&str] = &["message", "msg", "statusMessage", "data.message"];
    pub const SUCCESS: &[&str] = &["success", "isSuccess", "data.success"];
    pub const DATE: &[&str] = &["appointmentDate", "appointment_date", "date", "collectionDate", "data.appointmentDate"];
    pub const TIME: &[&str] = &["slotTime", "slot_time", "appointmentTime", "time", "data.slotTime"];
    pub const LINK: &[&str] = &["consultationLink", "videoLink", "meetingUrl", "joinUrl", "data.consultationLink"];
    pub const AMOUNT: &[&str] = &["totalAmount", "total_amount", "amount", "orderTotal", "data.totalAmount"];
    pub const ERROR_CODE: &[&str] = &["errorCode", "error_code", "code", "error.code"];
    pub const ERROR_MESSAGE: &[&str] = &["message", "error", "errorMessage", "error.message", "detail"];
}

pub mod lab_test {
    pub const ID: &[&str] = &["testId", "test_id", "id", "code"];
    pub const NAME: &[&str] = &["testName", "test_name", "name"];
    pub const DESCRIPTION: &[&str] = &["description", "details", "about"];
    pub const CATEGORY: &[&str] = &["category", "categoryName", "department"];
    pub const PRICE: &[&str] = &["price", "mrp", "amount"];
    pub const DISCOUNTED_PRICE: &[&str] = &["discountedPrice", "discounted_price", "offerPrice", "sellingPrice"];
    pub const SAMPLE: &[&str] = &["sampleType", "sample_type", "specimen"];
    pub const PREPARATION: &[&str] = &["preparation", "preparationInstructions", "instructions"];
    pub const TURNAROUND: &[&str] = &["turnaroundHours", "turnaround_hours", "tatHours", "reportTat"];
    pub const HOME_COLLECTION: &[&str] = &["homeCollection", "home_collection", "homeCollectionAvailable"];
    pub const EXTRA: &[&str] = &["testId", "test_id", "id", "code", "fastingRequired", "methodology"];
}

pub mod package {
    pub const ID: &[&str] = &["packageId", "package_id", "id", "code"];
    pub const NAME: &[&str] = &["packageName", "package_name", "name"];
    pub const TESTS: &[&str] = &["tests", "includedTests", "testList"];
    pub const TEST_COUNT: &[&str] = &["testCount", "test_count", "parameterCount", "totalTests"];
    pub const EXTRA: &[&str] = &["packageId", "package_id", "id", "code", "idealFor", "gender"];
}

pub mod center {
    pub const LIST: &[&str] = &["centers", "labs", "collectionCenters"];
    pub const ID: &[&str] = &["centerId", "center_id", "labId", "id"];
    pub const NAME: &[&str] = &["centerName", "center_name", "labName", "name"];
    pub const ADDRESS: &[&str] = &["address", "fullAddress", "address.line1"];
    pub const CITY: &[&str] = &["city", "cityName", "address.city"];
    pub const PINCODE: &[&str] = &["pincode", "pinCode", "zipcode", "address.pincode"];
    pub const PHONE: &[&str] = &["phone", "phoneNumber", "contactNumber"];
    pub const LATITUDE: &[&str] = &["latitude", "lat", "location.lat"];
    pub const LONGITUDE: &[&str] = &["longitude", "lng", "lon", "location.lng"];
    pub const HOME_COLLECTION: &[&str] = &["homeCollection", "home_collection", "homeCollectionAvailable"];
    pub const EXTRA: &[&str] = &["centerId", "center_id", "labId", "id", "timings", "nablAccredited"];
}

pub mod report {
    pub const READY: &[&str] = &["isReady", "is_ready", "reportReady", "ready"];
    pub const URL: &[&str] = &["reportUrl", "report_url", "url", "downloadUrl", "data.reportUrl"];
    pub const GENERATED_AT: &[&str] = &["generatedAt", "generated_at", "reportDate", "createdAt"];
}

pub mod medicine {
    pub const LIST: &[&str] = &["medicines", "products"];
    pub const ID: &[&str] = &["medicineId", "medicine_id", "productId", "sku", "id"];
    pub const NAME: &[&str] = &["medicineName", "medicine_name", "productName", "name"];
    pub const GENERIC: &[&str] = &["genericName", "generic_name", "generic"];
    pub const MANUFACTURER: &[&str] = &["manufacturer", "manufacturerName", "brand", "company"];
    pub const COMPOSITION: &[&str] = &["composition", "saltComposition", "salt"];
    pub const PACK_SIZE: &[&str] = &["packSize", "pack_size", "packaging", "packLabel"];
    pub const DOSAGE_FORM: &[&str] = &["dosageForm", "dosage_form", "form", "type"];
    pub const MRP: &[&str] = &["mrp", "price", "maxRetailPrice"];
    pub const SELLING_PRICE: &[&str] = &["sellingPrice", "selling_price", "specialPrice", "discountedPrice"];
    pub const PRESCRIPTION: &[&str] = &["requiresPrescription", "requires_prescription", "prescriptionRequired", "isRx"];
    pub const IN_STOCK: &[&str] = &["inStock", "in_stock", "isAvailable", "available"];
    pub const EXTRA: &[&str] = &["medicineId", "medicine_id", "productId", "sku", "id", "schedule", "storage"];
}

pub mod store {
    pub const LIST: &[&str] = &["stores", "pharmacies"];
    pub const ID: &[&str] = &["storeId", "store_id", "siteId", "id"];
    pub const NAME: &[&str] = &["storeName", "store_name", "name"];
    pub const ADDRESS: &[&str] = &["address", "fullAddress", "address.line1"];
    pub const CITY: &[&str] = &["city", "cityName", "address.city"];
    pub const PINCODE: &[&str] = &["pincode", "pinCode", "zipcode", "address.pincode"];
    pub const PHONE: &[&str] = &["phone", "phoneNumber", "contactNumber"];
    pub const IS_OPEN: &[&str] = &["isOpen", "is_open", "open"];
    pub const DELIVERY: &[&str] = &["deliveryAvailable", "delivery_available", "homeDelivery"];
    pub const EXTRA: &[&str] = &["storeId", "store_id", "siteId", "id", "timings", "distanceKm"];
}

pub mod order {
    pub const ESTIMATED_DELIVERY: &[&str] = &["estimatedDelivery", "estimated_delivery", "deliveryEta", "data.estimatedDelivery"];
    pub const TRACKING_URL: &[&str] = &["trackingUrl", "tracking_url", "trackUrl", "data.trackingUrl"];
}

/// Catalog entries may be plain strings or objects carrying a name
pub const CATALOG_NAME: &[&str] = &["name", "specializationName", "cityName", "title", "value"];

/// Token candidates in the login response
pub const TOKEN: &[&str] = &["token", "access_token", "accessToken", "data.token", "data.accessToken"];

/// Resolves a dotted path inside `value`, ignoring nulls
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    (!current.is_null()).then_some(current)
}

/// First candidate present in `value`
pub fn first<'a>(value: &'a Value, candidates: &[&str]) -> Option<&'a Value> {
    candidates.iter().find_map(|path| lookup(value, path))
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// String field, empty when absent
pub fn text(value: &Value, candidates: &[&str]) -> String {
    opt_text(value, candidates).unwrap_or_default()
}

/// String field, `None` when absent or blank
pub fn opt_text(value: &Value, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|path| lookup(value, path))
        .filter_map(as_text)
        .find(|s| !s.is_empty())
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

/// Numeric field accepting numbers or numeric strings, zero when absent
pub fn number(value: &Value, candidates: &[&str]) -> f64 {
    opt_number(value, candidates).unwrap_or(0.0)
}

pub fn opt_number(value: &Value, candidates: &[&str]) -> Option<f64> {
    candidates
        .iter()
        .filter_map(|path| lookup(value, path))
        .find_map(as_number)
        .filter(|n| n.is_finite())
}

/// Non-negative integer field; negatives and garbage read as zero
pub fn count(value: &Value, candidates: &[&str]) -> u32 {
    opt_count(value, candidates).unwrap_or(0)
}

pub fn opt_count(value: &Value, candidates: &[&str]) -> Option<u32> {
    opt_number(value, candidates).map(|n| {
        if n <= 0.0 {
            0
        } else if n >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            n as u32
        }
    })
}

fn as_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "y" | "1" | "available" | "open" => Some(true),
            "false" | "no" | "n" | "0" | "unavailable" | "closed" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Boolean field accepting booleans, 0/1 and yes/no strings
pub fn flag(value: &Value, candidates: &[&str], default: bool) -> bool {
    opt_flag(value, candidates).unwrap_or(default)
}

pub fn opt_flag(value: &Value, candidates: &[&str]) -> Option<bool> {
    candidates
        .iter()
        .filter_map(|path| lookup(value, path))
        .find_map(as_flag)
}

/// List of strings from an array (of strings or named objects) or a
/// comma-separated string
pub fn text_list(value: &Value, candidates: &[&str]) -> Vec<String> {
    match first(value, candidates) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(_) => opt_text(item, CATALOG_NAME),
                other => as_text(other),
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%Y/%m/%d"];
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M", "%I:%M %p", "%I:%M%p", "%I:%M:%S %p"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parses a vendor date, accepting full timestamps too
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| parse_datetime(raw).map(|dt| dt.date()))
}

/// Parses a vendor time of day, accepting full timestamps too
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(&raw.to_uppercase(), fmt).ok())
        .or_else(|| parse_datetime(raw).map(|dt| dt.time()))
}

pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .ok()
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        })
}

pub fn date(value: &Value, candidates: &[&str]) -> Option<NaiveDate> {
    opt_text(value, candidates).and_then(|raw| parse_date(&raw))
}

pub fn time(value: &Value, candidates: &[&str]) -> Option<NaiveTime> {
    opt_text(value, candidates).and_then(|raw| parse_time(&raw))
}

pub fn datetime(value: &Value, candidates: &[&str]) -> Option<NaiveDateTime> {
    opt_text(value, candidates).and_then(|raw| parse_datetime(&raw))
}

/// Copies the listed raw vendor fields into an extension bag
pub fn extra(value: &Value, keys: &[&str]) -> ExtraData {
    let mut bag = ExtraData::new();
    for key in keys {
        if let Some(raw) = lookup(value, key) {
            bag.insert((*key).to_string(), raw.clone());
        }
    }
    bag
}

/// Items of a list response
///
/// Accepts a top-level array, an array under one of [`ENVELOPE_KEYS`], or an
/// array under one of the resource-specific `keys` (at the top level or
/// inside `data`).
pub fn list<'a>(body: &'a Value, keys: &[&str]) -> &'a [Value] {
    if let Value::Array(items) = body {
        return items;
    }

    let nested = keys
        .iter()
        .flat_map(|key| [lookup(body, key), lookup(body, &format!("data.{key}"))]);

    ENVELOPE_KEYS
        .iter()
        .map(|key| lookup(body, key))
        .chain(nested)
        .flatten()
        .find_map(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Single record of a detail response, unwrapping a `data` envelope
///
/// Returns `None` for an empty body (null, `{}`, `[]` or a blank string),
/// which Apollo uses to signal a missing ID.
pub fn record(body: &Value) -> Option<&Value> {
    let candidate = match body.get("data") {
        Some(Value::Null) => return None,
        Some(inner @ Value::Object(_)) => inner,
        Some(Value::Array(items)) if items.len() <= 1 => items.first()?,
        _ => body,
    };

    let empty = match candidate {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    };

    (!empty).then_some(candidate)
}
