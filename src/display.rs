//! Formatting helpers shared by the overview and report views.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use crate::models::{Appointment, DoctorReportRow, StatusAction};

pub const UNKNOWN_ADDRESS: &str = "Unknown Address";

/// `5551234567` → `(555) 123-4567`. Non-digits are ignored; anything that is
/// not exactly ten digits comes back unchanged.
pub fn format_phone_number(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 10 {
        return raw.to_string();
    }
    format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..])
}

/// Whole years between `dob` and `today`.
pub fn calculate_age(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// Street, city, state, zip joined with ", ", skipping blanks.
pub fn format_address(row: &DoctorReportRow) -> Option<String> {
    let parts: Vec<&str> = [&row.addr_street, &row.addr_city, &row.addr_state, &row.addr_zip]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// The key the patient filter matches on.
pub fn patient_name(first: &str, last: &str) -> String {
    format!("{first} {last}")
}

/// `Nov 20, 2024, 3:00 PM`
pub fn format_date_time(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y, %-I:%M %p").to_string()
}

pub fn or_na(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "N/A",
    }
}

/// Everything the appointment details panel shows, already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetails {
    pub appointment_id: i64,
    pub patient: String,
    pub age: Option<i32>,
    pub email: String,
    pub phone: String,
    pub date_time: String,
    pub status: String,
    pub reason: String,
    pub visit_type: String,
    pub service: String,
    pub actions: Vec<StatusAction>,
}

impl AppointmentDetails {
    pub fn new(appointment: &Appointment, today: NaiveDate) -> Self {
        let patient = &appointment.patient;
        Self {
            appointment_id: appointment.id,
            patient: patient.full_name(),
            age: patient.birth_date().map(|dob| calculate_age(dob, today)),
            email: or_na(patient.email.as_deref()).to_string(),
            phone: patient
                .phone_number
                .as_deref()
                .map(format_phone_number)
                .unwrap_or_else(|| "N/A".to_string()),
            date_time: appointment
                .scheduled_at
                .map(format_date_time)
                .unwrap_or_else(|| "N/A".to_string()),
            status: appointment.status.to_string(),
            reason: or_na(appointment.reason.as_deref()).to_string(),
            visit_type: or_na(appointment.visit_type.as_deref()).to_string(),
            service: or_na(appointment.service_name.as_deref()).to_string(),
            actions: appointment.status.available_actions(),
        }
    }
}
