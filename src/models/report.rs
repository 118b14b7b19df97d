use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::enums::AppointmentStatus;
use super::timestamp::{
    deserialize_null_as_empty, deserialize_optional_datetime,
    deserialize_optional_string_or_number,
};

/// Appointment as embedded in a doctor report row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportAppointment {
    #[serde(rename = "appointmentID")]
    pub id: i64,
    #[serde(
        rename = "appointmentDateTime",
        default,
        deserialize_with = "deserialize_optional_datetime"
    )]
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(rename = "patientFirstName", default)]
    pub patient_first_name: String,
    #[serde(rename = "patientLastName", default)]
    pub patient_last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    #[serde(rename = "prescriptionID", default)]
    pub id: Option<i64>,
    #[serde(
        rename = "dateIssued",
        alias = "prescriptionDateIssued",
        default,
        deserialize_with = "deserialize_optional_datetime"
    )]
    pub issued_at: Option<DateTime<Utc>>,
    #[serde(rename = "medicationName", alias = "medicineName", default)]
    pub medication: String,
    /// Milligrams; the column is numeric but older rows carry text.
    #[serde(default, deserialize_with = "deserialize_optional_string_or_number")]
    pub dosage: Option<String>,
    #[serde(rename = "patientFirstName", default)]
    pub patient_first_name: String,
    #[serde(rename = "patientLastName", default)]
    pub patient_last_name: String,
}

/// One doctor's slice of the admin doctor report.
///
/// `appointments` and `prescriptions` are never absent: a missing or `null`
/// collection decodes as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorReportRow {
    #[serde(rename = "doctorID")]
    pub doctor_id: i64,
    #[serde(rename = "firstName", default)]
    pub first_name: String,
    #[serde(rename = "lastName", default)]
    pub last_name: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(rename = "specialtyName", default)]
    pub specialty_name: Option<String>,
    #[serde(rename = "officeName", default)]
    pub office_name: Option<String>,
    #[serde(rename = "addrStreet", default)]
    pub addr_street: Option<String>,
    #[serde(rename = "addrcity", default)]
    pub addr_city: Option<String>,
    #[serde(rename = "addrstate", default)]
    pub addr_state: Option<String>,
    #[serde(rename = "addrzip", default)]
    pub addr_zip: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub appointments: Vec<ReportAppointment>,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub prescriptions: Vec<Prescription>,
}

impl DoctorReportRow {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// ─── Lookup options for the report filters ────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeLocation {
    #[serde(rename = "officeID")]
    pub id: i64,
    #[serde(rename = "officeName")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialty {
    #[serde(rename = "specialtyID")]
    pub id: i64,
    #[serde(rename = "specialtyName")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorOption {
    #[serde(rename = "doctorID")]
    pub id: i64,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
}

/// Gender choices offered by the report filter (fixed, not fetched).
pub const GENDERS: &[&str] = &["Male", "Female", "Other", "Prefer not to say"];

/// Everything the report filter dropdowns need, fetched together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportLookups {
    pub offices: Vec<OfficeLocation>,
    pub specialties: Vec<Specialty>,
    pub states: Vec<String>,
    pub cities: Vec<String>,
    pub doctors: Vec<DoctorOption>,
}

/// Multi-select filters sent with a report request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportQuery {
    pub office_ids: Vec<i64>,
    pub specialty_ids: Vec<i64>,
    pub genders: Vec<String>,
    pub states: Vec<String>,
    pub cities: Vec<String>,
    pub doctor_ids: Vec<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ReportQuery {
    /// Query pairs in backend order; list filters repeat their key.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        pairs.extend(self.office_ids.iter().map(|id| ("officeID", id.to_string())));
        pairs.extend(self.specialty_ids.iter().map(|id| ("specialtyID", id.to_string())));
        pairs.extend(self.genders.iter().map(|g| ("gender", g.clone())));
        pairs.extend(self.states.iter().map(|s| ("state", s.clone())));
        pairs.extend(self.cities.iter().map(|c| ("city", c.clone())));
        pairs.extend(self.doctor_ids.iter().map(|id| ("doctorID", id.to_string())));
        if let Some(start) = self.start_date {
            pairs.push(("startDate", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("endDate", end.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}
