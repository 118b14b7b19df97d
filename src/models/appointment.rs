use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::enums::AppointmentStatus;
use super::timestamp::{deserialize_optional_datetime, parse_timestamp};

/// Patient identity attached to an appointment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PatientIdentity {
    #[serde(rename = "patientFirstName", default)]
    pub first_name: String,
    #[serde(rename = "patientLastName", default)]
    pub last_name: String,
    #[serde(rename = "patientEmail", default)]
    pub email: Option<String>,
    #[serde(rename = "patientPhoneNumber", default)]
    pub phone_number: Option<String>,
    #[serde(rename = "patientDateOfBirth", default)]
    pub date_of_birth: Option<String>,
}

impl PatientIdentity {
    /// "First Last", the key the patient filter matches on.
    pub fn full_name(&self) -> String {
        crate::display::patient_name(&self.first_name, &self.last_name)
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.date_of_birth
            .as_deref()
            .and_then(parse_timestamp)
            .map(|dt| dt.date_naive())
    }
}

/// One row of `GET /appointment/doctorAppointments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(rename = "appointmentID")]
    pub id: i64,
    /// `None` when the backend sent no usable timestamp. Such records are
    /// never upcoming and never inside a date range.
    #[serde(
        rename = "appointmentDateTime",
        default,
        deserialize_with = "deserialize_optional_datetime"
    )]
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(flatten)]
    pub patient: PatientIdentity,
    #[serde(rename = "visitType", default)]
    pub visit_type: Option<String>,
    #[serde(rename = "serviceName", default)]
    pub service_name: Option<String>,
}
