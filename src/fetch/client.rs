use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::shape::{parse_doctors, parse_lenient_array};
use super::{FetchError, RecordSource};
use crate::config::ClientConfig;
use crate::models::{
    Appointment, AppointmentStatus, DoctorOption, DoctorReportRow, OfficeLocation, ReportLookups,
    ReportQuery, Specialty,
};

const DOCTOR_APPOINTMENTS: &str = "/appointment/doctorAppointments";
const UPDATE_APPOINTMENT: &str = "/appointment/updateAppointment";
const DOCTOR_REPORT_BASE: &str = "/auth/admin/adminDoctorReport";

/// HTTP client for the hospital backend. Every request carries the bearer token.
pub struct DeskClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct UpdateAppointmentBody<'a> {
    #[serde(rename = "appointmentID")]
    appointment_id: i64,
    status: &'a str,
}

impl DeskClient {
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn map_send_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_connect() {
            FetchError::Network(format!("connection to {} failed", self.base_url))
        } else if e.is_timeout() {
            FetchError::Network("request timed out".into())
        } else {
            FetchError::Network(e.to_string())
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, FetchError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// GET `path` and return the JSON body untyped.
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let response = Self::check(response).await?;

        // An empty 200 body reads as null, which the lenient parsers treat as empty.
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.map_send_error(e))?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            FetchError::Shape(super::ShapeError::Invalid {
                endpoint: path.to_string(),
                reason: e.to_string(),
            })
        })
    }

    pub async fn offices(&self) -> Result<Vec<OfficeLocation>, FetchError> {
        let path = format!("{DOCTOR_REPORT_BASE}/getOfficeLocations");
        let body = self.get_json(&path, &[]).await?;
        Ok(parse_lenient_array(&path, body)?)
    }

    pub async fn specialties(&self) -> Result<Vec<Specialty>, FetchError> {
        let path = format!("{DOCTOR_REPORT_BASE}/getSpecialties");
        let body = self.get_json(&path, &[]).await?;
        Ok(parse_lenient_array(&path, body)?)
    }

    pub async fn states(&self) -> Result<Vec<String>, FetchError> {
        let path = format!("{DOCTOR_REPORT_BASE}/getStates");
        let body = self.get_json(&path, &[]).await?;
        Ok(parse_lenient_array(&path, body)?)
    }

    pub async fn cities(&self) -> Result<Vec<String>, FetchError> {
        let path = format!("{DOCTOR_REPORT_BASE}/getCities");
        let body = self.get_json(&path, &[]).await?;
        Ok(parse_lenient_array(&path, body)?)
    }

    pub async fn doctors(&self) -> Result<Vec<DoctorOption>, FetchError> {
        let path = format!("{DOCTOR_REPORT_BASE}/getDoctors");
        let body = self.get_json(&path, &[]).await?;
        Ok(parse_doctors(&path, body)?)
    }
}

impl RecordSource for DeskClient {
    async fn doctor_appointments(&self) -> Result<Vec<Appointment>, FetchError> {
        let body = self.get_json(DOCTOR_APPOINTMENTS, &[]).await?;
        let appointments: Vec<Appointment> = parse_lenient_array(DOCTOR_APPOINTMENTS, body)?;
        tracing::info!(count = appointments.len(), "Fetched doctor appointments");
        Ok(appointments)
    }

    async fn update_appointment(
        &self,
        appointment_id: i64,
        status: &AppointmentStatus,
    ) -> Result<(), FetchError> {
        let body = UpdateAppointmentBody {
            appointment_id,
            status: status.as_str(),
        };
        let response = self
            .client
            .put(self.url(UPDATE_APPOINTMENT))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        Self::check(response).await?;
        tracing::info!(appointment_id, status = %status, "Appointment status updated");
        Ok(())
    }

    async fn doctor_report(&self, query: &ReportQuery) -> Result<Vec<DoctorReportRow>, FetchError> {
        let path = format!("{DOCTOR_REPORT_BASE}/generateDoctorReport");
        let body = self.get_json(&path, &query.to_query_pairs()).await?;
        let rows: Vec<DoctorReportRow> = parse_lenient_array(&path, body)?;
        tracing::info!(rows = rows.len(), "Generated doctor report");
        Ok(rows)
    }

    /// The five lookups have no ordering dependency and are fetched together.
    async fn report_lookups(&self) -> Result<ReportLookups, FetchError> {
        let (offices, specialties, states, cities, doctors) = tokio::try_join!(
            self.offices(),
            self.specialties(),
            self.states(),
            self.cities(),
            self.doctors(),
        )?;
        Ok(ReportLookups {
            offices,
            specialties,
            states,
            cities,
            doctors,
        })
    }
}
