//! Record fetcher: authenticated access to the hospital REST backend.

pub mod client;
pub mod shape;

pub use client::DeskClient;

use crate::models::{Appointment, AppointmentStatus, DoctorReportRow, ReportLookups, ReportQuery};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("{endpoint}: expected a JSON array")]
    NotAnArray { endpoint: String },
    #[error("{endpoint}: {reason}")]
    Invalid { endpoint: String, reason: String },
}

/// Errors from one fetch. Nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Cannot reach backend: {0}")]
    Network(String),
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Unexpected response shape: {0}")]
    Shape(#[from] ShapeError),
}

impl FetchError {
    /// Transport failure or non-2xx response.
    pub fn is_network_failure(&self) -> bool {
        matches!(self, FetchError::Network(_) | FetchError::Status { .. })
    }
}

/// Where appointment and report records come from.
#[allow(async_fn_in_trait)]
pub trait RecordSource {
    async fn doctor_appointments(&self) -> Result<Vec<Appointment>, FetchError>;

    async fn update_appointment(
        &self,
        appointment_id: i64,
        status: &AppointmentStatus,
    ) -> Result<(), FetchError>;

    async fn doctor_report(&self, query: &ReportQuery) -> Result<Vec<DoctorReportRow>, FetchError>;

    async fn report_lookups(&self) -> Result<ReportLookups, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_failure_grouping() {
        assert!(FetchError::Network("refused".into()).is_network_failure());
        assert!(FetchError::Status { status: 500, body: String::new() }.is_network_failure());
        let shape: FetchError = ShapeError::NotAnArray { endpoint: "x".into() }.into();
        assert!(!shape.is_network_failure());
    }

    #[test]
    fn error_messages() {
        let err = FetchError::Status { status: 401, body: "Invalid token".into() };
        assert_eq!(err.to_string(), "Backend returned 401: Invalid token");
    }
}
