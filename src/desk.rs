//! Session drivers: tie a `RecordSource` to the overview and report state.
//!
//! Every mutation goes through the backend and is followed by a full
//! re-fetch; local state is never patched optimistically.

use crate::clock::Clock;
use crate::fetch::{FetchError, RecordSource};
use crate::models::{AppointmentStatus, ReportQuery, SortKey, StatusAction};
use crate::overview::{self, OverviewAction, OverviewState};
use crate::report::{self, ReportAction, ReportViewState};

#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Cannot move appointment from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
    #[error("Appointment not found: {0}")]
    UnknownAppointment(i64),
    #[error("Appointments have not been loaded")]
    NotLoaded,
}

const LOAD_FAILED: &str = "Failed to load appointments.";
const REPORT_FAILED: &str = "Failed to generate report.";

// ═══════════════════════════════════════════════════════════════════════════
// Appointment overview
// ═══════════════════════════════════════════════════════════════════════════

pub struct AppointmentDesk<S, C> {
    source: S,
    clock: C,
    state: OverviewState,
}

impl<S: RecordSource, C: Clock> AppointmentDesk<S, C> {
    pub fn new(source: S, clock: C) -> Self {
        Self {
            source,
            clock,
            state: OverviewState::default(),
        }
    }

    pub fn state(&self) -> &OverviewState {
        &self.state
    }

    pub fn dispatch(&mut self, action: OverviewAction) {
        self.state = overview::update(std::mem::take(&mut self.state), action);
    }

    /// Fetch the doctor's appointments and categorize them against the clock.
    pub async fn load(&mut self) -> Result<(), DeskError> {
        self.dispatch(OverviewAction::Reloading);
        match self.source.doctor_appointments().await {
            Ok(appointments) => {
                tracing::info!(count = appointments.len(), "Appointments loaded");
                let now = self.clock.now();
                self.dispatch(OverviewAction::Loaded { appointments, now });
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load appointments");
                self.dispatch(OverviewAction::LoadFailed(LOAD_FAILED.to_string()));
                Err(e.into())
            }
        }
    }

    /// Apply a doctor action to one appointment, then reload everything.
    ///
    /// A rejected transition or failed PUT leaves the state untouched.
    pub async fn update_status(&mut self, id: i64, action: StatusAction) -> Result<(), DeskError> {
        if self.state.categorized_at.is_none() {
            return Err(DeskError::NotLoaded);
        }
        let current = self
            .state
            .all
            .find(id)
            .map(|a| a.status.clone())
            .ok_or(DeskError::UnknownAppointment(id))?;

        let target = action.target();
        if !current.can_transition_to(&target) {
            tracing::warn!(
                appointment_id = id,
                from = %current,
                to = %target,
                "Rejected status transition"
            );
            return Err(DeskError::InvalidTransition {
                from: current,
                to: target,
            });
        }

        self.source.update_appointment(id, &target).await.map_err(|e| {
            tracing::error!(appointment_id = id, error = %e, "Status update failed");
            DeskError::from(e)
        })?;
        tracing::info!(appointment_id = id, status = %target, "Appointment status updated");

        self.load().await
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Doctor report
// ═══════════════════════════════════════════════════════════════════════════

pub struct ReportDesk<S> {
    source: S,
    state: ReportViewState,
}

impl<S: RecordSource> ReportDesk<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: ReportViewState::default(),
        }
    }

    pub fn state(&self) -> &ReportViewState {
        &self.state
    }

    pub fn dispatch(&mut self, action: ReportAction) {
        self.state = report::update(std::mem::take(&mut self.state), action);
    }

    pub fn set_query(&mut self, query: ReportQuery) {
        self.dispatch(ReportAction::SetQuery(query));
    }

    pub fn set_sort(&mut self, sort: Option<SortKey>) {
        self.dispatch(ReportAction::SetSort(sort));
    }

    /// Load the filter dropdown options.
    pub async fn lookups(&mut self) -> Result<(), DeskError> {
        match self.source.report_lookups().await {
            Ok(lookups) => {
                self.dispatch(ReportAction::LookupsLoaded(lookups));
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load report filters");
                Err(e.into())
            }
        }
    }

    /// Run the report for the current query.
    pub async fn generate(&mut self) -> Result<(), DeskError> {
        match self.source.doctor_report(&self.state.query).await {
            Ok(rows) => {
                tracing::info!(rows = rows.len(), "Doctor report generated");
                self.dispatch(ReportAction::Generated(rows));
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to generate doctor report");
                self.dispatch(ReportAction::Failed(REPORT_FAILED.to_string()));
                Err(e.into())
            }
        }
    }
}
