use std::collections::BTreeSet;

use serde::Serialize;

use super::aggregate::{appointment_groups, sort_rows, summarize, ReportSummary};
use crate::models::{
    AppointmentStatus, DoctorReportRow, ReportAppointment, ReportLookups, ReportQuery, SortKey,
};

/// Admin doctor report screen state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportViewState {
    pub lookups: ReportLookups,
    pub query: ReportQuery,
    /// Rows as returned by the last successful generate, fetch order.
    pub rows: Vec<DoctorReportRow>,
    pub sort: Option<SortKey>,
    pub expanded: BTreeSet<i64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ReportAction {
    LookupsLoaded(ReportLookups),
    SetQuery(ReportQuery),
    Generated(Vec<DoctorReportRow>),
    Failed(String),
    SetSort(Option<SortKey>),
    ToggleExpanded(i64),
}

impl ReportViewState {
    pub fn sorted_rows(&self) -> Vec<DoctorReportRow> {
        sort_rows(&self.rows, self.sort)
    }

    pub fn summary(&self) -> ReportSummary {
        summarize(&self.rows)
    }

    pub fn is_expanded(&self, doctor_id: i64) -> bool {
        self.expanded.contains(&doctor_id)
    }

    /// Grouped appointments for an expanded row; empty when collapsed.
    pub fn expanded_groups(
        &self,
        doctor_id: i64,
    ) -> Vec<(AppointmentStatus, Vec<&ReportAppointment>)> {
        if !self.is_expanded(doctor_id) {
            return Vec::new();
        }
        self.rows
            .iter()
            .find(|r| r.doctor_id == doctor_id)
            .map(appointment_groups)
            .unwrap_or_default()
    }
}

pub fn update(state: ReportViewState, action: ReportAction) -> ReportViewState {
    match action {
        ReportAction::LookupsLoaded(lookups) => ReportViewState { lookups, ..state },
        ReportAction::SetQuery(query) => ReportViewState { query, ..state },
        ReportAction::Generated(rows) => {
            // Expansion flags only make sense for doctors still in the report.
            let expanded = state
                .expanded
                .iter()
                .copied()
                .filter(|id| rows.iter().any(|r| r.doctor_id == *id))
                .collect();
            ReportViewState {
                rows,
                expanded,
                error: None,
                ..state
            }
        }
        ReportAction::Failed(message) => ReportViewState {
            error: Some(message),
            ..state
        },
        ReportAction::SetSort(sort) => ReportViewState { sort, ..state },
        ReportAction::ToggleExpanded(doctor_id) => {
            let mut expanded = state.expanded.clone();
            if !expanded.remove(&doctor_id) {
                expanded.insert(doctor_id);
            }
            ReportViewState { expanded, ..state }
        }
    }
}
