use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::categorize::BucketSet;
use crate::models::timestamp::parse_timestamp;
use crate::models::Appointment;

/// User-selected narrowing predicates. `None` leaves an axis unconstrained;
/// both date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub patient: Option<String>,
    pub status: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Blank input clears the selection.
fn non_blank(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl FilterState {
    pub fn is_unset(&self) -> bool {
        self.patient.is_none() && self.status.is_none() && self.start.is_none() && self.end.is_none()
    }

    pub fn with_patient(mut self, patient: &str) -> Self {
        self.patient = non_blank(patient);
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = non_blank(status);
        self
    }

    /// Accepts anything `parse_timestamp` does; a bare date is midnight UTC.
    /// Unparseable input clears the bound.
    pub fn with_start(mut self, raw: &str) -> Self {
        self.start = parse_timestamp(raw);
        self
    }

    pub fn with_end(mut self, raw: &str) -> Self {
        self.end = parse_timestamp(raw);
        self
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        if let Some(patient) = &self.patient {
            if appointment.patient.full_name() != *patient {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if appointment.status.as_str() != status {
                return false;
            }
        }
        // An undated record fails any bound that is set.
        if let Some(start) = self.start {
            if !appointment.scheduled_at.is_some_and(|at| at >= start) {
                return false;
            }
        }
        if let Some(end) = self.end {
            if !appointment.scheduled_at.is_some_and(|at| at <= end) {
                return false;
            }
        }
        true
    }
}

/// Narrow every bucket with the same predicate. The input set is untouched.
pub fn apply_filters(buckets: &BucketSet, filter: &FilterState) -> BucketSet {
    if filter.is_unset() {
        return buckets.clone();
    }
    let filtered = buckets.retain_each(|a| filter.matches(a));
    tracing::debug!(
        before = buckets.total(),
        after = filtered.total(),
        "Applied appointment filters"
    );
    filtered
}
