use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{AppointmentStatus, DoctorReportRow, ReportAppointment, SortKey};

/// Derived counts for one report row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RowMetrics {
    pub prescription_count: usize,
    pub scheduled: usize,
    pub requested: usize,
    pub completed: usize,
}

impl RowMetrics {
    pub fn of(row: &DoctorReportRow) -> Self {
        Self {
            prescription_count: row.prescriptions.len(),
            scheduled: count_with_status(row, &AppointmentStatus::Scheduled),
            requested: count_with_status(row, &AppointmentStatus::Requested),
            completed: count_with_status(row, &AppointmentStatus::Completed),
        }
    }

    pub fn value(&self, key: SortKey) -> usize {
        match key {
            SortKey::PrescriptionCount => self.prescription_count,
            SortKey::ScheduledAppointments => self.scheduled,
            SortKey::RequestedAppointments => self.requested,
            SortKey::CompletedAppointments => self.completed,
        }
    }
}

pub fn count_with_status(row: &DoctorReportRow, status: &AppointmentStatus) -> usize {
    row.appointments.iter().filter(|a| a.status == *status).count()
}

/// Appointments shown under an expanded row: Scheduled, Requested and
/// Completed groups, empty groups omitted.
pub fn appointment_groups(
    row: &DoctorReportRow,
) -> Vec<(AppointmentStatus, Vec<&ReportAppointment>)> {
    AppointmentStatus::REPORTED
        .iter()
        .map(|status| {
            let group: Vec<&ReportAppointment> = row
                .appointments
                .iter()
                .filter(|a| a.status == *status)
                .collect();
            (status.clone(), group)
        })
        .filter(|(_, group)| !group.is_empty())
        .collect()
}

/// Rows in descending order of `key`; ties keep input order.
/// With no key the input comes back unchanged.
pub fn sort_rows(rows: &[DoctorReportRow], key: Option<SortKey>) -> Vec<DoctorReportRow> {
    let Some(key) = key else {
        return rows.to_vec();
    };
    let mut keyed: Vec<(usize, &DoctorReportRow)> = rows
        .iter()
        .map(|row| (RowMetrics::of(row).value(key), row))
        .collect();
    // sort_by is stable
    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    keyed.into_iter().map(|(_, row)| row.clone()).collect()
}

/// Totals across a whole report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total_prescriptions: usize,
    /// Every status seen, plus Scheduled/Requested/Completed at zero
    /// when absent.
    pub status_totals: BTreeMap<String, usize>,
}

impl ReportSummary {
    pub fn count(&self, status: &AppointmentStatus) -> usize {
        self.status_totals.get(status.as_str()).copied().unwrap_or(0)
    }
}

pub fn summarize(rows: &[DoctorReportRow]) -> ReportSummary {
    let mut status_totals: BTreeMap<String, usize> = AppointmentStatus::REPORTED
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();
    for appt in rows.iter().flat_map(|row| row.appointments.iter()) {
        *status_totals.entry(appt.status.as_str().to_string()).or_insert(0) += 1;
    }
    ReportSummary {
        total_prescriptions: rows.iter().map(|row| row.prescriptions.len()).sum(),
        status_totals,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::Prescription;

    fn prescription(name: &str) -> Prescription {
        Prescription {
            id: None,
            issued_at: None,
            medication: name.into(),
            dosage: None,
            patient_first_name: "Ana".into(),
            patient_last_name: "Ruiz".into(),
        }
    }

    fn report_appt(id: i64, status: &str) -> ReportAppointment {
        ReportAppointment {
            id,
            scheduled_at: None,
            status: AppointmentStatus::from_wire(status),
            reason: None,
            patient_first_name: "Ana".into(),
            patient_last_name: "Ruiz".into(),
        }
    }

    pub(crate) fn row(doctor_id: i64, prescriptions: usize, statuses: &[&str]) -> DoctorReportRow {
        DoctorReportRow {
            doctor_id,
            first_name: format!("Doc{doctor_id}"),
            last_name: "Test".into(),
            gender: None,
            specialty_name: None,
            office_name: None,
            addr_street: None,
            addr_city: None,
            addr_state: None,
            addr_zip: None,
            appointments: statuses
                .iter()
                .enumerate()
                .map(|(i, s)| report_appt(doctor_id * 100 + i as i64, s))
                .collect(),
            prescriptions: (0..prescriptions).map(|i| prescription(&format!("Med{i}"))).collect(),
        }
    }

    fn ids(rows: &[DoctorReportRow]) -> Vec<i64> {
        rows.iter().map(|r| r.doctor_id).collect()
    }

    #[test]
    fn metrics_match_collection_lengths() {
        let r = row(1, 2, &["Scheduled", "Scheduled", "Completed", "Missed"]);
        let m = RowMetrics::of(&r);
        assert_eq!(m.prescription_count, 2);
        assert_eq!(m.scheduled, 2);
        assert_eq!(m.requested, 0);
        assert_eq!(m.completed, 1);
    }

    #[test]
    fn sort_by_prescription_count_descending() {
        let rows = vec![row(1, 3, &[]), row(2, 1, &[]), row(3, 2, &[])];
        let sorted = sort_rows(&rows, Some(SortKey::PrescriptionCount));
        assert_eq!(ids(&sorted), vec![1, 3, 2]);
    }

    #[test]
    fn ties_keep_input_order() {
        let rows = vec![row(1, 1, &[]), row(2, 5, &[]), row(3, 1, &[]), row(4, 5, &[])];
        let sorted = sort_rows(&rows, Some(SortKey::PrescriptionCount));
        assert_eq!(ids(&sorted), vec![2, 4, 1, 3]);
    }

    #[test]
    fn no_key_returns_input_order() {
        let rows = vec![row(1, 0, &[]), row(2, 9, &[]), row(3, 4, &[])];
        assert_eq!(sort_rows(&rows, None), rows);
    }

    #[test]
    fn sort_by_status_counts() {
        let rows = vec![
            row(1, 0, &["Requested"]),
            row(2, 0, &["Requested", "Requested", "Scheduled"]),
            row(3, 0, &["Completed", "Scheduled", "Scheduled"]),
        ];
        assert_eq!(ids(&sort_rows(&rows, Some(SortKey::RequestedAppointments))), vec![2, 1, 3]);
        assert_eq!(ids(&sort_rows(&rows, Some(SortKey::ScheduledAppointments))), vec![3, 2, 1]);
        assert_eq!(ids(&sort_rows(&rows, Some(SortKey::CompletedAppointments))), vec![3, 1, 2]);
    }

    #[test]
    fn empty_report_summary_reports_zero_baseline() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_prescriptions, 0);
        assert_eq!(summary.status_totals.get("Scheduled"), Some(&0));
        assert_eq!(summary.status_totals.get("Requested"), Some(&0));
        assert_eq!(summary.status_totals.get("Completed"), Some(&0));
        assert_eq!(summary.status_totals.len(), 3);
    }

    #[test]
    fn summary_sums_rows_and_counts_other_statuses() {
        let rows = vec![
            row(1, 2, &["Scheduled", "Cancelled"]),
            row(2, 3, &["Scheduled", "Completed", "Missed"]),
        ];
        let summary = summarize(&rows);
        assert_eq!(summary.total_prescriptions, 5);
        assert_eq!(summary.count(&AppointmentStatus::Scheduled), 2);
        assert_eq!(summary.count(&AppointmentStatus::Requested), 0);
        assert_eq!(summary.count(&AppointmentStatus::Completed), 1);
        assert_eq!(summary.count(&AppointmentStatus::Cancelled), 1);
        assert_eq!(summary.count(&AppointmentStatus::Missed), 1);
        assert_eq!(summary.count(&AppointmentStatus::RequestDenied), 0);
    }

    #[test]
    fn summary_matches_sum_of_row_metrics() {
        let rows = vec![
            row(1, 4, &["Scheduled", "Requested"]),
            row(2, 0, &["Requested", "Completed"]),
            row(3, 1, &[]),
        ];
        let summary = summarize(&rows);
        let metrics: Vec<RowMetrics> = rows.iter().map(RowMetrics::of).collect();
        assert_eq!(
            summary.total_prescriptions,
            metrics.iter().map(|m| m.prescription_count).sum::<usize>()
        );
        assert_eq!(
            summary.count(&AppointmentStatus::Requested),
            metrics.iter().map(|m| m.requested).sum::<usize>()
        );
    }

    #[test]
    fn groups_omit_empty_statuses() {
        let r = row(1, 0, &["Completed", "Scheduled", "Cancelled", "Completed"]);
        let groups = appointment_groups(&r);
        let shape: Vec<(String, usize)> = groups
            .iter()
            .map(|(s, g)| (s.as_str().to_string(), g.len()))
            .collect();
        assert_eq!(
            shape,
            vec![("Scheduled".to_string(), 1), ("Completed".to_string(), 2)]
        );
    }
}
