use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::models::{Appointment, AppointmentStatus, Bucket};

/// Appointments partitioned by lifecycle stage.
///
/// Each appointment of a categorization pass lands in exactly one bucket,
/// in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSet {
    pub upcoming: Vec<Appointment>,
    pub requested: Vec<Appointment>,
    pub past: Vec<Appointment>,
    pub other: Vec<Appointment>,
}

impl BucketSet {
    pub fn get(&self, bucket: Bucket) -> &[Appointment] {
        match bucket {
            Bucket::Upcoming => &self.upcoming,
            Bucket::Requested => &self.requested,
            Bucket::Past => &self.past,
            Bucket::Other => &self.other,
        }
    }

    fn get_mut(&mut self, bucket: Bucket) -> &mut Vec<Appointment> {
        match bucket {
            Bucket::Upcoming => &mut self.upcoming,
            Bucket::Requested => &mut self.requested,
            Bucket::Past => &mut self.past,
            Bucket::Other => &mut self.other,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Bucket, &[Appointment])> {
        Bucket::ALL.into_iter().map(move |b| (b, self.get(b)))
    }

    pub fn total(&self) -> usize {
        self.upcoming.len() + self.requested.len() + self.past.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Look up an appointment by id in any bucket.
    pub fn find(&self, id: i64) -> Option<&Appointment> {
        self.iter()
            .flat_map(|(_, list)| list.iter())
            .find(|a| a.id == id)
    }

    /// Copy arranged for display: upcoming and requested soonest-first
    /// (stable on equal times, undated last), past and other untouched.
    pub fn display_order(&self) -> BucketSet {
        let mut out = self.clone();
        let key = |a: &Appointment| (a.scheduled_at.is_none(), a.scheduled_at);
        out.upcoming.sort_by_key(key);
        out.requested.sort_by_key(key);
        out
    }

    /// Apply `keep` to every bucket independently.
    pub fn retain_each<F>(&self, mut keep: F) -> BucketSet
    where
        F: FnMut(&Appointment) -> bool,
    {
        let mut out = BucketSet::default();
        for (bucket, list) in self.iter() {
            out.get_mut(bucket)
                .extend(list.iter().filter(|a| keep(*a)).cloned());
        }
        out
    }
}

/// Which bucket an appointment belongs in at `now`.
pub fn bucket_for(appointment: &Appointment, now: DateTime<Utc>) -> Bucket {
    match appointment.status {
        AppointmentStatus::Scheduled if appointment.scheduled_at.is_some_and(|at| at >= now) => {
            Bucket::Upcoming
        }
        AppointmentStatus::Scheduled => Bucket::Past,
        AppointmentStatus::Requested => Bucket::Requested,
        AppointmentStatus::Completed | AppointmentStatus::Missed => Bucket::Past,
        AppointmentStatus::Cancelled | AppointmentStatus::RequestDenied => Bucket::Other,
        AppointmentStatus::Unrecognized(_) => Bucket::Other,
    }
}

/// Partition against a single reading of `clock`.
pub fn categorize<C: Clock>(appointments: Vec<Appointment>, clock: &C) -> BucketSet {
    categorize_at(appointments, clock.now())
}

pub fn categorize_at(appointments: Vec<Appointment>, now: DateTime<Utc>) -> BucketSet {
    let mut set = BucketSet::default();
    for appointment in appointments {
        let bucket = bucket_for(&appointment, now);
        set.get_mut(bucket).push(appointment);
    }
    tracing::debug!(
        upcoming = set.upcoming.len(),
        requested = set.requested.len(),
        past = set.past.len(),
        other = set.other.len(),
        "Categorized appointments"
    );
    set
}

/// Distinct values for the filter dropdowns, first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub patients: Vec<String>,
    pub statuses: Vec<String>,
}

impl FilterOptions {
    pub fn from_appointments<'a, I>(appointments: I) -> Self
    where
        I: IntoIterator<Item = &'a Appointment>,
    {
        let mut seen_patients = HashSet::new();
        let mut seen_statuses = HashSet::new();
        let mut options = FilterOptions::default();
        for appt in appointments {
            let name = appt.patient.full_name();
            if seen_patients.insert(name.clone()) {
                options.patients.push(name);
            }
            let status = appt.status.as_str().to_string();
            if seen_statuses.insert(status.clone()) {
                options.statuses.push(status);
            }
        }
        options
    }
}
