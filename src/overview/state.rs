use chrono::{DateTime, Utc};
use serde::Serialize;

use super::categorize::{categorize_at, BucketSet, FilterOptions};
use super::filter::{apply_filters, FilterState};
use crate::models::Appointment;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

/// Everything the doctor's appointment overview renders from.
///
/// `all` is the last successfully categorized fetch; `visible` is always
/// `apply_filters(all, filter)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverviewState {
    pub load: LoadState,
    pub all: BucketSet,
    pub visible: BucketSet,
    pub filter: FilterState,
    pub options: FilterOptions,
    pub selected: Option<i64>,
    pub categorized_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub enum OverviewAction {
    Loaded {
        appointments: Vec<Appointment>,
        now: DateTime<Utc>,
    },
    LoadFailed(String),
    Reloading,
    SetPatient(String),
    SetStatus(String),
    SetStart(String),
    SetEnd(String),
    ResetFilters,
    Select(i64),
    CloseDetails,
}

impl OverviewState {
    pub fn is_ready(&self) -> bool {
        self.load == LoadState::Ready
    }

    pub fn selected_appointment(&self) -> Option<&Appointment> {
        self.selected.and_then(|id| self.all.find(id))
    }

    fn refilter(mut self) -> Self {
        self.visible = apply_filters(&self.all, &self.filter);
        self
    }
}

/// Pure transition function for the overview screen.
pub fn update(state: OverviewState, action: OverviewAction) -> OverviewState {
    match action {
        OverviewAction::Loaded { appointments, now } => {
            let options = FilterOptions::from_appointments(&appointments);
            let all = categorize_at(appointments, now);
            let selected = state.selected.filter(|id| all.find(*id).is_some());
            OverviewState {
                load: LoadState::Ready,
                all,
                options,
                selected,
                categorized_at: Some(now),
                ..state
            }
            .refilter()
        }
        // Keep the last good data so a later success can replace it wholesale.
        OverviewAction::LoadFailed(message) => OverviewState {
            load: LoadState::Failed(message),
            ..state
        },
        OverviewAction::Reloading => OverviewState {
            load: LoadState::Loading,
            ..state
        },
        OverviewAction::SetPatient(patient) => OverviewState {
            filter: state.filter.clone().with_patient(&patient),
            ..state
        }
        .refilter(),
        OverviewAction::SetStatus(status) => OverviewState {
            filter: state.filter.clone().with_status(&status),
            ..state
        }
        .refilter(),
        OverviewAction::SetStart(raw) => OverviewState {
            filter: state.filter.clone().with_start(&raw),
            ..state
        }
        .refilter(),
        OverviewAction::SetEnd(raw) => OverviewState {
            filter: state.filter.clone().with_end(&raw),
            ..state
        }
        .refilter(),
        OverviewAction::ResetFilters => OverviewState {
            filter: FilterState::default(),
            ..state
        }
        .refilter(),
        OverviewAction::Select(id) => {
            let selected = state.all.find(id).map(|a| a.id);
            OverviewState { selected, ..state }
        }
        OverviewAction::CloseDetails => OverviewState {
            selected: None,
            ..state
        },
    }
}
