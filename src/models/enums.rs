use serde::{Deserialize, Serialize};

use super::ParseEnumError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Serialized form is the wire string, not the variant name.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ParseEnumError {
                        field: stringify!($name),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(SortKey {
    PrescriptionCount => "prescriptionCount",
    ScheduledAppointments => "scheduledAppointments",
    RequestedAppointments => "requestedAppointments",
    CompletedAppointments => "completedAppointments",
});

str_enum!(StatusAction {
    Accept => "accept",
    Reject => "reject",
    Cancel => "cancel",
    Complete => "complete",
});

str_enum!(Bucket {
    Upcoming => "upcoming",
    Requested => "requested",
    Past => "past",
    Other => "other",
});

impl Bucket {
    /// All buckets in display order.
    pub const ALL: [Bucket; 4] = [
        Bucket::Upcoming,
        Bucket::Requested,
        Bucket::Past,
        Bucket::Other,
    ];
}

// ─── AppointmentStatus ───────────────────────────────────────────────────────

const FROM_REQUESTED: &[AppointmentStatus] = &[
    AppointmentStatus::Scheduled,
    AppointmentStatus::RequestDenied,
];

// Missed is set by the backend once the slot has passed.
const FROM_SCHEDULED: &[AppointmentStatus] = &[
    AppointmentStatus::Cancelled,
    AppointmentStatus::Completed,
    AppointmentStatus::Missed,
];

/// Appointment lifecycle status as stored by the backend.
///
/// Unknown wire values are kept verbatim in `Unrecognized` instead of failing
/// deserialization; they have no transitions and categorize as "other".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    Scheduled,
    Requested,
    Completed,
    Missed,
    Cancelled,
    RequestDenied,
    Unrecognized(String),
}

impl AppointmentStatus {
    /// Statuses with a fixed baseline in report summaries.
    pub const REPORTED: [AppointmentStatus; 3] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Requested,
        AppointmentStatus::Completed,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Requested => "Requested",
            Self::Completed => "Completed",
            Self::Missed => "Missed",
            Self::Cancelled => "Cancelled",
            Self::RequestDenied => "Request Denied",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Lenient parse: never fails.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "Scheduled" => Self::Scheduled,
            "Requested" => Self::Requested,
            "Completed" => Self::Completed,
            "Missed" => Self::Missed,
            "Cancelled" => Self::Cancelled,
            "Request Denied" => Self::RequestDenied,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Statuses reachable from this one in a single transition.
    pub fn allowed_transitions(&self) -> &'static [AppointmentStatus] {
        match self {
            Self::Requested => FROM_REQUESTED,
            Self::Scheduled => FROM_SCHEDULED,
            _ => &[],
        }
    }

    pub fn can_transition_to(&self, next: &AppointmentStatus) -> bool {
        self.allowed_transitions().contains(next)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Missed | Self::Cancelled | Self::RequestDenied
        )
    }

    /// Doctor actions that may be offered for an appointment in this status.
    pub fn available_actions(&self) -> Vec<StatusAction> {
        if self.is_terminal() {
            return Vec::new();
        }
        StatusAction::ALL
            .into_iter()
            .filter(|action| self.can_transition_to(&action.target()))
            .collect()
    }
}

impl From<String> for AppointmentStatus {
    fn from(s: String) -> Self {
        Self::from_wire(&s)
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        match status {
            AppointmentStatus::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StatusAction {
    pub const ALL: [StatusAction; 4] = [
        StatusAction::Accept,
        StatusAction::Reject,
        StatusAction::Cancel,
        StatusAction::Complete,
    ];

    /// Status the appointment is moved to when this action succeeds.
    pub fn target(&self) -> AppointmentStatus {
        match self {
            Self::Accept => AppointmentStatus::Scheduled,
            Self::Reject => AppointmentStatus::RequestDenied,
            Self::Cancel => AppointmentStatus::Cancelled,
            Self::Complete => AppointmentStatus::Completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn sort_key_round_trip() {
        for (variant, s) in [
            (SortKey::PrescriptionCount, "prescriptionCount"),
            (SortKey::ScheduledAppointments, "scheduledAppointments"),
            (SortKey::RequestedAppointments, "requestedAppointments"),
            (SortKey::CompletedAppointments, "completedAppointments"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(SortKey::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn invalid_enum_returns_error() {
        let err = SortKey::from_str("byName").unwrap_err();
        assert_eq!(err.field, "SortKey");
        assert!(StatusAction::from_str("ACCEPT").is_err());
        assert!(Bucket::from_str("").is_err());
    }

    #[test]
    fn known_statuses_parse() {
        assert_eq!(AppointmentStatus::from_wire("Scheduled"), AppointmentStatus::Scheduled);
        assert_eq!(
            AppointmentStatus::from_wire("Request Denied"),
            AppointmentStatus::RequestDenied
        );
        assert_eq!(AppointmentStatus::RequestDenied.as_str(), "Request Denied");
    }

    #[test]
    fn unknown_status_is_preserved() {
        let status = AppointmentStatus::from_wire("Rescheduled");
        assert_eq!(status, AppointmentStatus::Unrecognized("Rescheduled".into()));
        assert_eq!(status.as_str(), "Rescheduled");
        assert!(status.allowed_transitions().is_empty());
    }

    #[test]
    fn status_serde_uses_wire_text() {
        let json = serde_json::to_string(&AppointmentStatus::RequestDenied).unwrap();
        assert_eq!(json, "\"Request Denied\"");
        let parsed: AppointmentStatus = serde_json::from_str("\"no-show\"").unwrap();
        assert_eq!(parsed.as_str(), "no-show");
    }

    #[test]
    fn transition_table() {
        use AppointmentStatus::*;
        assert!(Requested.can_transition_to(&Scheduled));
        assert!(Requested.can_transition_to(&RequestDenied));
        assert!(!Requested.can_transition_to(&Completed));
        assert!(Scheduled.can_transition_to(&Cancelled));
        assert!(Scheduled.can_transition_to(&Missed));
        for terminal in [Completed, Missed, Cancelled, RequestDenied] {
            assert!(terminal.is_terminal());
            assert!(terminal.allowed_transitions().is_empty());
        }
    }

    #[test]
    fn action_targets() {
        assert_eq!(StatusAction::Accept.target(), AppointmentStatus::Scheduled);
        assert_eq!(StatusAction::Reject.target(), AppointmentStatus::RequestDenied);
        assert_eq!(StatusAction::Cancel.target(), AppointmentStatus::Cancelled);
    }

    #[test]
    fn bucket_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Bucket::Upcoming).unwrap(), "\"upcoming\"");
    }

    #[test]
    fn available_actions_follow_transitions() {
        assert_eq!(
            AppointmentStatus::Requested.available_actions(),
            vec![StatusAction::Accept, StatusAction::Reject]
        );
        assert_eq!(
            AppointmentStatus::Scheduled.available_actions(),
            vec![StatusAction::Cancel, StatusAction::Complete]
        );
        assert!(AppointmentStatus::Cancelled.available_actions().is_empty());
        assert!(AppointmentStatus::from_wire("On Hold").available_actions().is_empty());
    }
}
