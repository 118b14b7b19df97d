pub mod clock;
pub mod config;
pub mod desk; // Session drivers: load / update / report
pub mod display;
pub mod fetch; // Backend REST client
pub mod models;
pub mod overview; // Doctor appointment overview
pub mod report; // Admin doctor report

use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::clock::{Clock, SystemClock};
use crate::config::{ClientConfig, ConfigError};
use crate::desk::{AppointmentDesk, DeskError, ReportDesk};
use crate::display::{format_address, AppointmentDetails, UNKNOWN_ADDRESS};
use crate::fetch::{DeskClient, FetchError, RecordSource};
use crate::models::{DoctorReportRow, ReportLookups, ReportQuery, SortKey, StatusAction, GENDERS};
use crate::overview::OverviewAction;
use crate::report::ReportSummary;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Desk(#[from] DeskError),
    #[error("Cannot encode output: {0}")]
    Json(#[from] serde_json::Error),
}

impl RunError {
    fn fetch_error(&self) -> Option<&FetchError> {
        match self {
            RunError::Fetch(e) | RunError::Desk(DeskError::Fetch(e)) => Some(e),
            _ => None,
        }
    }

    /// Extra line printed under the error for the user.
    pub fn hint(&self) -> Option<&'static str> {
        match self.fetch_error() {
            Some(e) if e.is_network_failure() => {
                Some("Check CAREDESK_API_URL and that the token is still valid.")
            }
            Some(_) => Some("The backend answered with data CareDesk does not understand."),
            None => None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "caredesk", version, about = "Hospital appointment overview and doctor report")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The doctor's appointments by bucket (default)
    Appointments(OverviewArgs),
    /// One appointment's details panel
    Details { id: i64 },
    /// Options for the report filters
    Lookups,
    /// The admin doctor report
    Report(ReportArgs),
    /// Accept, reject, cancel or complete an appointment
    Update { id: i64, action: StatusAction },
}

/// Overview filters; each flag maps to one filter action.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct OverviewArgs {
    /// Patient full name, "First Last"
    #[arg(long)]
    pub patient: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    /// Inclusive lower bound (date or timestamp)
    #[arg(long)]
    pub from: Option<String>,
    /// Inclusive upper bound (date or timestamp)
    #[arg(long)]
    pub to: Option<String>,
}

impl OverviewArgs {
    pub fn actions(&self) -> Vec<OverviewAction> {
        let mut actions = Vec::new();
        if let Some(patient) = &self.patient {
            actions.push(OverviewAction::SetPatient(patient.clone()));
        }
        if let Some(status) = &self.status {
            actions.push(OverviewAction::SetStatus(status.clone()));
        }
        if let Some(from) = &self.from {
            actions.push(OverviewAction::SetStart(from.clone()));
        }
        if let Some(to) = &self.to {
            actions.push(OverviewAction::SetEnd(to.clone()));
        }
        actions
    }
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportArgs {
    /// prescriptionCount, scheduledAppointments, requestedAppointments or completedAppointments
    pub sort: Option<SortKey>,
    #[arg(long = "office")]
    pub offices: Vec<i64>,
    #[arg(long = "specialty")]
    pub specialties: Vec<i64>,
    #[arg(long = "gender")]
    pub genders: Vec<String>,
    #[arg(long = "state")]
    pub states: Vec<String>,
    #[arg(long = "city")]
    pub cities: Vec<String>,
    #[arg(long = "doctor")]
    pub doctors: Vec<i64>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

impl ReportArgs {
    pub fn query(&self) -> ReportQuery {
        ReportQuery {
            office_ids: self.offices.clone(),
            specialty_ids: self.specialties.clone(),
            genders: self.genders.clone(),
            states: self.states.clone(),
            cities: self.cities.clone(),
            doctor_ids: self.doctors.clone(),
            start_date: self.from,
            end_date: self.to,
        }
    }
}

#[derive(Serialize)]
struct ReportRowOutput {
    #[serde(flatten)]
    row: DoctorReportRow,
    address: String,
}

#[derive(Serialize)]
struct ReportOutput {
    rows: Vec<ReportRowOutput>,
    summary: ReportSummary,
}

#[derive(Serialize)]
struct LookupsOutput<'a> {
    #[serde(flatten)]
    lookups: &'a ReportLookups,
    genders: &'static [&'static str],
}

async fn execute<S: RecordSource>(command: Command, source: S) -> Result<String, RunError> {
    match command {
        Command::Appointments(filters) => {
            let mut desk = AppointmentDesk::new(source, SystemClock);
            desk.load().await?;
            for action in filters.actions() {
                desk.dispatch(action);
            }
            Ok(serde_json::to_string_pretty(&desk.state().visible.display_order())?)
        }
        Command::Details { id } => {
            let mut desk = AppointmentDesk::new(source, SystemClock);
            desk.load().await?;
            desk.dispatch(OverviewAction::Select(id));
            let appointment = desk
                .state()
                .selected_appointment()
                .ok_or(DeskError::UnknownAppointment(id))?;
            let details = AppointmentDetails::new(appointment, SystemClock.now().date_naive());
            Ok(serde_json::to_string_pretty(&details)?)
        }
        Command::Update { id, action } => {
            let mut desk = AppointmentDesk::new(source, SystemClock);
            desk.load().await?;
            desk.update_status(id, action).await?;
            Ok(serde_json::to_string_pretty(&desk.state().visible.display_order())?)
        }
        Command::Lookups => {
            let mut desk = ReportDesk::new(source);
            desk.lookups().await?;
            let output = LookupsOutput {
                lookups: &desk.state().lookups,
                genders: GENDERS,
            };
            Ok(serde_json::to_string_pretty(&output)?)
        }
        Command::Report(args) => {
            let mut desk = ReportDesk::new(source);
            desk.set_query(args.query());
            desk.set_sort(args.sort);
            desk.generate().await?;
            let state = desk.state();
            let rows = state
                .sorted_rows()
                .into_iter()
                .map(|row| ReportRowOutput {
                    address: format_address(&row).unwrap_or_else(|| UNKNOWN_ADDRESS.to_string()),
                    row,
                })
                .collect();
            let output = ReportOutput {
                rows,
                summary: state.summary(),
            };
            Ok(serde_json::to_string_pretty(&output)?)
        }
    }
}

async fn connect_and_execute(command: Command) -> Result<String, RunError> {
    let config = ClientConfig::from_env()?;
    let client = DeskClient::new(&config)?;
    tracing::debug!(base_url = client.base_url(), "Backend client ready");
    execute(command, client).await
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let command = cli
        .command
        .unwrap_or_else(|| Command::Appointments(OverviewArgs::default()));

    match connect_and_execute(command).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("{e}");
            if let Some(hint) = e.hint() {
                eprintln!("{hint}");
            }
            ExitCode::FAILURE
        }
    }
}
