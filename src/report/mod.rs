//! Admin doctor report: per-row metrics, stable descending sort, aggregate
//! summary, and the screen state that drives them.

pub mod aggregate;
pub mod state;

pub use aggregate::{
    appointment_groups, count_with_status, sort_rows, summarize, ReportSummary, RowMetrics,
};
pub use state::{update, ReportAction, ReportViewState};
