//! Doctor appointment overview: bucket appointments by lifecycle stage,
//! narrow them with the user's filters, and hold the result as explicit
//! state driven by `state::update`.

pub mod categorize;
pub mod filter;
pub mod state;

pub use categorize::{bucket_for, categorize, categorize_at, BucketSet, FilterOptions};
pub use filter::{apply_filters, FilterState};
pub use state::{update, LoadState, OverviewAction, OverviewState};
