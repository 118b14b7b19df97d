pub mod appointment;
pub mod enums;
pub mod report;
pub mod timestamp;

pub use appointment::*;
pub use enums::*;
pub use report::*;

use thiserror::Error;

/// A strict wire enum received a value it does not know.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid enum value for {field}: {value}")]
pub struct ParseEnumError {
    pub field: &'static str,
    pub value: String,
}
