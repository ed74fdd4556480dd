//! Command handlers for the expenses CLI.
//!
//! Each handler validates its input, talks to the database through `Config::db` and returns an
//! [`Out`] describing what happened.

mod account;
mod dashboard;
mod detail;
mod expense;
mod init;

use crate::error::{ErrorType, IntoResult};
use crate::model::MonthYear;
use crate::Result;
use serde::Serialize;
use std::fmt::Debug;
use std::str::FromStr;
use tracing::{debug, info};

pub use account::{login, logout, signup};
pub use dashboard::{dashboard, CategoryShare, Dashboard};
pub use detail::{detail, Detail};
pub use expense::{add, delete, edit, show};
pub use init::init;

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Parses a `--month` argument. No argument means the current month.
fn parse_month(month: Option<&str>) -> Result<MonthYear> {
    match month {
        Some(s) => MonthYear::from_str(s).pub_result(ErrorType::Request),
        None => Ok(MonthYear::current()),
    }
}
