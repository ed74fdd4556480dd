//! Splits a month into calendar weeks for the weekly drill-down.
//!
//! Weeks run Sunday through Saturday. The first and last week of a month are clipped to the
//! month, so a month that starts on a Wednesday has a first week of four days.

use crate::error::{ErrorType, IntoResult};
use crate::model::MonthYear;
use crate::Result;
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// One calendar week clipped to a month. Both `start` and `end` are inclusive.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct WeekWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl WeekWindow {
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// The number of days in the window, between 1 and 7.
    pub fn days(&self) -> u64 {
        (self.end - self.start).num_days() as u64 + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// A short label for a week picker, e.g. `Oct 01 - Oct 04`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.start.format("%b %d"), self.end.format("%b %d"))
    }
}

impl Display for WeekWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Computes the weeks of `month` in chronological order. The windows cover every day of the month
/// exactly once.
pub fn weeks_of(month: MonthYear) -> Vec<WeekWindow> {
    let month_start = month.first_day();
    let month_end = month.last_day();

    let mut windows = Vec::with_capacity(6);
    let mut cursor = month_start;
    while cursor <= month_end {
        let back_to_sunday = Days::new(u64::from(cursor.weekday().num_days_from_sunday()));
        let natural_start = cursor.checked_sub_days(back_to_sunday).unwrap_or(cursor);
        let natural_end = natural_start
            .checked_add_days(Days::new(6))
            .unwrap_or(month_end);

        windows.push(WeekWindow {
            start: natural_start.max(month_start),
            end: natural_end.min(month_end),
        });

        cursor = match natural_end.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    windows
}

/// Parses `month` (`YYYY-MM`) and computes its weeks.
///
/// # Errors
/// A malformed month is a request error. An empty list is never returned for bad input.
pub fn weeks_of_month(month: &str) -> Result<Vec<WeekWindow>> {
    let month = MonthYear::from_str(month).pub_result(ErrorType::Request)?;
    Ok(weeks_of(month))
}
