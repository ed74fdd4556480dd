use crate::Result;
use anyhow::anyhow;
use chrono::{Datelike, Local, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A calendar month, written as `YYYY-MM` (e.g. `2025-10`). This is the key used to bucket
/// expenses by month.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MonthYear {
    /// Always the first day of the month.
    first: NaiveDate,
}

impl MonthYear {
    /// Returns `None` if `month` is not in `1..=12` or the year is out of range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(0..=9999).contains(&year) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// The month that contains `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    /// The current month in local time.
    pub fn current() -> Self {
        Self::of(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|next_first| next_first.pred_opt())
            .unwrap_or(self.first)
    }

    /// The previous month. January of year 0 is its own predecessor.
    pub fn prev(&self) -> Self {
        self.first
            .checked_sub_months(Months::new(1))
            .and_then(|first| MonthYear::new(first.year(), first.month()))
            .unwrap_or(*self)
    }

    /// The following month. December 9999 is its own successor.
    pub fn next(&self) -> Self {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|first| MonthYear::new(first.year(), first.month()))
            .unwrap_or(*self)
    }

    /// Whether `date` falls within this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// The month in a readable form, e.g. `October 2025`.
    pub fn display_name(&self) -> String {
        self.first.format("%B %Y").to_string()
    }
}

impl Display for MonthYear {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthYear {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || anyhow!("Invalid month '{s}', expected the form YYYY-MM, e.g. 2025-10");
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4
            || month.len() != 2
            || !year.bytes().all(|b| b.is_ascii_digit())
            || !month.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        MonthYear::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for MonthYear {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MonthYear {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MonthYear::from_str(&s).map_err(serde::de::Error::custom)
    }
}
