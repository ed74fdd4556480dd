//! Amount type for monetary values that may be typed with or without a dollar sign and commas.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

/// Represents a dollar amount.
///
/// Amounts are stored in SQLite as `REAL` and summed as floating-point numbers. Rounding to cents
/// only happens when displaying.
///
/// # Examples
///
/// ```
/// # use expense_tracker::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("$1,200.5").unwrap();
/// assert_eq!(amount.value(), 1200.5);
/// assert_eq!(amount.to_string(), "$1200.50");
/// ```
///
/// Negative amounts are rejected when parsing:
/// ```
/// # use expense_tracker::model::Amount;
/// # use std::str::FromStr;
/// assert!(Amount::from_str("-5.00").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(f64);

impl Amount {
    pub const ZERO: Amount = Amount(0.0);

    /// Creates an amount without validation. Used for values read back from the database.
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// The percentage of `total` that this amount represents. A zero total yields zero.
    pub fn share_of(&self, total: Amount) -> f64 {
        if total.is_zero() {
            0.0
        } else {
            self.0 / total.0 * 100.0
        }
    }
}

/// An error that can occur when parsing strings into `Amount` values.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum AmountError {
    Empty,
    Invalid(String),
    Negative(String),
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => write!(f, "An amount is required"),
            AmountError::Invalid(s) => write!(f, "Invalid amount format '{s}'"),
            AmountError::Negative(s) => write!(f, "Amounts cannot be negative, got '{s}'"),
        }
    }
}

impl std::error::Error for AmountError {}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }

        let negative = trimmed.starts_with('-');
        let unsigned = trimmed.trim_start_matches('-');
        let without_dollar = unsigned.strip_prefix('$').unwrap_or(unsigned);
        let without_commas = without_dollar.replace(',', "");

        let parsed = f64::from_str(&without_commas)
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| AmountError::Invalid(trimmed.to_string()))?;

        let value = if negative { -parsed } else { parsed };
        if value < 0.0 {
            return Err(AmountError::Negative(trimmed.to_string()));
        }
        // -0.0 would display as "$-0.00"
        Ok(Amount(if value == 0.0 { 0.0 } else { value }))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0 < 0.0 {
            write!(f, "-${:.2}", self.0.abs())
        } else {
            write!(f, "${:.2}", self.0)
        }
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for f64 {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
