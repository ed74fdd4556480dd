use crate::model::{Amount, Category, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The identifier the database assigns to an expense.
pub type ExpenseId = i64;

/// A single recorded expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub(crate) id: ExpenseId,
    pub(crate) user_id: UserId,
    pub(crate) amount: Amount,
    pub(crate) category: Category,
    pub(crate) date: NaiveDate,
    pub(crate) note: Option<String>,
}

impl Expense {
    pub fn id(&self) -> ExpenseId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

/// One line per expense, e.g. `#12 2025-10-03 Food: $12.50 (lunch)`.
impl Display for Expense {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} {}: {}",
            self.id, self.date, self.category, self.amount
        )?;
        match self.note() {
            Some(note) if !note.is_empty() => write!(f, " ({note})"),
            _ => Ok(()),
        }
    }
}

/// The total spent in one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub(crate) category: Category,
    pub(crate) total: Amount,
}

impl CategoryTotal {
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn total(&self) -> Amount {
        self.total
    }
}
