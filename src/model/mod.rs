//! Types that represent the core data model, such as `Expense` and `Category`.
mod amount;
mod category;
mod expense;
mod month;
mod user;
mod week;

pub use amount::{Amount, AmountError};
pub use category::Category;
pub use expense::{CategoryTotal, Expense, ExpenseId};
pub use month::MonthYear;
pub use user::{User, UserId};
pub use week::{weeks_of, weeks_of_month, WeekWindow};
