//! These structs provide the CLI interface for the expenses CLI.

use crate::model::{Category, ExpenseId};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing::level_filters::LevelFilter;

/// expenses: A command-line tool for tracking what you spend.
///
/// Record expenses with an amount, a category, a date and an optional note, then look at where
/// the money went each month. The dashboard shows the month's total and category shares, and
/// the detail view breaks a month down by category and by calendar week.
///
/// Data is kept in a SQLite file inside the data directory. Start with `expenses init`, then
/// `expenses signup` and `expenses login`.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory, its configuration file and an empty database.
    ///
    /// This is the first command you should run. By default the data directory is
    /// $HOME/expenses. Pass --expenses-home or set EXPENSES_HOME to put it somewhere else.
    Init,
    /// Register a new account. The username must be an e-mail address.
    Signup(CredentialsArgs),
    /// Log in. The session lasts until you run `expenses logout`.
    Login(CredentialsArgs),
    /// Forget the logged-in user.
    Logout,
    /// Record a new expense.
    Add(AddArgs),
    /// Change an existing expense. Fields that are not given keep their current value.
    Edit(EditArgs),
    /// Remove an expense.
    Delete(IdArgs),
    /// Print a single expense.
    Show(IdArgs),
    /// Show the month's total, spending per category and the most recent expenses.
    Dashboard(DashboardArgs),
    /// Show the month's categories ranked by spending and the expenses of one week.
    Detail(DetailArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the expenses database and configuration are held. Defaults to
    /// ~/expenses
    #[arg(long, env = "EXPENSES_HOME", default_value_t = default_expenses_home())]
    expenses_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, expenses_home: PathBuf) -> Self {
        Self {
            log_level,
            expenses_home: expenses_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn expenses_home(&self) -> &DisplayPath {
        &self.expenses_home
    }
}

/// Args for the `expenses signup` and `expenses login` commands.
#[derive(Debug, Parser, Clone)]
pub struct CredentialsArgs {
    /// Your e-mail address, e.g. alice@example.com
    #[arg(long)]
    username: String,

    /// At least 8 characters, not counting surrounding whitespace. It is stored as plain text, so
    /// do not reuse a valuable password.
    #[arg(long)]
    password: String,
}

impl CredentialsArgs {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Args for the `expenses add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The amount spent, e.g. 12.50 or $1,200.00. Must not be negative.
    #[arg(long)]
    amount: String,

    /// What the money was spent on.
    #[arg(long, value_enum, default_value_t = Category::Food)]
    category: Category,

    /// The date of the expense as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<String>,

    /// A free-text note.
    #[arg(long)]
    note: Option<String>,
}

impl AddArgs {
    pub fn new(
        amount: impl Into<String>,
        category: Category,
        date: Option<&str>,
        note: Option<&str>,
    ) -> Self {
        Self {
            amount: amount.into(),
            category,
            date: date.map(str::to_string),
            note: note.map(str::to_string),
        }
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

/// Args for the `expenses edit` command.
#[derive(Debug, Parser, Clone)]
pub struct EditArgs {
    /// The id of the expense, as shown by `expenses dashboard`.
    id: ExpenseId,

    /// The new amount.
    #[arg(long)]
    amount: Option<String>,

    /// The new category.
    #[arg(long, value_enum)]
    category: Option<Category>,

    /// The new date as YYYY-MM-DD.
    #[arg(long)]
    date: Option<String>,

    /// The new note. Pass an empty string to remove the note.
    #[arg(long)]
    note: Option<String>,
}

impl EditArgs {
    pub fn new(id: ExpenseId) -> Self {
        Self {
            id,
            amount: None,
            category: None,
            date: None,
            note: None,
        }
    }

    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn id(&self) -> ExpenseId {
        self.id
    }

    pub fn amount(&self) -> Option<&str> {
        self.amount.as_deref()
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

/// Args for commands that act on a single expense.
#[derive(Debug, Parser, Clone)]
pub struct IdArgs {
    /// The id of the expense.
    id: ExpenseId,
}

impl IdArgs {
    pub fn new(id: ExpenseId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> ExpenseId {
        self.id
    }
}

/// Args for the `expenses dashboard` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct DashboardArgs {
    /// The month to show as YYYY-MM. Defaults to the current month.
    #[arg(long)]
    month: Option<String>,

    /// How many recent expenses to list. Defaults to `recent_limit` from config.json.
    #[arg(long)]
    limit: Option<u32>,
}

impl DashboardArgs {
    pub fn new(month: Option<&str>, limit: Option<u32>) -> Self {
        Self {
            month: month.map(str::to_string),
            limit,
        }
    }

    pub fn month(&self) -> Option<&str> {
        self.month.as_deref()
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }
}

/// Args for the `expenses detail` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct DetailArgs {
    /// The month to show as YYYY-MM. Defaults to the current month.
    #[arg(long)]
    month: Option<String>,

    /// Which week of the month to list, starting at 1. Defaults to the first week.
    #[arg(long)]
    week: Option<usize>,
}

impl DetailArgs {
    pub fn new(month: Option<&str>, week: Option<usize>) -> Self {
        Self {
            month: month.map(str::to_string),
            week,
        }
    }

    pub fn month(&self) -> Option<&str> {
        self.month.as_deref()
    }

    pub fn week(&self) -> Option<usize> {
        self.week
    }
}

fn default_expenses_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("expenses"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --expenses-home or EXPENSES_HOME instead of relying on the \
                default data directory. If you continue using the program right now, you may \
                have problems!",
            );
            PathBuf::from("expenses")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
